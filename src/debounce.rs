//! Coalesce-then-act: bursts of calls collapse into one action that runs
//! after the input has been quiet for a while.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use leptos::prelude::{TimeoutHandle, set_timeout_with_handle};
use log::warn;

/// Delay used for search input.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Only the most recent call survives; earlier pending ones are cleared.
/// Clones share the pending timer, so a clone held by a cleanup hook can
/// cancel what another clone scheduled.
#[derive(Clone)]
pub struct Debouncer {
	delay: Duration,
	pending: Arc<Mutex<Option<TimeoutHandle>>>,
}

impl Debouncer {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			pending: Arc::new(Mutex::new(None)),
		}
	}

	/// Schedules `action`, replacing any action still waiting.
	pub fn call(&self, action: impl FnOnce() + 'static) {
		self.cancel();
		let pending = self.pending.clone();
		let scheduled = set_timeout_with_handle(
			move || {
				if let Ok(mut slot) = pending.lock() {
					slot.take();
				}
				action();
			},
			self.delay,
		);
		match scheduled {
			Ok(handle) => {
				if let Ok(mut slot) = self.pending.lock() {
					*slot = Some(handle);
				}
			}
			Err(err) => warn!("Could not schedule debounced action: {:?}", err),
		}
	}

	/// Drops the waiting action, if any.
	pub fn cancel(&self) {
		let handle = self.pending.lock().ok().and_then(|mut slot| slot.take());
		if let Some(handle) = handle {
			handle.clear();
		}
	}
}

impl Default for Debouncer {
	fn default() -> Self {
		Self::new(DEFAULT_DELAY)
	}
}
