//! `requestAnimationFrame` loop with an explicit stop.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use wasm_bindgen::prelude::*;

use crate::error::GraphError;

/// Longest frame delta handed to animations, so a backgrounded tab does not
/// jump to the end of every transition when it wakes up.
const MAX_FRAME_MS: f64 = 100.0;
const FIRST_FRAME_MS: f64 = 16.0;

/// Halts a running frame loop. Cheap to clone and safe to hold from reactive
/// cleanup hooks. Stopping is immediate: no `on_frame` call starts after
/// [`StopHandle::stop`] returns.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
	pub fn stop(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_stopped(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// Milliseconds since the previous frame, clamped for animation use.
fn frame_delta(last: Option<f64>, now: f64) -> f64 {
	match last {
		Some(last) if now.is_finite() => (now - last).clamp(0.0, MAX_FRAME_MS),
		_ => FIRST_FRAME_MS,
	}
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, GraphError> {
	web_sys::window()
		.ok_or_else(|| GraphError::Canvas("no window".into()))?
		.request_animation_frame(callback.as_ref().unchecked_ref())
		.map_err(|err| GraphError::Canvas(format!("{:?}", err)))
}

/// Calls `on_frame` with the elapsed milliseconds on every animation frame
/// until the returned handle is stopped. `on_stop` runs once, from the first
/// frame that observes the stop.
pub fn start(
	mut on_frame: impl FnMut(f64) + 'static,
	on_stop: impl FnOnce() + 'static,
) -> Result<StopHandle, GraphError> {
	let handle = StopHandle::default();
	let stop = handle.clone();
	let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let next = callback.clone();
	let mut on_stop = Some(on_stop);
	let mut last = None;

	*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
		if stop.is_stopped() {
			if let Some(on_stop) = on_stop.take() {
				on_stop();
			}
			info!("Frame loop stopped");
			// The closure cannot be dropped while it is running.
			let next = next.clone();
			wasm_bindgen_futures::spawn_local(async move {
				next.borrow_mut().take();
			});
			return;
		}

		let dt = frame_delta(last, now);
		last = Some(now);
		on_frame(dt);

		if let Some(cb) = next.borrow().as_ref() {
			if let Err(err) = request_frame(cb) {
				debug!("Frame loop ended: {}", err);
			}
		}
	}));

	if let Some(cb) = callback.borrow().as_ref() {
		request_frame(cb)?;
	}
	Ok(handle)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stop_is_shared_between_clones() {
		let handle = StopHandle::default();
		let observer = handle.clone();
		assert!(!observer.is_stopped());
		handle.stop();
		assert!(observer.is_stopped());
	}

	#[test]
	fn frame_delta_is_clamped() {
		assert_eq!(frame_delta(None, 5000.0), FIRST_FRAME_MS);
		assert_eq!(frame_delta(Some(1000.0), 1016.5), 16.5);
		assert_eq!(frame_delta(Some(1000.0), 9000.0), MAX_FRAME_MS);
		assert_eq!(frame_delta(Some(1000.0), 900.0), 0.0);
	}
}
