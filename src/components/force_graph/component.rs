use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use crate::api::ConceptId;
use crate::config::GraphConfig;
use crate::debounce::Debouncer;
use crate::error::GraphError;

use super::frame_loop::{self, StopHandle};
use super::interaction::{InteractionEvent, MOUSE_POINTER, PointerId, ViewportCommand};
use super::render;
use super::state::ForceGraphState;
use super::types::{GraphData, Point};

const RESIZE_DELAY: Duration = Duration::from_millis(150);
const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type Listener = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Parts of a running session that cleanup hooks must reach directly.
struct Session {
	frames: StopHandle,
	resize: Debouncer,
}

impl Session {
	/// Halts the frame loop and drops a pending resize before returning.
	fn stop(self) {
		self.frames.stop();
		self.resize.cancel();
	}
}

fn surface_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
		if let Some(window) = web_sys::window() {
			let inner = (dimension(window.inner_width()), dimension(window.inner_height()));
			if let (Some(w), Some(h)) = inner {
				return (w, h);
			}
		}
	}
	let parent = canvas.parent_element();
	let measured = |read: fn(&web_sys::Element) -> i32| {
		parent
			.as_ref()
			.map(|p| read(p) as f64)
			.filter(|size| *size > 0.0)
	};
	(
		width
			.or_else(|| measured(web_sys::Element::client_width))
			.unwrap_or(FALLBACK_WIDTH),
		height
			.or_else(|| measured(web_sys::Element::client_height))
			.unwrap_or(FALLBACK_HEIGHT),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")
		.map_err(|err| GraphError::Canvas(format!("{:?}", err)))?
		.ok_or_else(|| GraphError::Canvas("2d context not supported".into()))?
		.dyn_into()
		.map_err(|_| GraphError::Canvas("unexpected context type".into()))
}

fn canvas_point(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	client_x: i32,
	client_y: i32,
) -> Option<Point> {
	let canvas = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(client_x as f64 - rect.left(), client_y as f64 - rect.top()))
}

/// Wheel delta as a zoom exponent, with line and page modes normalized the
/// way browsers report them.
fn wheel_exponent(delta_y: f64, delta_mode: u32, sensitivity: f64) -> f64 {
	let per_unit = match delta_mode {
		WheelEvent::DOM_DELTA_PIXEL => sensitivity,
		WheelEvent::DOM_DELTA_LINE => 0.05,
		_ => 1.0,
	};
	-delta_y * per_unit
}

fn with_state<R>(state: &SharedState, f: impl FnOnce(&mut ForceGraphState) -> R) -> Option<R> {
	state.borrow_mut().as_mut().map(f)
}

/// Changed touch points of a touch event, in canvas coordinates.
fn changed_touches(
	ev: &TouchEvent,
	canvas_ref: NodeRef<leptos::html::Canvas>,
) -> Vec<(PointerId, Point)> {
	let touches = ev.changed_touches();
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.filter_map(|touch| {
			canvas_point(canvas_ref, touch.client_x(), touch.client_y())
				.map(|p| (touch.identifier(), p))
		})
		.collect()
}

/// Canvas view of a concept graph. Restarts its layout whenever `data`
/// changes and stops it when unmounted.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	/// Called with the concept id of a clicked node.
	#[prop(into)]
	on_navigate: Callback<ConceptId>,
	/// Zoom in, zoom out and reset requests from outside controls.
	#[prop(into, default = Signal::stored(None))]
	commands: Signal<Option<ViewportCommand>>,
	/// Called when no layout could be started for the current data.
	#[prop(optional)]
	on_error: Option<Callback<GraphError>>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let session: Arc<Mutex<Option<Session>>> = Arc::new(Mutex::new(None));
	let wheel_sensitivity = config.viewport.wheel_sensitivity;

	let stop_session = {
		let session = session.clone();
		move || {
			if let Some(running) = session.lock().ok().and_then(|mut slot| slot.take()) {
				running.stop();
			}
		}
	};

	let report = move |err: GraphError| {
		if let Some(cb) = on_error {
			cb.run(err);
		}
	};

	let (state_init, stop_previous) = (state.clone(), stop_session.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();
		stop_previous();
		state_init.borrow_mut().take();

		let (w, h) = surface_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(err) => {
				warn!("{}", err);
				report(err);
				return;
			}
		};
		match ForceGraphState::new(&data, &config, w, h) {
			Ok(graph) => *state_init.borrow_mut() = Some(graph),
			Err(err) => {
				info!("Graph not started: {}", err);
				ctx.clear_rect(0.0, 0.0, w, h);
				report(err);
				return;
			}
		}

		let resize_listener: Listener = Rc::new(RefCell::new(None));
		let resize_debounce = Debouncer::new(RESIZE_DELAY);

		let frame_state = state_init.clone();
		let on_frame = move |dt: f64| {
			if let Some(graph) = frame_state.borrow_mut().as_mut() {
				if graph.step(dt) {
					render::paint(&graph.frame(), &ctx);
				}
			}
		};
		// The listener is inert once the session stops; this only detaches it.
		let on_stop = {
			let listener = resize_listener.clone();
			move || {
				let Some(cb) = listener.borrow_mut().take() else {
					return;
				};
				if let Some(window) = web_sys::window() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		};

		let frames = match frame_loop::start(on_frame, on_stop) {
			Ok(handle) => handle,
			Err(err) => {
				warn!("{}", err);
				report(err);
				return;
			}
		};
		if let Ok(mut slot) = session.lock() {
			*slot = Some(Session {
				frames: frames.clone(),
				resize: resize_debounce.clone(),
			});
		}

		let (resize_state, resize_canvas) = (state_init.clone(), canvas.clone());
		let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
			if frames.is_stopped() {
				return;
			}
			let (state, canvas) = (resize_state.clone(), resize_canvas.clone());
			let frames = frames.clone();
			resize_debounce.call(move || {
				if frames.is_stopped() {
					return;
				}
				let (w, h) = surface_size(&canvas, fullscreen, width, height);
				// Assigning the size clears the canvas even when it is unchanged.
				if canvas.width() != w as u32 || canvas.height() != h as u32 {
					canvas.set_width(w as u32);
					canvas.set_height(h as u32);
					with_state(&state, |graph| graph.resize(w, h));
				}
			});
		});
		if let Some(window) = web_sys::window() {
			let _ = window
				.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
		}
		*resize_listener.borrow_mut() = Some(on_resize);
	});

	let state_cmd = state.clone();
	Effect::new(move |_| {
		if let Some(command) = commands.get() {
			with_state(&state_cmd, |graph| graph.command(command));
		}
	});

	on_cleanup(move || stop_session());

	let navigate = move |events: Vec<InteractionEvent>| {
		for event in events {
			let InteractionEvent::Navigate(id) = event;
			info!("Navigating to concept {}", id);
			on_navigate.run(id);
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		if let Some(point) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) {
			with_state(&state_md, |graph| graph.pointer_down(MOUSE_POINTER, point));
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(point) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) {
			with_state(&state_mm, |graph| graph.pointer_move(MOUSE_POINTER, point));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let event = with_state(&state_mu, |graph| graph.pointer_up(MOUSE_POINTER)).flatten();
		navigate(event.into_iter().collect());
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |graph| graph.pointer_cancel());
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta = wheel_exponent(ev.delta_y(), ev.delta_mode(), wheel_sensitivity);
		if let Some(point) = canvas_point(canvas_ref, ev.client_x(), ev.client_y()) {
			with_state(&state_wh, |graph| graph.wheel(point, delta));
		}
	};

	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		for (pointer, point) in changed_touches(&ev, canvas_ref) {
			with_state(&state_ts, |graph| graph.pointer_down(pointer, point));
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		for (pointer, point) in changed_touches(&ev, canvas_ref) {
			with_state(&state_tm, |graph| graph.pointer_move(pointer, point));
		}
	};

	let state_te = state.clone();
	let on_touchend = move |ev: TouchEvent| {
		let events = changed_touches(&ev, canvas_ref)
			.into_iter()
			.filter_map(|(pointer, _)| {
				with_state(&state_te, |graph| graph.pointer_up(pointer)).flatten()
			})
			.collect();
		navigate(events);
	};

	let state_tc = state;
	let on_touchcancel = move |_: TouchEvent| {
		with_state(&state_tc, |graph| graph.pointer_cancel());
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wheel_exponent_follows_delta_mode() {
		let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
		assert!(close(wheel_exponent(100.0, WheelEvent::DOM_DELTA_PIXEL, 0.002), -0.2));
		assert!(close(wheel_exponent(-3.0, WheelEvent::DOM_DELTA_LINE, 0.002), 0.15));
		assert!(close(wheel_exponent(1.0, WheelEvent::DOM_DELTA_PAGE, 0.002), -1.0));
	}
}
