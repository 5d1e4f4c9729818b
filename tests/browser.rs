//! Timer and animation-frame behavior, run in a browser with
//! `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use concept_graph_explorer::components::force_graph::frame_loop;
use concept_graph_explorer::debounce::Debouncer;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

async fn sleep(ms: i32) {
	let promise = js_sys::Promise::new(&mut |resolve, _reject| {
		web_sys::window()
			.unwrap()
			.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
			.unwrap();
	});
	JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn only_the_last_debounced_call_runs() {
	let debounce = Debouncer::new(Duration::from_millis(20));
	let ran = Rc::new(RefCell::new(Vec::new()));
	for i in 0..3 {
		let ran = ran.clone();
		debounce.call(move || ran.borrow_mut().push(i));
	}
	assert!(ran.borrow().is_empty());
	sleep(80).await;
	assert_eq!(*ran.borrow(), vec![2]);
}

#[wasm_bindgen_test]
async fn cancel_drops_the_pending_action() {
	let debounce = Debouncer::new(Duration::from_millis(20));
	let ran = Rc::new(Cell::new(false));
	let flag = ran.clone();
	debounce.call(move || flag.set(true));
	debounce.clone().cancel();
	sleep(80).await;
	assert!(!ran.get());
}

#[wasm_bindgen_test]
async fn stopped_frame_loop_stops_drawing_and_cleans_up_once() {
	let frames = Rc::new(Cell::new(0));
	let stops = Rc::new(Cell::new(0));
	let (frame_count, stop_count) = (frames.clone(), stops.clone());
	let handle = frame_loop::start(
		move |_| frame_count.set(frame_count.get() + 1),
		move || stop_count.set(stop_count.get() + 1),
	)
	.unwrap();

	sleep(100).await;
	assert!(frames.get() > 0);

	handle.stop();
	let drawn = frames.get();
	sleep(100).await;
	assert_eq!(frames.get(), drawn);
	assert_eq!(stops.get(), 1);

	handle.stop();
	sleep(50).await;
	assert_eq!(stops.get(), 1);
}
