//! Leptos client-side app for browsing concepts as a list and as a
//! force-directed graph.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
pub mod components;
pub mod concepts;
pub mod config;
pub mod debounce;
pub mod error;
mod pages;

// Browser tests live in `tests/browser.rs`.
#[cfg(test)]
use wasm_bindgen_test as _;

// Top-Level pages
use crate::config::AppConfig;
use crate::pages::concepts::ConceptsPage;
use crate::pages::graph::GraphPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the concept list and the graph, and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(AppConfig::from_env());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Concept Graph Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=ConceptsPage />
				<Route path=path!("/graph") view=GraphPage />
			</Routes>
		</Router>
	}
}
