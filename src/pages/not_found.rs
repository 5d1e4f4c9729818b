use leptos::prelude::*;
use leptos_router::components::A;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<p>"The page you are looking for does not exist."</p>
			<A href="/">"Back to the concept list"</A>
		</div>
	}
}
