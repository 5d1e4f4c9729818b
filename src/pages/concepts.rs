use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::warn;

use crate::api::{Concept, ConceptId, fetch_categories, fetch_concepts};
use crate::components::concept_detail::ConceptDetailModal;
use crate::concepts::matches_search;
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::error::ApiError;

fn concept_card(concept: Concept, selected: RwSignal<Option<ConceptId>>) -> impl IntoView {
	let category = concept.category_label().to_string();
	let id = concept.id.clone();
	view! {
		<div class="concept-card" on:click=move |_| selected.set(Some(id.clone()))>
			<h3>{concept.name}</h3>
			<p>{concept.description}</p>
			<span class="category-tag">{category}</span>
		</div>
	}
}

/// Concept list with category filter and search.
#[component]
pub fn ConceptsPage() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let categories = RwSignal::new(Vec::<String>::new());
	let category = RwSignal::new(String::new());
	let concepts = RwSignal::new(None::<Result<Vec<Concept>, ApiError>>);
	let search_input = RwSignal::new(String::new());
	let search = RwSignal::new(String::new());
	let selected = RwSignal::new(None::<ConceptId>);

	let api_url = config.api_url.clone();
	spawn_local(async move {
		match fetch_categories(&api_url).await {
			Ok(list) => categories.set(list),
			Err(err) => warn!("Failed to load categories: {}", err),
		}
	});

	let api_url = config.api_url;
	Effect::new(move |_| {
		let requested = category.get();
		let api_url = api_url.clone();
		concepts.set(None);
		spawn_local(async move {
			let result = fetch_concepts(&api_url, Some(requested.as_str())).await;
			if let Err(err) = &result {
				warn!("Failed to load concepts: {}", err);
			}
			if category.get_untracked() == requested {
				concepts.set(Some(result));
			}
		});
	});

	let debounce = Debouncer::default();
	let pending_search = debounce.clone();
	on_cleanup(move || pending_search.cancel());
	let on_search = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		search_input.set(value.clone());
		debounce.call(move || search.set(value));
	};

	let visible = move || {
		let term = search.get();
		concepts.get().map(|loaded| {
			loaded.map(|list| {
				list.into_iter()
					.filter(|concept| matches_search(concept, &term))
					.collect::<Vec<_>>()
			})
		})
	};

	view! {
		<div class="concepts-page">
			<header class="page-header">
				<h1>"Concepts"</h1>
				<nav>
					<A href="/graph">"Graph view"</A>
				</nav>
			</header>
			<div class="filters">
				<select
					prop:value=move || category.get()
					on:change=move |ev| category.set(event_target_value(&ev))
				>
					<option value="">"All categories"</option>
					{move || {
						categories
							.get()
							.into_iter()
							.map(|name| {
								let value = name.clone();
								view! { <option value=value>{name}</option> }
							})
							.collect_view()
					}}
				</select>
				<input
					type="search"
					placeholder="Search concepts..."
					prop:value=move || search_input.get()
					on:input=on_search
				/>
			</div>
			{move || match visible() {
				None => view! { <p class="loading">"Loading concepts..."</p> }.into_any(),
				Some(Err(err)) => {
					view! { <p class="error">{format!("Failed to load concepts: {}", err)}</p> }
						.into_any()
				}
				Some(Ok(list)) if list.is_empty() => {
					view! { <p class="empty">"No concepts found."</p> }.into_any()
				}
				Some(Ok(list)) => {
					view! {
						<div class="concept-list">
							{list
								.into_iter()
								.map(|concept| concept_card(concept, selected))
								.collect_view()}
						</div>
					}
						.into_any()
				}
			}}
			<ConceptDetailModal selected=selected />
		</div>
	}
}
