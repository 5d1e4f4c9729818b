use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use web_sys::MouseEvent;

use crate::api::{ConceptDetail, ConceptId, fetch_concept};
use crate::config::AppConfig;
use crate::error::ApiError;

fn detail_view(detail: ConceptDetail, selected: RwSignal<Option<ConceptId>>) -> impl IntoView {
	let ConceptDetail { concept, relations } = detail;
	let category = concept.category_label().to_string();

	let relations_view = if relations.is_empty() {
		view! { <p class="empty">"No related concepts."</p> }.into_any()
	} else {
		let items = relations
			.into_iter()
			.map(|relation| {
				let target = relation.target_id.clone();
				let target_category = relation.target_category_label().to_string();
				view! {
					<li class="relation" on:click=move |_| selected.set(Some(target.clone()))>
						<span class="relation-type">{relation.relation_type}</span>
						<span class="relation-target">{relation.target_name}</span>
						<span class="category-tag">{target_category}</span>
					</li>
				}
			})
			.collect_view();
		view! { <ul class="relations">{items}</ul> }.into_any()
	};

	view! {
		<h2>{concept.name}</h2>
		<span class="category-tag">{category}</span>
		<p class="description">{concept.description}</p>
		<h3>"Relations"</h3>
		{relations_view}
	}
}

/// Modal showing the selected concept and its relations. Clicking a related
/// concept switches the selection to it; the close button or a click on the
/// backdrop clears it.
#[component]
pub fn ConceptDetailModal(selected: RwSignal<Option<ConceptId>>) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let detail = RwSignal::new(None::<Result<ConceptDetail, ApiError>>);

	Effect::new(move |_| {
		let Some(id) = selected.get() else {
			return;
		};
		detail.set(None);
		let api_url = config.api_url.clone();
		spawn_local(async move {
			let result = fetch_concept(&api_url, &id).await;
			if let Err(err) = &result {
				warn!("Failed to load concept {}: {}", id, err);
			}
			// A newer selection owns the modal now.
			if selected.get_untracked().as_ref() == Some(&id) {
				detail.set(Some(result));
			}
		});
	});

	let close = move |_: MouseEvent| selected.set(None);

	view! {
		<Show when=move || selected.with(Option::is_some)>
			<div class="modal-backdrop" on:click=close>
				<div class="modal" on:click=|ev: MouseEvent| ev.stop_propagation()>
					<button class="modal-close" on:click=close>
						"×"
					</button>
					{move || match detail.get() {
						None => view! { <p class="loading">"Loading..."</p> }.into_any(),
						Some(Err(err)) => {
							let message = format!("Failed to load concept: {}", err);
							view! { <p class="error">{message}</p> }.into_any()
						}
						Some(Ok(detail)) => detail_view(detail, selected).into_any(),
					}}
				</div>
			</div>
		</Show>
	}
}
