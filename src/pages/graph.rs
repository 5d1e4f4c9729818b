use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::api::{Concept, ConceptId, fetch_concepts};
use crate::components::concept_detail::ConceptDetailModal;
use crate::components::force_graph::{ForceGraphCanvas, GraphData, ViewportCommand};
use crate::concepts::CatalogStats;
use crate::config::AppConfig;
use crate::error::{ApiError, GraphError};

fn stats_view(stats: CatalogStats) -> impl IntoView {
	view! {
		<div class="graph-stats">
			<h3>"Statistics"</h3>
			<p>{format!("Total concepts: {}", stats.total)}</p>
			<ul>
				{stats
					.per_category
					.into_iter()
					.map(|(category, count)| {
						view! { <li>{format!("{}: {}", category, count)}</li> }
					})
					.collect_view()}
			</ul>
		</div>
	}
}

/// Links are sampled, so every visit gets a fresh seed.
fn sampled_graph(concepts: &[Concept]) -> GraphData {
	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
	GraphData::from_concepts(concepts, &mut SmallRng::seed_from_u64(seed))
}

/// Force-directed view of every concept with zoom controls and statistics.
#[component]
pub fn GraphPage() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let concepts = RwSignal::new(None::<Result<Vec<Concept>, ApiError>>);
	let command = RwSignal::new(None::<ViewportCommand>);
	let selected = RwSignal::new(None::<ConceptId>);
	let graph_error = RwSignal::new(None::<GraphError>);

	spawn_local(async move {
		let result = fetch_concepts(&config.api_url, None).await;
		match &result {
			Ok(list) => info!("Loaded {} concepts for the graph", list.len()),
			Err(err) => warn!("Failed to load concepts: {}", err),
		}
		concepts.set(Some(result));
	});

	let send = move |cmd: ViewportCommand| move |_: leptos::ev::MouseEvent| command.set(Some(cmd));
	let on_navigate = Callback::new(move |id: ConceptId| selected.set(Some(id)));
	let on_error = Callback::new(move |err: GraphError| graph_error.set(Some(err)));

	let graph = move || match concepts.get() {
		None => view! { <p class="loading">"Loading graph..."</p> }.into_any(),
		Some(Err(err)) => {
			view! { <p class="error">{format!("Failed to load concepts: {}", err)}</p> }.into_any()
		}
		Some(Ok(list)) if list.is_empty() => {
			view! { <p class="empty">"No data available."</p> }.into_any()
		}
		Some(Ok(list)) => {
			let stats = CatalogStats::from_concepts(&list);
			let data = Signal::stored(sampled_graph(&list));
			view! {
				{stats_view(stats)}
				<div class="graph-container">
					<ForceGraphCanvas
						data=data
						on_navigate=on_navigate
						commands=command
						on_error=on_error
					/>
				</div>
			}
				.into_any()
		}
	};

	view! {
		<div class="graph-page">
			<header class="page-header">
				<h1>"Concept Graph"</h1>
				<nav>
					<A href="/">"Concept list"</A>
				</nav>
			</header>
			<div class="graph-controls">
				<button on:click=send(ViewportCommand::ZoomIn)>"Zoom in"</button>
				<button on:click=send(ViewportCommand::ZoomOut)>"Zoom out"</button>
				<button on:click=send(ViewportCommand::Reset)>"Reset view"</button>
			</div>
			{move || {
				graph_error
					.get()
					.map(|err| match err {
						GraphError::NoData => {
							view! { <p class="empty">"No data available."</p> }.into_any()
						}
						err => view! { <p class="error">{err.to_string()}</p> }.into_any(),
					})
			}}
			{graph}
			<ConceptDetailModal selected=selected />
		</div>
	}
}
