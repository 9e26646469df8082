use leptos::prelude::*;

use super::style::{edge_style, namespace_color};
use crate::graph::{
	Direction, GraphEvent, GraphView, InteractionState, NamespaceOption, NamespacePreset,
	entity_details,
};
use crate::schema::RelationshipKind;

/// Search box, zoom controls, refresh and the namespace multi-select.
#[component]
pub fn Toolbar(
	state: RwSignal<InteractionState>,
	graph_view: Memo<GraphView>,
	fetches: RwSignal<u64>,
) -> impl IntoView {
	let dispatch = move |event: GraphEvent| state.update(|s| s.handle(event));
	let preset = move |p: NamespacePreset| {
		move |_: leptos::ev::MouseEvent| dispatch(GraphEvent::SelectNamespaces(p))
	};

	view! {
		<div class="schema-graph-toolbar">
			<input
				type="search"
				placeholder="Search entities or namespaces"
				prop:value=move || state.with(|s| s.search_term().to_string())
				on:input=move |ev| dispatch(GraphEvent::Search(event_target_value(&ev)))
			/>
			<button title="Zoom in" on:click=move |_| dispatch(GraphEvent::ZoomIn)>"+"</button>
			<button title="Zoom out" on:click=move |_| dispatch(GraphEvent::ZoomOut)>"-"</button>
			<button on:click=move |_| dispatch(GraphEvent::ResetView)>"Reset view"</button>
			<button
				disabled=move || graph_view.with(|v| v.loading)
				on:click=move |_| fetches.update(|n| *n += 1)
			>
				"Refresh"
			</button>
			<details class="namespace-select">
				<summary>
					{move || {
						graph_view
							.with(|v| {
								format!(
									"Namespaces ({}/{})",
									v.status.selected_namespaces,
									v.status.total_namespaces,
								)
							})
					}}
				</summary>
				<div class="quick-select">
					<button on:click=preset(NamespacePreset::All)>"All"</button>
					<button on:click=preset(NamespacePreset::FirstParty)>"Own modules"</button>
					<button on:click=preset(NamespacePreset::None)>"None"</button>
				</div>
				<For
					each=move || graph_view.with(|v| v.namespaces.clone())
					key=|ns| ns.name.clone()
					children=move |ns: NamespaceOption| {
						let name = ns.name.clone();
						let checked_name = ns.name.clone();
						let checked = move || {
							state.with(|s| s.selected_namespaces().contains(&checked_name))
						};
						let tag = if ns.is_system {
							" (system)"
						} else if ns.from_marketplace {
							" (marketplace)"
						} else {
							""
						};
						view! {
							<label class="namespace-option">
								<input
									type="checkbox"
									prop:checked=checked
									on:change=move |_| dispatch(GraphEvent::ToggleNamespace(name.clone()))
								/>
								<span
									class="swatch"
									style=format!("background: {}", namespace_color(ns.index))
								></span>
								{ns.name}
								<small>{tag}</small>
							</label>
						}
					}
				/>
			</details>
		</div>
	}
}

/// Visible counts, zoom and fetch status.
#[component]
pub fn StatusStrip(graph_view: Memo<GraphView>) -> impl IntoView {
	let counts = move || {
		graph_view.with(|v| {
			format!(
				"{} entities · {} relationships · {}/{} namespaces · {}%",
				v.status.entities,
				v.status.relationships,
				v.status.selected_namespaces,
				v.status.total_namespaces,
				v.status.zoom_percent,
			)
		})
	};
	let status = move || {
		graph_view.with(|v| match (&v.error, v.loading) {
			(_, true) => Some(view! { <span class="loading">"Loading schema..."</span> }.into_any()),
			(Some(err), false) => Some(view! { <span class="error">{err.clone()}</span> }.into_any()),
			(None, false) => None,
		})
	};

	view! {
		<div class="schema-graph-status">
			<span>{counts}</span>
			{status}
		</div>
	}
}

/// Association kinds and namespace colours.
#[component]
pub fn Legend(graph_view: Memo<GraphView>) -> impl IntoView {
	let line = |kind: RelationshipKind, cross: bool| {
		let style = edge_style(kind, cross, false);
		format!(
			"display: inline-block; width: 28px; border-top: 2px {} {};",
			if style.dash.is_some() { "dashed" } else { "solid" },
			style.color,
		)
	};
	let namespaces = move || {
		graph_view.with(|v| {
			v.namespaces
				.iter()
				.filter(|ns| ns.selected)
				.map(|ns| {
					let style = format!("background: {}", namespace_color(ns.index));
					let name = ns.name.clone();
					view! {
						<li>
							<span class="swatch" style=style></span>
							{name}
						</li>
					}
				})
				.collect_view()
		})
	};

	view! {
		<div class="schema-graph-legend">
			<ul>
				<li><span style=line(RelationshipKind::Reference, false)></span>" Reference"</li>
				<li><span style=line(RelationshipKind::ReferenceSet, false)></span>" Reference set"</li>
				<li><span style=line(RelationshipKind::Reference, true)></span>" Cross-namespace"</li>
			</ul>
			<ul>{namespaces}</ul>
		</div>
	}
}

fn kind_label(kind: RelationshipKind) -> &'static str {
	match kind {
		RelationshipKind::Reference => "1-*",
		RelationshipKind::ReferenceSet => "*-*",
	}
}

fn direction_arrow(direction: Direction) -> &'static str {
	match direction {
		Direction::Outgoing => "→",
		Direction::Incoming => "←",
		Direction::SelfReference => "↺",
	}
}

/// Attributes, generalization chain and relationships of the selected entity.
#[component]
pub fn DetailPanel(state: RwSignal<InteractionState>) -> impl IntoView {
	let details = Memo::new(move |_| {
		state.with(|s| entity_details(s.snapshot()?, s.selected_entity()?))
	});

	move || {
		details.get().map(|d| {
			let attributes = d
				.attributes
				.into_iter()
				.map(|a| {
					view! {
						<li>
							<span class="attr-name">{a.name}</span>
							": "
							<span class="attr-type">{a.attribute_type.label()}</span>
						</li>
					}
				})
				.collect_view();
			let generalization = if d.generalizations.is_empty() {
				"None".to_string()
			} else {
				let mut chain = d.generalizations.join(" → ");
				if d.cyclic_generalization {
					chain.push_str(" (cycle)");
				}
				chain
			};
			let relationships = d
				.relationships
				.into_iter()
				.map(|r| {
					view! {
						<li class:cross=r.cross_namespace>
							{direction_arrow(r.direction)}
							" "
							{r.name}
							" ("
							{kind_label(r.kind)}
							") "
							{r.other}
						</li>
					}
				})
				.collect_view();

			view! {
				<aside class="entity-details">
					<header>
						<h2>{d.name}</h2>
						<button on:click=move |_| state.update(|s| s.handle(GraphEvent::ClickBackground))>
							"Close"
						</button>
					</header>
					<p class="qualified-name">{d.qualified_name}</p>
					<h3>"Attributes"</h3>
					<ul>{attributes}</ul>
					<h3>"Generalization"</h3>
					<p>{generalization}</p>
					<h3>"Relationships"</h3>
					<ul>{relationships}</ul>
				</aside>
			}
		})
	}
}
