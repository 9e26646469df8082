use futures::executor::block_on;
use pretty_assertions::assert_eq;
use schema_graph_canvas::config::GraphConfig;
use schema_graph_canvas::graph::{
	GraphEvent, InteractionState, LoadMode, Position, derive_view, filtered_entities,
	filtered_relationships,
};
use schema_graph_canvas::schema::{
	Entity, NamespaceInfo, NamespaceSchema, Relationship, StaticSchemaSource, fetch_snapshot,
};

fn two_namespace_source() -> StaticSchemaSource {
	let link = Relationship::new("r1", "E1_E2", "A.E1", "e2");
	StaticSchemaSource::new()
		.with_namespace(
			NamespaceInfo::new("A"),
			Some(NamespaceSchema {
				entities: vec![Entity::new("e1", "A", "E1")],
				relationships: vec![],
				cross_namespace_relationships: vec![link.clone()],
			}),
		)
		.with_namespace(
			NamespaceInfo::new("B"),
			Some(NamespaceSchema {
				entities: vec![Entity::new("e2", "B", "E2")],
				relationships: vec![],
				cross_namespace_relationships: vec![link],
			}),
		)
}

fn load(source: &StaticSchemaSource) -> InteractionState {
	let config = GraphConfig::default();
	let mut state = InteractionState::new(config.clone()).unwrap();
	let ticket = state.begin_fetch();
	let result = block_on(fetch_snapshot(source, &config.system_namespaces));
	assert!(state.finish_fetch(ticket, LoadMode::Initial, result));
	state
}

#[test]
fn cross_namespace_pair_is_fully_visible() {
	let state = load(&two_namespace_source());

	assert_eq!(filtered_entities(&state).len(), 2);
	let relationships = filtered_relationships(&state);
	assert_eq!(relationships.len(), 1);
	assert!(relationships[0].cross_namespace);

	let view = derive_view(&state);
	assert_eq!(view.nodes.len(), 2);
	assert_eq!(view.edges.len(), 1);
	assert!(view.edges[0].cross_namespace);
	for node in &view.nodes {
		assert!((100.0..=1100.0).contains(&node.position.x));
		assert!((50.0..=750.0).contains(&node.position.y));
	}
}

#[test]
fn session_replay() {
	let source = two_namespace_source();
	let state = [
		GraphEvent::ClickEntity("e1".into()),
		GraphEvent::ZoomIn,
		GraphEvent::ToggleNamespace("B".into()),
		GraphEvent::Search("e".into()),
	]
	.into_iter()
	.fold(load(&source), InteractionState::reduce);

	let view = derive_view(&state);
	assert_eq!(view.nodes.len(), 1);
	assert!(view.nodes[0].selected);
	assert!(view.edges.is_empty());
	assert_eq!(view.status.zoom_percent, 120);
	assert_eq!(view.status.selected_namespaces, 1);

	// refreshing keeps the view, the selection and the pruned filter
	let mut state = state;
	state.set_position_override("e1".into(), Position::new(50.0, 60.0));
	let ticket = state.begin_fetch();
	let result = block_on(fetch_snapshot(&source, &["System".to_string()]));
	state.finish_fetch(ticket, LoadMode::Refresh, result);

	let view = derive_view(&state);
	assert_eq!(view.status.zoom_percent, 120);
	assert_eq!(view.nodes[0].position, Position::new(50.0, 60.0));
	assert!(view.nodes[0].selected);
}
