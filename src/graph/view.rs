//! The render set: what is visible, where, and what is highlighted.
//! Recomputed from [`InteractionState`] on every change, never stored.

use std::collections::HashSet;

use super::state::InteractionState;
use super::types::{Position, ViewTransform};
use crate::schema::{Entity, EntityId, Relationship, RelationshipKind, SchemaSnapshot};

/// A node ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
	/// Entity id.
	pub id: EntityId,
	/// Display name.
	pub name: String,
	/// Owning namespace.
	pub namespace: String,
	/// Position of the namespace in the snapshot, for colouring.
	pub namespace_index: usize,
	/// Graph-space position.
	pub position: Position,
	/// This is the selected entity.
	pub selected: bool,
}

/// An edge ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeView {
	/// Relationship id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Association kind.
	pub kind: RelationshipKind,
	/// Endpoints live in different namespaces.
	pub cross_namespace: bool,
	/// Canonical id of the parent endpoint.
	pub from_id: EntityId,
	/// Canonical id of the child endpoint.
	pub to_id: EntityId,
	/// Graph-space position of the parent endpoint.
	pub from: Position,
	/// Graph-space position of the child endpoint.
	pub to: Position,
	/// Touches the selected entity.
	pub highlighted: bool,
}

/// A namespace checkbox.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceOption {
	/// Namespace name.
	pub name: String,
	/// Position in the snapshot, for colouring.
	pub index: usize,
	/// Checked.
	pub selected: bool,
	/// Installed from the marketplace.
	pub from_marketplace: bool,
	/// Reserved system namespace.
	pub is_system: bool,
}

/// Counts for the status strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
	/// Entities passing the filter.
	pub entities: usize,
	/// Relationships between those entities.
	pub relationships: usize,
	/// Namespaces ticked.
	pub selected_namespaces: usize,
	/// Namespaces in the snapshot.
	pub total_namespaces: usize,
	/// Zoom, in percent.
	pub zoom_percent: u32,
}

/// Everything the render adapter needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphView {
	/// Visible nodes with a resolvable position.
	pub nodes: Vec<NodeView>,
	/// Visible edges with both endpoints positioned.
	pub edges: Vec<EdgeView>,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Checkbox list.
	pub namespaces: Vec<NamespaceOption>,
	/// Status strip numbers.
	pub status: StatusCounts,
	/// A fetch is in flight.
	pub loading: bool,
	/// Last fetch failure.
	pub error: Option<String>,
}

impl GraphView {
	/// Topmost node whose card contains the graph-space point `p`.
	pub fn node_at(&self, p: Position, half_width: f64, half_height: f64) -> Option<&NodeView> {
		self.nodes.iter().rev().find(|n| {
			(p.x - n.position.x).abs() <= half_width && (p.y - n.position.y).abs() <= half_height
		})
	}
}

fn matches_search(entity: &Entity, needle: &str) -> bool {
	needle.is_empty()
		|| entity.name.to_lowercase().contains(needle)
		|| entity.namespace.to_lowercase().contains(needle)
}

/// Entities in a selected namespace whose name or namespace contains the
/// search term, ignoring case.
pub fn filtered_entities(state: &InteractionState) -> Vec<&Entity> {
	let Some(snapshot) = state.snapshot() else {
		return Vec::new();
	};
	let needle = state.search_term().to_lowercase();
	snapshot
		.entities()
		.iter()
		.filter(|e| state.selected_namespaces().contains(&e.namespace))
		.filter(|e| matches_search(e, &needle))
		.collect()
}

/// Relationships whose endpoints both resolve into `visible`.
fn relationships_between<'a>(
	snapshot: &'a SchemaSnapshot,
	visible: &HashSet<&EntityId>,
) -> Vec<(&'a Relationship, &'a EntityId, &'a EntityId)> {
	snapshot
		.relationships()
		.iter()
		.filter_map(|r| {
			let (from, to) = snapshot.endpoints(r)?;
			(visible.contains(from) && visible.contains(to)).then_some((r, from, to))
		})
		.collect()
}

/// Relationships whose endpoints both resolve to a filtered entity.
pub fn filtered_relationships(state: &InteractionState) -> Vec<&Relationship> {
	let Some(snapshot) = state.snapshot() else {
		return Vec::new();
	};
	let visible: HashSet<&EntityId> = filtered_entities(state).into_iter().map(|e| &e.id).collect();
	relationships_between(snapshot, &visible)
		.into_iter()
		.map(|(r, _, _)| r)
		.collect()
}

/// Filtered relationships touching the selected entity, whichever key form
/// their endpoints use.
pub fn highlighted_relationships(state: &InteractionState) -> Vec<&Relationship> {
	let (Some(snapshot), Some(selected)) = (state.snapshot(), state.selected_entity()) else {
		return Vec::new();
	};
	filtered_relationships(state)
		.into_iter()
		.filter(|r| {
			snapshot
				.endpoints(r)
				.is_some_and(|(from, to)| from == selected || to == selected)
		})
		.collect()
}

/// Build the full render set.
pub fn derive_view(state: &InteractionState) -> GraphView {
	let transform = state.transform();
	let mut view = GraphView {
		transform,
		loading: state.is_loading(),
		error: state.error().map(str::to_string),
		..GraphView::default()
	};
	view.status.zoom_percent = (transform.k * 100.0).round() as u32;

	let Some(snapshot) = state.snapshot() else {
		return view;
	};

	view.namespaces = snapshot
		.namespaces()
		.iter()
		.enumerate()
		.map(|(index, ns)| NamespaceOption {
			name: ns.name.clone(),
			index,
			selected: state.selected_namespaces().contains(&ns.name),
			from_marketplace: ns.from_marketplace,
			is_system: ns.is_system,
		})
		.collect();
	let namespace_index = |name: &str| {
		view.namespaces
			.iter()
			.position(|ns| ns.name == name)
			.unwrap_or(0)
	};

	let entities = filtered_entities(state);
	let selected = state.selected_entity();
	let nodes: Vec<NodeView> = entities
		.iter()
		.filter_map(|e| {
			Some(NodeView {
				position: state.node_position(&e.id)?,
				id: e.id.clone(),
				name: e.name.clone(),
				namespace: e.namespace.clone(),
				namespace_index: namespace_index(&e.namespace),
				selected: selected == Some(&e.id),
			})
		})
		.collect();

	let visible: HashSet<&EntityId> = entities.iter().map(|e| &e.id).collect();
	let relationships = relationships_between(snapshot, &visible);
	let edges: Vec<EdgeView> = relationships
		.iter()
		.filter_map(|&(r, from_id, to_id)| {
			Some(EdgeView {
				from: state.node_position(from_id)?,
				to: state.node_position(to_id)?,
				id: r.id.clone(),
				name: r.name.clone(),
				kind: r.kind,
				cross_namespace: r.cross_namespace,
				from_id: from_id.clone(),
				to_id: to_id.clone(),
				highlighted: selected.is_some_and(|s| s == from_id || s == to_id),
			})
		})
		.collect();

	view.status.entities = entities.len();
	view.status.relationships = relationships.len();
	view.status.selected_namespaces = view.namespaces.iter().filter(|ns| ns.selected).count();
	view.status.total_namespaces = view.namespaces.len();
	view.nodes = nodes;
	view.edges = edges;
	view
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::graph::state::{GraphEvent, LoadMode};
	use crate::schema::NamespaceDescriptor;

	fn descriptor(name: &str) -> NamespaceDescriptor {
		NamespaceDescriptor {
			name: name.to_string(),
			from_marketplace: false,
			is_system: false,
		}
	}

	fn state_with(snapshot: SchemaSnapshot) -> InteractionState {
		let mut state = InteractionState::default();
		state.load_snapshot(snapshot, LoadMode::Initial);
		state
	}

	fn two_namespaces() -> InteractionState {
		state_with(SchemaSnapshot::new(
			vec![descriptor("A"), descriptor("B")],
			vec![
				Entity::new("a1", "A", "Order"),
				Entity::new("a2", "A", "Line"),
				Entity::new("a3", "A", "Invoice"),
				Entity::new("b1", "B", "Customer"),
				Entity::new("b2", "B", "Address"),
			],
			vec![
				Relationship::new("r1", "Line_Order", "A.Line", "a1"),
				Relationship::new("r2", "Order_Customer", "a1", "B.Customer"),
				Relationship::new("r3", "Customer_Address", "b1", "b2"),
				Relationship::new("r4", "Invoice_Ghost", "a3", "Z.Ghost"),
			],
		))
	}

	fn ids<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Vec<&'a str> {
		entities.into_iter().map(|e| e.id.as_str()).collect()
	}

	#[test]
	fn namespace_filter_limits_entities() {
		let mut state = two_namespaces();
		state.handle(GraphEvent::ToggleNamespace("B".into()));
		let entities = filtered_entities(&state);
		assert_eq!(entities.len(), 3);
		assert!(entities.iter().all(|e| e.namespace == "A"));
	}

	#[test]
	fn search_is_case_insensitive_substring() {
		let mut state = two_namespaces();
		state.handle(GraphEvent::Search("ord".into()));
		assert_eq!(ids(filtered_entities(&state)), vec!["a1"]);
		state.handle(GraphEvent::Search("ORD".into()));
		assert_eq!(ids(filtered_entities(&state)), vec!["a1"]);
		state.handle(GraphEvent::Search("xyz".into()));
		assert!(filtered_entities(&state).is_empty());
	}

	#[test]
	fn search_matches_namespace_name() {
		let mut state = two_namespaces();
		state.handle(GraphEvent::Search("b".into()));
		assert_eq!(ids(filtered_entities(&state)), vec!["b1", "b2"]);
	}

	#[test]
	fn relationships_need_both_endpoints_visible() {
		let mut state = two_namespaces();
		let names = |s: &InteractionState| -> Vec<String> {
			filtered_relationships(s).iter().map(|r| r.name.clone()).collect()
		};
		assert_eq!(names(&state), vec!["Line_Order", "Order_Customer", "Customer_Address"]);
		state.handle(GraphEvent::ToggleNamespace("B".into()));
		assert_eq!(names(&state), vec!["Line_Order"]);
	}

	#[test]
	fn highlight_follows_selection_across_key_forms() {
		let mut state = two_namespaces();
		assert!(highlighted_relationships(&state).is_empty());
		state.handle(GraphEvent::ClickEntity("a1".into()));
		let highlighted: Vec<&str> = highlighted_relationships(&state)
			.iter()
			.map(|r| r.id.as_str())
			.collect();
		assert_eq!(highlighted, vec!["r1", "r2"]);

		let view = derive_view(&state);
		let flags: Vec<(&str, bool)> = view.edges.iter().map(|e| (e.id.as_str(), e.highlighted)).collect();
		assert_eq!(flags, vec![("r1", true), ("r2", true), ("r3", false)]);
		assert!(view.nodes.iter().find(|n| n.id.as_str() == "a1").unwrap().selected);
	}

	#[test]
	fn view_uses_override_positions() {
		let mut state = two_namespaces();
		state.set_position_override("a1".into(), Position::new(50.0, 60.0));
		let view = derive_view(&state);
		let node = view.nodes.iter().find(|n| n.id.as_str() == "a1").unwrap();
		assert_eq!(node.position, Position::new(50.0, 60.0));
		let edge = view.edges.iter().find(|e| e.id == "r1").unwrap();
		assert_eq!(edge.to, Position::new(50.0, 60.0));
	}

	#[test]
	fn status_counts() {
		let mut state = two_namespaces();
		state.handle(GraphEvent::ZoomIn);
		let view = derive_view(&state);
		assert_eq!(
			view.status,
			StatusCounts {
				entities: 5,
				relationships: 3,
				selected_namespaces: 2,
				total_namespaces: 2,
				zoom_percent: 120,
			}
		);
	}

	#[test]
	fn empty_session_has_empty_view() {
		let view = derive_view(&InteractionState::default());
		assert!(view.nodes.is_empty());
		assert!(view.namespaces.is_empty());
		assert_eq!(view.status.zoom_percent, 100);
	}

	#[test]
	fn hit_testing_prefers_topmost_card() {
		let mut state = two_namespaces();
		state.set_position_override("a1".into(), Position::new(100.0, 100.0));
		state.set_position_override("a2".into(), Position::new(110.0, 100.0));
		let view = derive_view(&state);
		let hit = view.node_at(Position::new(105.0, 100.0), 70.0, 22.0).map(|n| n.id.as_str());
		assert_eq!(hit, Some("a2"));
		assert!(view.node_at(Position::new(-500.0, -500.0), 70.0, 22.0).is_none());
	}
}
