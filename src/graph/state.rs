use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, info, warn};

use super::layout::{Layout, compute_layout};
use super::types::{Position, ViewTransform};
use crate::config::GraphConfig;
use crate::error::{ConfigError, FetchError};
use crate::schema::{EntityId, SchemaSnapshot};

/// How a freshly fetched snapshot is merged into the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
	/// First load: reset view, selection, overrides and namespace filter.
	Initial,
	/// Explicit refresh: keep the view, prune what no longer exists.
	Refresh,
}

/// Bulk namespace selections offered next to the checkboxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespacePreset {
	/// Every namespace.
	All,
	/// Everything that is neither marketplace nor system.
	FirstParty,
	/// Nothing.
	None,
}

/// Generation number handed out when a fetch starts. Only the result of
/// the newest fetch is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// User gestures reported by the render adapter. Pointer positions are in
/// screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// Click on an entity node.
	ClickEntity(EntityId),
	/// Click on empty canvas.
	ClickBackground,
	/// Pointer pressed on a node.
	NodePointerDown {
		/// Node under the pointer.
		id: EntityId,
		/// Pointer position.
		pointer: Position,
	},
	/// Pointer pressed on empty canvas.
	BackgroundPointerDown {
		/// Pointer position.
		pointer: Position,
	},
	/// Pointer moved.
	PointerMove {
		/// Pointer position.
		pointer: Position,
	},
	/// Pointer released.
	PointerUp,
	/// Pointer left the canvas.
	PointerLeave,
	/// Wheel scrolled; positive `delta_y` scrolls away from the user.
	Wheel {
		/// Vertical wheel delta.
		delta_y: f64,
	},
	/// Zoom-in button.
	ZoomIn,
	/// Zoom-out button.
	ZoomOut,
	/// Reset-view button.
	ResetView,
	/// Namespace checkbox toggled.
	ToggleNamespace(String),
	/// Quick-select action.
	SelectNamespaces(NamespacePreset),
	/// Search box changed.
	Search(String),
}

#[derive(Clone, Debug, PartialEq)]
struct NodeDrag {
	id: EntityId,
	offset: Position,
}

#[derive(Clone, Debug, PartialEq)]
struct PanDrag {
	anchor: Position,
	moved: bool,
}

/// Everything the interactive session owns. Transitions run to completion
/// one at a time; readers only ever see the state between transitions.
#[derive(Clone, Debug)]
pub struct InteractionState {
	config: GraphConfig,
	snapshot: Option<Arc<SchemaSnapshot>>,
	layout: Layout,
	transform: ViewTransform,
	position_overrides: HashMap<EntityId, Position>,
	selected_entity: Option<EntityId>,
	selected_namespaces: BTreeSet<String>,
	search_term: String,
	drag: Option<NodeDrag>,
	pan: Option<PanDrag>,
	loading: bool,
	error: Option<String>,
	generation: u64,
}

impl Default for InteractionState {
	fn default() -> Self {
		Self::with_valid_config(GraphConfig::default())
	}
}

impl InteractionState {
	/// Empty session; nothing is shown until a snapshot loads. Fails if
	/// `config` does not pass [`GraphConfig::validate`].
	pub fn new(config: GraphConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::with_valid_config(config))
	}

	fn with_valid_config(config: GraphConfig) -> Self {
		Self {
			config,
			snapshot: None,
			layout: Layout::new(),
			transform: ViewTransform::IDENTITY,
			position_overrides: HashMap::new(),
			selected_entity: None,
			selected_namespaces: BTreeSet::new(),
			search_term: String::new(),
			drag: None,
			pan: None,
			loading: false,
			error: None,
			generation: 0,
		}
	}

	/// Active configuration.
	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Current snapshot, if one has loaded.
	pub fn snapshot(&self) -> Option<&SchemaSnapshot> {
		self.snapshot.as_deref()
	}

	/// Most recent layout engine output.
	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	/// Current zoom factor.
	pub fn zoom(&self) -> f64 {
		self.transform.k
	}

	/// Current pan offset.
	pub fn pan(&self) -> Position {
		self.transform.pan()
	}

	/// Current pan and zoom.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Manually dragged positions.
	pub fn position_overrides(&self) -> &HashMap<EntityId, Position> {
		&self.position_overrides
	}

	/// Selected entity.
	pub fn selected_entity(&self) -> Option<&EntityId> {
		self.selected_entity.as_ref()
	}

	/// Namespaces that pass the filter.
	pub fn selected_namespaces(&self) -> &BTreeSet<String> {
		&self.selected_namespaces
	}

	/// Current search term.
	pub fn search_term(&self) -> &str {
		&self.search_term
	}

	/// A node is being dragged.
	pub fn is_dragging_node(&self) -> bool {
		self.drag.is_some()
	}

	/// The canvas is being panned.
	pub fn is_panning_canvas(&self) -> bool {
		self.pan.is_some()
	}

	/// A fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// Message of the last failed fetch, cleared by the next success.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Where `id` is drawn: a manual override if present, else the layout.
	pub fn node_position(&self, id: &EntityId) -> Option<Position> {
		self.position_overrides
			.get(id)
			.or_else(|| self.layout.get(id))
			.copied()
	}

	/// Pin `id` at `position`, as a finished drag would.
	pub fn set_position_override(&mut self, id: EntityId, position: Position) {
		self.position_overrides.insert(id, position);
	}

	/// Start a fetch. Any earlier fetch still in flight becomes stale.
	pub fn begin_fetch(&mut self) -> FetchTicket {
		self.generation += 1;
		self.loading = true;
		FetchTicket(self.generation)
	}

	/// Apply the outcome of the fetch identified by `ticket`. Returns
	/// `false` when the result was stale and ignored.
	///
	/// On failure the previous snapshot and layout stay visible.
	pub fn finish_fetch(
		&mut self,
		ticket: FetchTicket,
		mode: LoadMode,
		result: Result<SchemaSnapshot, FetchError>,
	) -> bool {
		if ticket.0 != self.generation {
			debug!(
				"discarding stale fetch result {} (current {})",
				ticket.0, self.generation
			);
			return false;
		}
		self.loading = false;
		match result {
			Ok(snapshot) => {
				self.error = None;
				self.load_snapshot(snapshot, mode);
			}
			Err(err) => {
				warn!("schema fetch failed: {err}");
				self.error = Some(err.to_string());
			}
		}
		true
	}

	/// Replace the snapshot and recompute the layout.
	pub fn load_snapshot(&mut self, snapshot: SchemaSnapshot, mode: LoadMode) {
		let mode = if self.snapshot.is_none() {
			LoadMode::Initial
		} else {
			mode
		};
		self.layout = compute_layout(
			snapshot.entities(),
			snapshot.relationships(),
			&self.config.layout,
		);

		match mode {
			LoadMode::Initial => {
				self.selected_namespaces = snapshot
					.namespaces()
					.iter()
					.filter(|ns| ns.is_first_party())
					.map(|ns| ns.name.clone())
					.collect();
				self.position_overrides.clear();
				self.selected_entity = None;
				self.transform = ViewTransform::IDENTITY;
			}
			LoadMode::Refresh => {
				self.selected_namespaces
					.retain(|name| snapshot.has_namespace(name));
				self.position_overrides
					.retain(|id, _| snapshot.entity(id).is_some());
				if self
					.selected_entity
					.as_ref()
					.is_some_and(|id| snapshot.entity(id).is_none())
				{
					self.selected_entity = None;
				}
			}
		}
		self.drag = None;
		self.pan = None;

		info!(
			"loaded snapshot ({mode:?}): {} entities, {} namespaces selected",
			snapshot.entities().len(),
			self.selected_namespaces.len()
		);
		self.snapshot = Some(Arc::new(snapshot));
	}

	/// Consume the state and return it with `event` applied.
	pub fn reduce(mut self, event: GraphEvent) -> Self {
		self.handle(event);
		self
	}

	/// Apply one gesture.
	pub fn handle(&mut self, event: GraphEvent) {
		match event {
			GraphEvent::ClickEntity(id) => self.selected_entity = Some(id),
			GraphEvent::ClickBackground => self.selected_entity = None,
			GraphEvent::NodePointerDown { id, pointer } => {
				let Some(node) = self.node_position(&id) else {
					return;
				};
				self.pan = None;
				self.drag = Some(NodeDrag {
					offset: self.transform.screen_to_graph(pointer) - node,
					id,
				});
			}
			GraphEvent::BackgroundPointerDown { pointer } => {
				self.drag = None;
				self.pan = Some(PanDrag {
					anchor: pointer - self.transform.pan(),
					moved: false,
				});
			}
			GraphEvent::PointerMove { pointer } => {
				if let Some(drag) = &self.drag {
					let at = self.transform.screen_to_graph(pointer) - drag.offset;
					self.position_overrides.insert(drag.id.clone(), at);
				} else if let Some(pan) = &mut self.pan {
					let to = pointer - pan.anchor;
					self.transform.x = to.x;
					self.transform.y = to.y;
					pan.moved = true;
				}
			}
			GraphEvent::PointerUp => {
				// a press on the background that never moved is a click
				if self.pan.take().is_some_and(|pan| !pan.moved) {
					self.selected_entity = None;
				}
				self.drag = None;
			}
			GraphEvent::PointerLeave => {
				self.drag = None;
				self.pan = None;
			}
			// horizontal-only scrolls carry no vertical delta
			GraphEvent::Wheel { delta_y } if delta_y == 0.0 => {}
			GraphEvent::Wheel { delta_y } => {
				let view = &self.config.view;
				let factor = if delta_y > 0.0 {
					view.wheel_out_factor
				} else {
					view.wheel_in_factor
				};
				self.zoom_by(factor);
			}
			GraphEvent::ZoomIn => self.zoom_by(self.config.view.button_in_factor),
			GraphEvent::ZoomOut => self.zoom_by(self.config.view.button_out_factor),
			GraphEvent::ResetView => self.transform = ViewTransform::IDENTITY,
			GraphEvent::ToggleNamespace(name) => {
				if !self.selected_namespaces.remove(&name) {
					self.selected_namespaces.insert(name);
				}
			}
			GraphEvent::SelectNamespaces(preset) => {
				let Some(snapshot) = &self.snapshot else {
					self.selected_namespaces.clear();
					return;
				};
				self.selected_namespaces = snapshot
					.namespaces()
					.iter()
					.filter(|ns| match preset {
						NamespacePreset::All => true,
						NamespacePreset::FirstParty => ns.is_first_party(),
						NamespacePreset::None => false,
					})
					.map(|ns| ns.name.clone())
					.collect();
			}
			GraphEvent::Search(term) => self.search_term = term,
		}
	}

	fn zoom_by(&mut self, factor: f64) {
		self.transform.k = self.config.view.clamp_zoom(self.transform.k * factor);
	}
}
