//! Layout engine, interaction state machine and the derived render set.

mod details;
mod layout;
mod state;
mod types;
mod view;

pub use details::{Direction, EntityDetails, RelatedRelationship, entity_details};
pub use layout::{Layout, compute_layout};
pub use state::{FetchTicket, GraphEvent, InteractionState, LoadMode, NamespacePreset};
pub use types::{Position, ViewTransform};
pub use view::{
	EdgeView, GraphView, NamespaceOption, NodeView, StatusCounts, derive_view,
	filtered_entities, filtered_relationships, highlighted_relationships,
};
