//! Schema data model, snapshot assembly and the host collaborator.

mod host;
mod model;
mod snapshot;
mod source;

pub use host::{DEFAULT_HOST_GLOBAL, HostSchemaSource};
pub use model::{
	Attribute, AttributeType, Entity, EntityId, EntityRef, NamespaceDescriptor, NamespaceInfo,
	NamespaceSchema, Relationship, RelationshipKind, RelationshipOwner,
};
pub use snapshot::{EntityIndex, GeneralizationChain, SchemaSnapshot};
pub use source::{SchemaSource, StaticNamespace, StaticSchemaSource, fetch_snapshot};
