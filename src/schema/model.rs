use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an entity, unique within a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
	/// Borrow the raw identifier.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for EntityId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<String> for EntityId {
	fn from(s: String) -> Self {
		Self(s)
	}
}

/// A reference to an entity by either its identifier or its qualified
/// name. Which form is used is up to the host, so resolution goes through
/// [`EntityIndex`](super::EntityIndex).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRef(pub String);

impl EntityRef {
	/// Borrow the raw key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for EntityRef {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<&EntityId> for EntityRef {
	fn from(id: &EntityId) -> Self {
		Self(id.0.clone())
	}
}

/// Closed set of attribute type tags. Unrecognised tags read as `Unknown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
	/// Text.
	String,
	/// 32-bit integer.
	Integer,
	/// 64-bit integer.
	Long,
	/// Fixed-point decimal.
	Decimal,
	/// True or false.
	Boolean,
	/// Date and time of day.
	DateTime,
	/// Integer assigned by the host on creation.
	AutoNumber,
	/// Opaque bytes.
	Binary,
	/// One-way hashed text, such as a password.
	HashedString,
	/// One of a fixed set of named values.
	Enumeration,
	/// Any tag not listed above.
	#[default]
	#[serde(other)]
	Unknown,
}

impl AttributeType {
	/// Label used in the detail panel.
	pub fn label(self) -> &'static str {
		match self {
			Self::String => "String",
			Self::Integer => "Integer",
			Self::Long => "Long",
			Self::Decimal => "Decimal",
			Self::Boolean => "Boolean",
			Self::DateTime => "Date and time",
			Self::AutoNumber => "Autonumber",
			Self::Binary => "Binary",
			Self::HashedString => "Hashed string",
			Self::Enumeration => "Enumeration",
			Self::Unknown => "Unknown",
		}
	}
}

/// One named, typed attribute of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
	/// Attribute name.
	pub name: String,
	/// Type tag.
	#[serde(rename = "type", default)]
	pub attribute_type: AttributeType,
}

/// A typed record definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	/// Unique identifier.
	pub id: EntityId,
	/// Display name.
	pub name: String,
	/// Owning namespace.
	pub namespace: String,
	/// `Namespace.Name`, used as an alternate join key.
	pub qualified_name: String,
	/// Attributes in declaration order.
	#[serde(default)]
	pub attributes: Vec<Attribute>,
	/// Parent entity, by id or qualified name.
	#[serde(default)]
	pub generalization: Option<EntityRef>,
}

impl Entity {
	/// Build an entity with no attributes; the qualified name is derived.
	pub fn new(id: impl Into<EntityId>, namespace: &str, name: &str) -> Self {
		Self {
			id: id.into(),
			name: name.to_string(),
			namespace: namespace.to_string(),
			qualified_name: format!("{namespace}.{name}"),
			attributes: Vec::new(),
			generalization: None,
		}
	}

	/// Builder: append an attribute.
	pub fn with_attribute(mut self, name: &str, attribute_type: AttributeType) -> Self {
		self.attributes.push(Attribute {
			name: name.to_string(),
			attribute_type,
		});
		self
	}

	/// Builder: set the generalization reference.
	pub fn with_generalization(mut self, parent: impl Into<EntityRef>) -> Self {
		self.generalization = Some(parent.into());
		self
	}
}

/// Multiplicity of an association.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
	/// Single-valued.
	#[default]
	Reference,
	/// Many-to-many.
	ReferenceSet,
}

/// Which side owns the association.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipOwner {
	/// The parent (source) side.
	#[default]
	Default,
	/// Both sides.
	Both,
}

/// A directed association between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	/// Unique identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Source side.
	pub parent: EntityRef,
	/// Target side.
	pub child: EntityRef,
	/// Association kind.
	#[serde(default)]
	pub kind: RelationshipKind,
	/// Owner marker.
	#[serde(default)]
	pub owner: RelationshipOwner,
	/// Whether the endpoints live in different namespaces.
	#[serde(default)]
	pub cross_namespace: bool,
}

impl Relationship {
	/// Build a single-valued relationship.
	pub fn new(id: &str, name: &str, parent: impl Into<EntityRef>, child: impl Into<EntityRef>) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			parent: parent.into(),
			child: child.into(),
			kind: RelationshipKind::Reference,
			owner: RelationshipOwner::Default,
			cross_namespace: false,
		}
	}

	/// Builder: set the kind.
	pub fn with_kind(mut self, kind: RelationshipKind) -> Self {
		self.kind = kind;
		self
	}
}

/// A namespace as the host lists it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
	/// Namespace name.
	pub name: String,
	/// Installed from the marketplace.
	#[serde(default)]
	pub from_marketplace: bool,
}

impl NamespaceInfo {
	/// First-party namespace.
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			from_marketplace: false,
		}
	}

	/// Marketplace namespace.
	pub fn marketplace(name: &str) -> Self {
		Self {
			name: name.to_string(),
			from_marketplace: true,
		}
	}
}

/// One namespace's schema as returned by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceSchema {
	/// Entities declared in the namespace.
	pub entities: Vec<Entity>,
	/// Relationships within the namespace.
	pub relationships: Vec<Relationship>,
	/// Relationships reaching into other namespaces.
	pub cross_namespace_relationships: Vec<Relationship>,
}

/// A namespace as seen by the rest of the crate, derived once per fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDescriptor {
	/// Namespace name, unique.
	pub name: String,
	/// Installed from the marketplace.
	pub from_marketplace: bool,
	/// Name matches a reserved system namespace.
	pub is_system: bool,
}

impl NamespaceDescriptor {
	/// First-party namespaces are shown by default.
	pub fn is_first_party(&self) -> bool {
		!self.from_marketplace && !self.is_system
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entity_reads_host_json() {
		let entity: Entity = serde_json::from_str(
			r#"{
				"id": "e-1",
				"name": "Order",
				"namespace": "Sales",
				"qualifiedName": "Sales.Order",
				"attributes": [
					{ "name": "Total", "type": "Decimal" },
					{ "name": "Shape", "type": "Polygon" }
				],
				"generalization": "System.User"
			}"#,
		)
		.unwrap();
		assert_eq!(entity.id, EntityId::from("e-1"));
		assert_eq!(entity.attributes[0].attribute_type, AttributeType::Decimal);
		assert_eq!(entity.attributes[1].attribute_type, AttributeType::Unknown);
		assert_eq!(entity.generalization, Some(EntityRef::from("System.User")));
	}

	#[test]
	fn relationship_defaults() {
		let rel: Relationship = serde_json::from_str(
			r#"{ "id": "r", "name": "Order_Customer", "parent": "Sales.Order", "child": "c-1" }"#,
		)
		.unwrap();
		assert_eq!(rel.kind, RelationshipKind::Reference);
		assert_eq!(rel.owner, RelationshipOwner::Default);
		assert!(!rel.cross_namespace);
	}
}
