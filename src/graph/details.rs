use crate::schema::{Attribute, EntityId, RelationshipKind, SchemaSnapshot};

/// Which end of a relationship the inspected entity sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// The entity is the parent (source).
	Outgoing,
	/// The entity is the child (target).
	Incoming,
	/// Both ends are the entity itself.
	SelfReference,
}

/// One relationship in the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedRelationship {
	/// Relationship name.
	pub name: String,
	/// Association kind.
	pub kind: RelationshipKind,
	/// Side of the inspected entity.
	pub direction: Direction,
	/// Qualified name of the entity at the other end.
	pub other: String,
	/// Endpoints live in different namespaces.
	pub cross_namespace: bool,
}

/// Content of the entity detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDetails {
	/// Entity id.
	pub id: EntityId,
	/// Display name.
	pub name: String,
	/// Qualified name.
	pub qualified_name: String,
	/// Attributes in declaration order.
	pub attributes: Vec<Attribute>,
	/// Qualified names of ancestors, nearest first.
	pub generalizations: Vec<String>,
	/// The generalization walk ran into a cycle.
	pub cyclic_generalization: bool,
	/// Relationships touching the entity.
	pub relationships: Vec<RelatedRelationship>,
}

/// Gather the detail panel content for `id`.
pub fn entity_details(snapshot: &SchemaSnapshot, id: &EntityId) -> Option<EntityDetails> {
	let entity = snapshot.entity(id)?;
	let chain = snapshot.generalization_chain(id);

	let relationships = snapshot
		.relationships_of(id)
		.filter_map(|r| {
			let (from, to) = snapshot.endpoints(r)?;
			let (direction, other) = match (from == id, to == id) {
				(true, true) => (Direction::SelfReference, from),
				(true, false) => (Direction::Outgoing, to),
				_ => (Direction::Incoming, from),
			};
			Some(RelatedRelationship {
				name: r.name.clone(),
				kind: r.kind,
				direction,
				other: snapshot.entity(other)?.qualified_name.clone(),
				cross_namespace: r.cross_namespace,
			})
		})
		.collect();

	Some(EntityDetails {
		id: entity.id.clone(),
		name: entity.name.clone(),
		qualified_name: entity.qualified_name.clone(),
		attributes: entity.attributes.clone(),
		generalizations: chain
			.ancestors
			.iter()
			.map(|e| e.qualified_name.clone())
			.collect(),
		cyclic_generalization: chain.cyclic,
		relationships,
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::schema::{AttributeType, Entity, NamespaceDescriptor, Relationship};

	fn snapshot() -> SchemaSnapshot {
		SchemaSnapshot::new(
			vec![
				NamespaceDescriptor {
					name: "Sales".into(),
					from_marketplace: false,
					is_system: false,
				},
				NamespaceDescriptor {
					name: "System".into(),
					from_marketplace: false,
					is_system: true,
				},
			],
			vec![
				Entity::new("user", "System", "User"),
				Entity::new("acct", "Sales", "Account")
					.with_attribute("Email", AttributeType::String)
					.with_attribute("Credit", AttributeType::Decimal)
					.with_generalization("System.User"),
				Entity::new("order", "Sales", "Order"),
			],
			vec![
				Relationship::new("r1", "Order_Account", "order", "Sales.Account"),
				Relationship::new("r2", "Account_Manager", "acct", "acct"),
				Relationship::new("r3", "Account_Tags", "Sales.Account", "System.User")
					.with_kind(RelationshipKind::ReferenceSet),
			],
		)
	}

	#[test]
	fn collects_attributes_chain_and_relationships() {
		let details = entity_details(&snapshot(), &"acct".into()).unwrap();
		assert_eq!(details.qualified_name, "Sales.Account");
		assert_eq!(details.attributes.len(), 2);
		assert_eq!(details.generalizations, vec!["System.User".to_string()]);
		assert!(!details.cyclic_generalization);

		let rels: Vec<(&str, Direction, &str, bool)> = details
			.relationships
			.iter()
			.map(|r| (r.name.as_str(), r.direction, r.other.as_str(), r.cross_namespace))
			.collect();
		assert_eq!(
			rels,
			vec![
				("Order_Account", Direction::Incoming, "Sales.Order", false),
				("Account_Manager", Direction::SelfReference, "Sales.Account", false),
				("Account_Tags", Direction::Outgoing, "System.User", true),
			]
		);
	}

	#[test]
	fn unknown_entity_has_no_details() {
		assert!(entity_details(&snapshot(), &"nope".into()).is_none());
	}
}
