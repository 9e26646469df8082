use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::model::{Entity, EntityId, EntityRef, NamespaceDescriptor, Relationship};

/// Dual-key lookup from identifier *or* qualified name to a position in an
/// entity slice. Built once per entity list.
#[derive(Clone, Debug, Default)]
pub struct EntityIndex {
	by_id: HashMap<String, usize>,
	by_qualified_name: HashMap<String, usize>,
}

impl EntityIndex {
	/// Index `entities` by id and by qualified name; the first occurrence of
	/// a key wins.
	pub fn build(entities: &[Entity]) -> Self {
		let mut by_id = HashMap::with_capacity(entities.len());
		let mut by_qualified_name = HashMap::with_capacity(entities.len());
		for (i, entity) in entities.iter().enumerate() {
			by_id.entry(entity.id.0.clone()).or_insert(i);
			by_qualified_name
				.entry(entity.qualified_name.clone())
				.or_insert(i);
		}
		Self {
			by_id,
			by_qualified_name,
		}
	}

	/// Position of the entity `reference` points at. Ids take precedence
	/// over qualified names.
	pub fn resolve(&self, reference: &EntityRef) -> Option<usize> {
		let key = reference.as_str();
		self.by_id
			.get(key)
			.or_else(|| self.by_qualified_name.get(key))
			.copied()
	}

	/// Resolve both endpoints of a relationship.
	pub fn resolve_relationship(&self, relationship: &Relationship) -> Option<(usize, usize)> {
		Some((
			self.resolve(&relationship.parent)?,
			self.resolve(&relationship.child)?,
		))
	}
}

/// One complete, immutable fetch of entities, relationships and namespaces.
#[derive(Clone, Debug, Default)]
pub struct SchemaSnapshot {
	namespaces: Vec<NamespaceDescriptor>,
	entities: Vec<Entity>,
	relationships: Vec<Relationship>,
	index: EntityIndex,
}

/// Result of walking an entity's generalization references.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralizationChain<'a> {
	/// Ancestors, nearest first.
	pub ancestors: Vec<&'a Entity>,
	/// The walk stopped because it reached an entity it had already seen.
	pub cyclic: bool,
}

impl SchemaSnapshot {
	/// Assemble a snapshot. Later entities with an already-seen id and later
	/// relationships with an already-seen id are dropped. The cross-namespace
	/// flag is recomputed for every relationship whose endpoints resolve.
	pub fn new(
		namespaces: Vec<NamespaceDescriptor>,
		entities: Vec<Entity>,
		relationships: Vec<Relationship>,
	) -> Self {
		let mut seen = HashSet::new();
		let entities: Vec<Entity> = entities
			.into_iter()
			.filter(|e| {
				let fresh = seen.insert(e.id.clone());
				if !fresh {
					warn!("dropping duplicate entity {}", e.id);
				}
				fresh
			})
			.collect();
		let index = EntityIndex::build(&entities);

		let mut seen = HashSet::new();
		let relationships: Vec<Relationship> = relationships
			.into_iter()
			.filter(|r| seen.insert(r.id.clone()))
			.map(|mut r| {
				if let Some((p, c)) = index.resolve_relationship(&r) {
					r.cross_namespace = entities[p].namespace != entities[c].namespace;
				}
				r
			})
			.collect();

		debug!(
			"snapshot: {} namespaces, {} entities, {} relationships",
			namespaces.len(),
			entities.len(),
			relationships.len()
		);

		Self {
			namespaces,
			entities,
			relationships,
			index,
		}
	}

	/// Namespace descriptors in listing order.
	pub fn namespaces(&self) -> &[NamespaceDescriptor] {
		&self.namespaces
	}

	/// All entities in fetch order.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// All relationships in fetch order, renderable or not.
	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	/// The canonical lookup index over [`entities`](Self::entities).
	pub fn index(&self) -> &EntityIndex {
		&self.index
	}

	/// Whether a namespace of this name is part of the snapshot.
	pub fn has_namespace(&self, name: &str) -> bool {
		self.namespaces.iter().any(|ns| ns.name == name)
	}

	/// Look up an entity by id or qualified name.
	pub fn resolve(&self, reference: &EntityRef) -> Option<&Entity> {
		self.index.resolve(reference).map(|i| &self.entities[i])
	}

	/// Look up an entity by id.
	pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
		self.resolve(&EntityRef::from(id)).filter(|e| &e.id == id)
	}

	/// Canonical ids of both endpoints, if both resolve.
	pub fn endpoints(&self, relationship: &Relationship) -> Option<(&EntityId, &EntityId)> {
		let (p, c) = self.index.resolve_relationship(relationship)?;
		Some((&self.entities[p].id, &self.entities[c].id))
	}

	/// Relationships with `id` at either end.
	pub fn relationships_of<'a>(&'a self, id: &'a EntityId) -> impl Iterator<Item = &'a Relationship> + 'a {
		self.relationships.iter().filter(move |r| {
			self.endpoints(r)
				.is_some_and(|(p, c)| p == id || c == id)
		})
	}

	/// Walk generalization references upwards from `id`. The source does
	/// not guarantee acyclicity, so the walk stops on the first repeat.
	pub fn generalization_chain(&self, id: &EntityId) -> GeneralizationChain<'_> {
		let mut ancestors = Vec::new();
		let mut visited = HashSet::new();
		visited.insert(id.clone());
		let mut current = self.entity(id);
		while let Some(parent) = current
			.and_then(|e| e.generalization.as_ref())
			.and_then(|r| self.resolve(r))
		{
			if !visited.insert(parent.id.clone()) {
				return GeneralizationChain {
					ancestors,
					cyclic: true,
				};
			}
			ancestors.push(parent);
			current = Some(parent);
		}
		GeneralizationChain {
			ancestors,
			cyclic: false,
		}
	}
}
