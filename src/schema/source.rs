use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::model::{NamespaceDescriptor, NamespaceInfo, NamespaceSchema};
use super::snapshot::SchemaSnapshot;
use crate::error::FetchError;

/// The host collaborator that hands over raw schema data.
#[allow(async_fn_in_trait)]
pub trait SchemaSource {
	/// Enumerate the namespaces of the current model.
	async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, FetchError>;

	/// Schema of one namespace; `None` when it has none.
	async fn schema_for(&self, namespace: &str) -> Result<Option<NamespaceSchema>, FetchError>;
}

/// Fetch every namespace and assemble a [`SchemaSnapshot`].
///
/// Namespaces are fetched one at a time in listing order. Any rejected call
/// aborts the whole fetch; a namespace without a schema contributes nothing.
pub async fn fetch_snapshot<S: SchemaSource>(
	source: &S,
	system_namespaces: &[String],
) -> Result<SchemaSnapshot, FetchError> {
	let listed = source.list_namespaces().await?;

	let mut namespaces = Vec::with_capacity(listed.len());
	let mut entities = Vec::new();
	let mut relationships = Vec::new();
	for info in listed {
		if namespaces.iter().any(|ns: &NamespaceDescriptor| ns.name == info.name) {
			continue;
		}
		match source.schema_for(&info.name).await? {
			Some(schema) => {
				entities.extend(schema.entities);
				relationships.extend(schema.relationships);
				relationships.extend(schema.cross_namespace_relationships);
			}
			None => debug!("namespace {} has no schema", info.name),
		}
		namespaces.push(NamespaceDescriptor {
			is_system: system_namespaces.iter().any(|s| *s == info.name),
			name: info.name,
			from_marketplace: info.from_marketplace,
		});
	}

	let snapshot = SchemaSnapshot::new(namespaces, entities, relationships);
	info!(
		"fetched schema: {} namespaces, {} entities, {} relationships",
		snapshot.namespaces().len(),
		snapshot.entities().len(),
		snapshot.relationships().len()
	);
	Ok(snapshot)
}

/// One namespace entry of a [`StaticSchemaSource`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticNamespace {
	/// Listing entry.
	#[serde(flatten)]
	pub info: NamespaceInfo,
	/// Schema, if the namespace has one.
	#[serde(default)]
	pub schema: Option<NamespaceSchema>,
}

/// In-memory source, for demo data and for hosts that push JSON up front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchemaSource {
	namespaces: Vec<StaticNamespace>,
}

impl StaticSchemaSource {
	/// Empty source.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: add a namespace.
	pub fn with_namespace(mut self, info: NamespaceInfo, schema: Option<NamespaceSchema>) -> Self {
		self.namespaces.push(StaticNamespace { info, schema });
		self
	}

	/// Read a JSON array of namespaces with inline schemas.
	pub fn from_json(json: &str) -> Result<Self, FetchError> {
		serde_json::from_str(json).map_err(|e| FetchError::Malformed(e.to_string()))
	}
}

impl SchemaSource for StaticSchemaSource {
	async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, FetchError> {
		Ok(self.namespaces.iter().map(|ns| ns.info.clone()).collect())
	}

	async fn schema_for(&self, namespace: &str) -> Result<Option<NamespaceSchema>, FetchError> {
		Ok(self
			.namespaces
			.iter()
			.find(|ns| ns.info.name == namespace)
			.and_then(|ns| ns.schema.clone()))
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::schema::model::{Entity, Relationship};

	struct Rejecting;

	impl SchemaSource for Rejecting {
		async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, FetchError> {
			Ok(vec![NamespaceInfo::new("App")])
		}

		async fn schema_for(&self, namespace: &str) -> Result<Option<NamespaceSchema>, FetchError> {
			Err(FetchError::Schema {
				namespace: namespace.to_string(),
				detail: "timed out".to_string(),
			})
		}
	}

	fn system() -> Vec<String> {
		vec!["System".to_string()]
	}

	#[test]
	fn assembles_descriptors_and_merges_namespaces() {
		let cross = Relationship::new("r-x", "Order_Account", "Sales.Order", "System.Account");
		let source = StaticSchemaSource::new()
			.with_namespace(
				NamespaceInfo::new("Sales"),
				Some(NamespaceSchema {
					entities: vec![Entity::new("o", "Sales", "Order")],
					relationships: vec![],
					cross_namespace_relationships: vec![cross.clone()],
				}),
			)
			.with_namespace(NamespaceInfo::marketplace("Charts"), None)
			.with_namespace(
				NamespaceInfo::new("System"),
				Some(NamespaceSchema {
					entities: vec![Entity::new("a", "System", "Account")],
					relationships: vec![],
					cross_namespace_relationships: vec![cross],
				}),
			);

		let snap = block_on(fetch_snapshot(&source, &system())).unwrap();
		let flags: Vec<(&str, bool, bool)> = snap
			.namespaces()
			.iter()
			.map(|ns| (ns.name.as_str(), ns.from_marketplace, ns.is_system))
			.collect();
		assert_eq!(
			flags,
			vec![("Sales", false, false), ("Charts", true, false), ("System", false, true)]
		);
		assert_eq!(snap.entities().len(), 2);
		assert_eq!(snap.relationships().len(), 1);
		assert!(snap.relationships()[0].cross_namespace);
	}

	#[test]
	fn rejection_aborts_the_fetch() {
		let err = block_on(fetch_snapshot(&Rejecting, &system())).unwrap_err();
		assert_eq!(
			err.to_string(),
			"failed to load schema for namespace App: timed out"
		);
	}

	#[test]
	fn reads_json_source() {
		let source = StaticSchemaSource::from_json(
			r#"[
				{ "name": "App", "schema": { "entities": [
					{ "id": "1", "name": "Order", "namespace": "App", "qualifiedName": "App.Order" }
				] } },
				{ "name": "Lib", "fromMarketplace": true }
			]"#,
		)
		.unwrap();
		let snap = block_on(fetch_snapshot(&source, &system())).unwrap();
		assert_eq!(snap.entities().len(), 1);
		assert!(snap.namespaces()[1].from_marketplace);
	}

	#[test]
	fn malformed_json_is_a_fetch_error() {
		assert!(matches!(
			StaticSchemaSource::from_json("{"),
			Err(FetchError::Malformed(_))
		));
	}
}
