use leptos::prelude::*;
use log::info;

use crate::components::schema_graph::SchemaGraph;
use crate::error::FetchError;
use crate::schema::{
	AttributeType, DEFAULT_HOST_GLOBAL, Entity, HostSchemaSource, NamespaceInfo, NamespaceSchema,
	Relationship, RelationshipKind, SchemaSource, StaticSchemaSource,
};

/// The host plugin API when running inside the modelling tool, generated
/// sample data otherwise.
#[derive(Clone, Debug)]
enum PageSource {
	Host(HostSchemaSource),
	Demo(StaticSchemaSource),
}

impl SchemaSource for PageSource {
	async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, FetchError> {
		match self {
			Self::Host(host) => host.list_namespaces().await,
			Self::Demo(demo) => demo.list_namespaces().await,
		}
	}

	async fn schema_for(&self, namespace: &str) -> Result<Option<NamespaceSchema>, FetchError> {
		match self {
			Self::Host(host) => host.schema_for(namespace).await,
			Self::Demo(demo) => demo.schema_for(namespace).await,
		}
	}
}

const ATTRIBUTE_TYPES: &[AttributeType] = &[
	AttributeType::String,
	AttributeType::Integer,
	AttributeType::Decimal,
	AttributeType::Boolean,
	AttributeType::DateTime,
	AttributeType::Enumeration,
];

/// Generate a sample schema: a few namespaces of entities with in-namespace
/// and cross-namespace associations.
fn generate_sample_schema() -> StaticSchemaSource {
	let layout: &[(&str, bool, usize)] = &[
		("Sales", false, 6),
		("Customers", false, 4),
		("Inventory", false, 5),
		("Charts", true, 2),
		("System", false, 3),
	];

	let mut all: Vec<Entity> = Vec::new();
	let mut schemas = Vec::new();
	for &(ns, _, count) in layout {
		let entities: Vec<Entity> = (0..count)
			.map(|i| {
				let seed = all.len() + i;
				let mut entity = Entity::new(format!("{ns}-{i}"), ns, &format!("{ns}Item{i}"));
				for a in 0..(1 + seed % 4) {
					let ty = ATTRIBUTE_TYPES[(rand_simple(seed * 7 + a) * ATTRIBUTE_TYPES.len() as f64) as usize];
					entity = entity.with_attribute(&format!("Field{a}"), ty);
				}
				if ns != "System" && seed % 5 == 0 {
					entity = entity.with_generalization("System.SystemItem0");
				}
				entity
			})
			.collect();
		all.extend(entities.iter().cloned());
		schemas.push(NamespaceSchema {
			entities,
			..NamespaceSchema::default()
		});
	}

	// each entity links to a pseudo-random earlier one
	for i in 1..all.len() {
		let target = (rand_simple(i) * i as f64) as usize;
		let (from, to) = (&all[i], &all[target]);
		let kind = if i % 3 == 0 {
			RelationshipKind::ReferenceSet
		} else {
			RelationshipKind::Reference
		};
		let rel = Relationship::new(
			&format!("rel-{i}"),
			&format!("{}_{}", from.name, to.name),
			from.qualified_name.as_str(),
			&to.id,
		)
		.with_kind(kind);
		let owner = layout.iter().position(|(ns, ..)| *ns == from.namespace).unwrap_or(0);
		if from.namespace == to.namespace {
			schemas[owner].relationships.push(rel);
		} else {
			schemas[owner].cross_namespace_relationships.push(rel);
		}
	}

	layout
		.iter()
		.zip(schemas)
		.fold(StaticSchemaSource::new(), |source, (&(ns, marketplace, _), schema)| {
			let info = if marketplace {
				NamespaceInfo::marketplace(ns)
			} else {
				NamespaceInfo::new(ns)
			};
			source.with_namespace(info, Some(schema))
		})
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// The graph over whichever source this page runs against. The host handle
/// is a JS value, so it is looked up here rather than captured by a parent.
#[component]
fn DomainModel() -> impl IntoView {
	let source = match HostSchemaSource::from_window(DEFAULT_HOST_GLOBAL) {
		Some(host) => PageSource::Host(host),
		None => {
			info!("no host API on window.{DEFAULT_HOST_GLOBAL}, using sample schema");
			PageSource::Demo(generate_sample_schema())
		}
	};

	view! { <SchemaGraph source=source fullscreen=true /> }
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<DomainModel />
				<div class="graph-overlay">
					<h1>"Domain Model"</h1>
					<p class="subtitle">"Drag entities to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::schema::fetch_snapshot;

	#[test]
	fn sample_schema_is_fully_resolvable() {
		let snapshot = block_on(fetch_snapshot(&generate_sample_schema(), &["System".to_string()])).unwrap();
		assert_eq!(snapshot.entities().len(), 20);
		assert_eq!(snapshot.relationships().len(), 19);
		assert!(snapshot.relationships().iter().all(|r| snapshot.endpoints(r).is_some()));
		assert!(snapshot.relationships().iter().any(|r| r.cross_namespace));
		assert!(snapshot.namespaces().iter().any(|ns| ns.is_system));
	}
}
