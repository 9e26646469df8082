use js_sys::{Function, JSON, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::model::{NamespaceInfo, NamespaceSchema};
use super::source::SchemaSource;
use crate::error::FetchError;

/// Name of the global the host plugin installs on `window`.
pub const DEFAULT_HOST_GLOBAL: &str = "schemaHost";

/// The modelling tool's plugin API, reached through a JS object exposing
/// `listNamespaces()` and `getSchemaFor(name)`, each returning a promise of
/// plain JSON-compatible data.
#[derive(Clone, Debug)]
pub struct HostSchemaSource {
	host: JsValue,
}

impl HostSchemaSource {
	/// Look up the host object on `window`; `None` outside the host.
	pub fn from_window(global: &str) -> Option<Self> {
		let window = web_sys::window()?;
		let host = Reflect::get(&window, &JsValue::from_str(global)).ok()?;
		if host.is_undefined() || host.is_null() {
			return None;
		}
		Some(Self { host })
	}

	async fn call(&self, method: &str, args: &[JsValue]) -> Result<JsValue, String> {
		let func: Function = Reflect::get(&self.host, &JsValue::from_str(method))
			.map_err(describe)?
			.dyn_into()
			.map_err(|_| format!("host has no function {method}"))?;
		let args: js_sys::Array = args.iter().collect();
		let ret = func.apply(&self.host, &args).map_err(describe)?;
		let promise = Promise::resolve(&ret);
		JsFuture::from(promise).await.map_err(describe)
	}
}

fn describe(err: JsValue) -> String {
	err.as_string()
		.or_else(|| {
			err.dyn_ref::<js_sys::Error>()
				.map(|e| String::from(e.message()))
		})
		.unwrap_or_else(|| format!("{err:?}"))
}

/// JSON text of a host answer; `None` for `undefined`, which has no JSON
/// form.
fn to_json(value: &JsValue) -> Result<Option<String>, FetchError> {
	if value.is_undefined() {
		return Ok(None);
	}
	let json = JSON::stringify(value).map_err(|e| FetchError::Malformed(describe(e)))?;
	Ok(Some(String::from(json)))
}

fn malformed(err: serde_json::Error) -> FetchError {
	FetchError::Malformed(err.to_string())
}

fn parse_namespaces(json: Option<&str>) -> Result<Vec<NamespaceInfo>, FetchError> {
	let json = json.ok_or_else(|| FetchError::Malformed("host returned undefined".into()))?;
	serde_json::from_str(json).map_err(malformed)
}

/// A missing (`undefined` or `null`) schema means the namespace has none.
fn parse_schema(json: Option<&str>) -> Result<Option<NamespaceSchema>, FetchError> {
	match json {
		None => Ok(None),
		Some(json) => serde_json::from_str(json).map_err(malformed),
	}
}

impl SchemaSource for HostSchemaSource {
	async fn list_namespaces(&self) -> Result<Vec<NamespaceInfo>, FetchError> {
		let value = self
			.call("listNamespaces", &[])
			.await
			.map_err(FetchError::ListNamespaces)?;
		parse_namespaces(to_json(&value)?.as_deref())
	}

	async fn schema_for(&self, namespace: &str) -> Result<Option<NamespaceSchema>, FetchError> {
		let value = self
			.call("getSchemaFor", &[JsValue::from_str(namespace)])
			.await
			.map_err(|detail| FetchError::Schema {
				namespace: namespace.to_string(),
				detail,
			})?;
		parse_schema(to_json(&value)?.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_schema_means_none() {
		assert_eq!(parse_schema(None), Ok(None));
		assert_eq!(parse_schema(Some("null")), Ok(None));
	}

	#[test]
	fn schema_reads_partial_document() {
		let schema = parse_schema(Some(
			r#"{ "entities": [{ "id": "e1", "name": "Order", "namespace": "Sales", "qualifiedName": "Sales.Order" }] }"#,
		))
		.unwrap()
		.unwrap();
		assert_eq!(schema.entities.len(), 1);
		assert!(schema.relationships.is_empty());
	}

	#[test]
	fn unreadable_answers_are_malformed() {
		assert!(matches!(
			parse_schema(Some(r#"{ "entities": 3 }"#)),
			Err(FetchError::Malformed(_))
		));
		assert!(matches!(
			parse_namespaces(Some(r#"[{ "fromMarketplace": true }]"#)),
			Err(FetchError::Malformed(_))
		));
		assert!(matches!(parse_namespaces(None), Err(FetchError::Malformed(_))));
	}

	#[test]
	fn namespaces_default_to_first_party() {
		assert_eq!(
			parse_namespaces(Some(r#"[{ "name": "Sales" }, { "name": "Charts", "fromMarketplace": true }]"#)),
			Ok(vec![NamespaceInfo::new("Sales"), NamespaceInfo::marketplace("Charts")])
		);
	}
}
