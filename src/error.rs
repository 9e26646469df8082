//! Error types for schema fetching and configuration.

use thiserror::Error;

/// A failed call to the host collaborator.
///
/// The `Display` text is what the status strip shows to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
	/// Enumerating namespaces was rejected or timed out.
	#[error("failed to list namespaces: {0}")]
	ListNamespaces(String),

	/// Retrieving one namespace's schema was rejected or timed out.
	#[error("failed to load schema for namespace {namespace}: {detail}")]
	Schema {
		/// Namespace whose schema was requested.
		namespace: String,
		/// Failure detail reported by the host.
		detail: String,
	},

	/// The host answered, but not with data we can read.
	#[error("host returned malformed data: {0}")]
	Malformed(String),
}

/// Invalid or unreadable [`GraphConfig`](crate::config::GraphConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
	/// The JSON document did not parse.
	#[error("config JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A value is out of range.
	#[error("invalid config: {0}")]
	Invalid(String),
}
