//! Tunables for layout, viewport and namespace classification.
//!
//! Every field has a default, so a host can hand over a partial JSON
//! document:
//!
//! ```json
//! { "layout": { "iterations": 80 }, "systemNamespaces": ["System", "Administration"] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the schema graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphConfig {
	/// Force layout parameters.
	pub layout: LayoutConfig,
	/// Zoom limits and step factors.
	pub view: ViewConfig,
	/// Namespace names reserved by the host platform.
	pub system_namespaces: Vec<String>,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			layout: LayoutConfig::default(),
			view: ViewConfig::default(),
			system_namespaces: vec!["System".to_string()],
		}
	}
}

impl GraphConfig {
	/// Parse and validate a JSON config document.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values the layout engine or viewport cannot work with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.layout.validate()?;
		self.view.validate()
	}

	/// Whether `name` is one of the reserved system namespaces.
	pub fn is_system_namespace(&self, name: &str) -> bool {
		self.system_namespaces.iter().any(|n| n == name)
	}
}

/// Parameters of the spring/repulsion simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
	/// Logical canvas width.
	pub canvas_width: f64,
	/// Logical canvas height.
	pub canvas_height: f64,
	/// Number of relaxation passes.
	pub iterations: usize,
	/// Coulomb constant for pairwise repulsion.
	pub repulsion_strength: f64,
	/// Hooke constant for relationship springs.
	pub attraction_strength: f64,
	/// Scale applied to the net force before it moves a node.
	pub damping: f64,
	/// Minimum distance from the left and right edges.
	pub margin_x: f64,
	/// Minimum distance from the top and bottom edges.
	pub margin_y: f64,
	/// Floor for pair distance in the repulsion term.
	pub min_distance: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			canvas_width: 1200.0,
			canvas_height: 800.0,
			iterations: 50,
			repulsion_strength: 5000.0,
			attraction_strength: 0.01,
			damping: 0.1,
			margin_x: 100.0,
			margin_y: 50.0,
			min_distance: 1.0,
		}
	}
}

impl LayoutConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
			return Err(ConfigError::Invalid(format!(
				"canvas must be positive, got {}x{}",
				self.canvas_width, self.canvas_height
			)));
		}
		if self.margin_x < 0.0 || self.margin_y < 0.0 {
			return Err(ConfigError::Invalid("margins must not be negative".into()));
		}
		if 2.0 * self.margin_x >= self.canvas_width || 2.0 * self.margin_y >= self.canvas_height {
			return Err(ConfigError::Invalid(
				"margins leave no room on the canvas".into(),
			));
		}
		if !(self.damping > 0.0 && self.damping <= 1.0) {
			return Err(ConfigError::Invalid(format!(
				"damping must be in (0, 1], got {}",
				self.damping
			)));
		}
		if self.min_distance <= 0.0 {
			return Err(ConfigError::Invalid("min distance must be positive".into()));
		}
		Ok(())
	}
}

/// Zoom limits and per-gesture zoom factors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
	/// Lowest zoom factor.
	pub min_zoom: f64,
	/// Highest zoom factor.
	pub max_zoom: f64,
	/// Factor applied when the wheel scrolls towards the user.
	pub wheel_in_factor: f64,
	/// Factor applied when the wheel scrolls away from the user.
	pub wheel_out_factor: f64,
	/// Factor for the zoom-in button.
	pub button_in_factor: f64,
	/// Factor for the zoom-out button.
	pub button_out_factor: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			min_zoom: 0.2,
			max_zoom: 3.0,
			wheel_in_factor: 1.1,
			wheel_out_factor: 0.9,
			button_in_factor: 1.2,
			button_out_factor: 0.8,
		}
	}
}

impl ViewConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
			return Err(ConfigError::Invalid(format!(
				"zoom bounds [{}, {}] are invalid",
				self.min_zoom, self.max_zoom
			)));
		}
		Ok(())
	}

	/// Clamp a zoom factor into the configured bounds.
	pub fn clamp_zoom(&self, zoom: f64) -> f64 {
		zoom.clamp(self.min_zoom, self.max_zoom)
	}
}
