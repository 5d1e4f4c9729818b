//! Static configuration: service location, layout constants and the category palette.

use std::collections::HashMap;

/// Fallback used when `CONCEPT_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Label used for concepts without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Application-wide settings, provided through Leptos context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Base URL of the concept service, without a trailing slash.
	pub api_url: String,
}

impl AppConfig {
	/// Reads the service URL baked in at compile time.
	pub fn from_env() -> Self {
		let api_url = option_env!("CONCEPT_API_URL").unwrap_or(DEFAULT_API_URL);
		Self {
			api_url: api_url.trim_end_matches('/').to_string(),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_url: DEFAULT_API_URL.to_string(),
		}
	}
}

/// Physics constants for the force layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Rest length of every link spring, in world units.
	pub link_distance: f64,
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Barnes-Hut opening angle. Cells narrower than `theta * distance` are approximated.
	pub theta: f64,
	/// Pulls the node centroid onto the surface center; 1.0 recenters fully each tick.
	pub center_strength: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha a settled layout is raised to when the surface changes size.
	pub resize_alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -200.0,
			theta: 0.9,
			center_strength: 1.0,
			alpha_min,
			alpha_decay: 1.0 - f64::powf(alpha_min, 1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
		}
	}
}

/// Pan/zoom limits and timings.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Duration of animated zooms and resets.
	pub transition_ms: f64,
	/// Quiet period after the last wheel event before a wheel gesture ends.
	pub wheel_gesture_ms: f64,
	pub zoom_in_factor: f64,
	pub zoom_out_factor: f64,
	/// Wheel delta (in pixels) to zoom exponent.
	pub wheel_sensitivity: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 4.0,
			transition_ms: 300.0,
			wheel_gesture_ms: 150.0,
			zoom_in_factor: 1.2,
			zoom_out_factor: 0.8,
			wheel_sensitivity: 0.002,
		}
	}
}

/// Category name to fill color, with a neutral default for everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryPalette {
	colors: HashMap<String, String>,
	fallback: String,
}

impl CategoryPalette {
	pub fn new(fallback: impl Into<String>) -> Self {
		Self {
			colors: HashMap::new(),
			fallback: fallback.into(),
		}
	}

	pub fn with(mut self, category: impl Into<String>, color: impl Into<String>) -> Self {
		self.colors.insert(category.into(), color.into());
		self
	}

	/// Color for `category`, or the fallback when the category is unmapped.
	pub fn color_for(&self, category: &str) -> &str {
		self.colors
			.get(category)
			.map(String::as_str)
			.unwrap_or(&self.fallback)
	}
}

impl Default for CategoryPalette {
	fn default() -> Self {
		Self::new("#CBD5E0")
			.with("核心概念", "#4299E1")
			.with("五位", "#48BB78")
			.with("色法", "#F6AD55")
			.with("心法", "#FC8181")
			.with("心所法", "#B794F4")
			.with("心不相应行法", "#9AE6B4")
			.with("无为法", "#FBD38D")
	}
}

/// Everything the graph view needs besides data and surface size.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub viewport: ViewportConfig,
	pub palette: CategoryPalette,
	/// Node circle radius, in world units.
	pub node_radius: f64,
	/// Horizontal distance from a node's center to its label, in world units.
	pub label_offset: f64,
	/// Pointer travel (screen pixels) beyond which a press on a node is a drag, not a click.
	pub click_tolerance: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			viewport: ViewportConfig::default(),
			palette: CategoryPalette::default(),
			node_radius: 10.0,
			label_offset: 12.0,
			click_tolerance: 3.0,
		}
	}
}
