//! Alpha-driven force layout.
//!
//! Each tick lets every registered [`Force`] nudge node velocities in
//! proportion to the current alpha, then integrates positions. Alpha decays
//! geometrically toward its target, so a graph left alone cools down and the
//! simulation goes idle; holding a non-zero target (while dragging) keeps it
//! warm.

mod forces;
mod quadtree;

pub use forces::{CenterForce, ChargeForce, LinkForce, PairwiseChargeForce};

use log::debug;

use crate::config::SimulationConfig;

use super::model::{Edge, GraphModel, Node};
use super::types::Point;

/// One force strategy. Forces mutate velocities (or, for centering, positions)
/// and are applied in registration order.
pub trait Force {
	/// Called whenever the simulation is bound to a new graph.
	fn initialize(&mut self, _nodes: &[Node], _edges: &[Edge]) {}

	fn apply(&mut self, nodes: &mut [Node], edges: &[Edge], alpha: f64);

	/// Called when the drawing surface changes size.
	fn resize(&mut self, _center: Point) {}
}

pub struct ForceSimulation {
	alpha: f64,
	alpha_target: f64,
	alpha_min: f64,
	alpha_decay: f64,
	velocity_decay: f64,
	forces: Vec<Box<dyn Force>>,
}

impl ForceSimulation {
	/// Link, Barnes-Hut charge and centering forces, bound to `model`.
	pub fn new(config: &SimulationConfig, model: &GraphModel, center: Point) -> Self {
		let forces: Vec<Box<dyn Force>> = vec![
			Box::new(LinkForce::new(config.link_distance)),
			Box::new(ChargeForce {
				strength: config.charge_strength,
				theta: config.theta,
			}),
			Box::new(CenterForce {
				center,
				strength: config.center_strength,
			}),
		];
		Self::with_forces(config, model, forces)
	}

	/// Same as [`ForceSimulation::new`] but with exact pairwise repulsion.
	pub fn exact(config: &SimulationConfig, model: &GraphModel, center: Point) -> Self {
		let forces: Vec<Box<dyn Force>> = vec![
			Box::new(LinkForce::new(config.link_distance)),
			Box::new(PairwiseChargeForce {
				strength: config.charge_strength,
			}),
			Box::new(CenterForce {
				center,
				strength: config.center_strength,
			}),
		];
		Self::with_forces(config, model, forces)
	}

	pub fn with_forces(
		config: &SimulationConfig,
		model: &GraphModel,
		mut forces: Vec<Box<dyn Force>>,
	) -> Self {
		for force in &mut forces {
			force.initialize(model.nodes(), model.edges());
		}
		Self {
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			velocity_decay: config.velocity_decay,
			forces,
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// A positive target keeps the simulation running until it is cleared.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = if target.is_finite() {
			target.clamp(0.0, 1.0)
		} else {
			0.0
		};
	}

	/// Raises alpha to at least `alpha` so an idle layout runs again and
	/// cools down from there. Never lowers a hotter alpha.
	pub fn reheat(&mut self, alpha: f64) {
		if alpha.is_finite() {
			self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
		}
	}

	/// Whether further ticks would move anything.
	pub fn is_active(&self) -> bool {
		self.alpha >= self.alpha_min || self.alpha_target > 0.0
	}

	pub fn resize(&mut self, center: Point) {
		for force in &mut self.forces {
			force.resize(center);
		}
	}

	/// Advances the layout by one step. Returns whether the simulation is
	/// still active afterwards.
	pub fn tick(&mut self, model: &mut GraphModel) -> bool {
		if !self.is_active() {
			return false;
		}
		model.sanitize();

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;
		let keep = 1.0 - self.velocity_decay;

		let (nodes, edges) = model.parts_mut();
		for force in &mut self.forces {
			force.apply(nodes, edges, alpha);
		}

		for node in nodes.iter_mut() {
			match node.pinned {
				Some(pin) => {
					node.position = pin;
					node.velocity = Point::default();
				}
				None => {
					node.velocity = node.velocity * keep;
					node.position = node.position + node.velocity;
				}
			}
		}

		let active = self.is_active();
		if !active {
			debug!("Layout settled at alpha {:.5}", self.alpha);
		}
		active
	}
}
