use log::info;

use crate::config::GraphConfig;
use crate::error::GraphError;

use super::interaction::{
	InteractionController, InteractionEvent, PointerId, Scene, ViewportCommand,
};
use super::model::GraphModel;
use super::render::{Frame, build_frame};
use super::simulation::ForceSimulation;
use super::types::{GraphData, Point};
use super::viewport::{Viewport, ViewportController};

/// One running graph session: model, layout, viewport and input, sized to a
/// drawing surface.
pub struct ForceGraphState {
	model: GraphModel,
	simulation: ForceSimulation,
	viewport: ViewportController,
	interaction: InteractionController,
	config: GraphConfig,
	pub width: f64,
	pub height: f64,
	/// Set by input that changes what is on screen; cleared by [`Self::step`].
	dirty: bool,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		config: &GraphConfig,
		width: f64,
		height: f64,
	) -> Result<Self, GraphError> {
		let center = Point::new(width / 2.0, height / 2.0);
		let model = GraphModel::new(data, center)?;
		let simulation = ForceSimulation::new(&config.simulation, &model, center);
		info!(
			"Graph session started with {} nodes and {} edges",
			model.len(),
			model.edges().len()
		);
		Ok(Self {
			model,
			simulation,
			viewport: ViewportController::new(config.viewport.clone(), width, height),
			interaction: InteractionController::new(config),
			config: config.clone(),
			width,
			height,
			dirty: true,
		})
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport.viewport()
	}

	pub fn alpha(&self) -> f64 {
		self.simulation.alpha()
	}

	fn scene(&mut self) -> (&mut InteractionController, Scene<'_>) {
		self.dirty = true;
		(
			&mut self.interaction,
			Scene {
				model: &mut self.model,
				simulation: &mut self.simulation,
				viewport: &mut self.viewport,
			},
		)
	}

	pub fn pointer_down(&mut self, pointer: PointerId, screen: Point) {
		let (interaction, scene) = self.scene();
		interaction.pointer_down(pointer, screen, scene);
	}

	pub fn pointer_move(&mut self, pointer: PointerId, screen: Point) {
		let (interaction, scene) = self.scene();
		interaction.pointer_move(pointer, screen, scene);
	}

	pub fn pointer_up(&mut self, pointer: PointerId) -> Option<InteractionEvent> {
		let (interaction, scene) = self.scene();
		interaction.pointer_up(pointer, scene)
	}

	pub fn pointer_cancel(&mut self) {
		let (interaction, scene) = self.scene();
		interaction.pointer_cancel(scene);
	}

	pub fn wheel(&mut self, screen: Point, delta: f64) {
		let (interaction, scene) = self.scene();
		interaction.wheel(screen, delta, scene);
	}

	pub fn command(&mut self, command: ViewportCommand) {
		let (interaction, scene) = self.scene();
		interaction.command(command, scene);
	}

	/// Advances animations and the layout by one frame. Returns whether the
	/// frame differs from the last one drawn.
	pub fn step(&mut self, dt_ms: f64) -> bool {
		let animating = self.viewport.is_animating();
		self.interaction.advance(dt_ms, &mut self.viewport);
		let ticked = self.simulation.tick(&mut self.model);
		std::mem::take(&mut self.dirty) || animating || ticked
	}

	pub fn frame(&self) -> Frame<'_> {
		build_frame(
			&self.model,
			&self.viewport.viewport(),
			&self.config.palette,
			&self.config,
			Point::new(self.width, self.height),
		)
	}

	/// New surface size: recenters the layout and the zoom anchor, and
	/// reheats the simulation so a settled layout drifts to the new center.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width == self.width && height == self.height {
			return;
		}
		let center = Point::new(width / 2.0, height / 2.0);
		self.width = width;
		self.height = height;
		self.model.set_center(center);
		self.simulation.resize(center);
		self.simulation.reheat(self.config.simulation.resize_alpha);
		self.viewport.resize(width, height);
		self.dirty = true;
	}
}
