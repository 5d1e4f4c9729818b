//! Pointer, wheel and button input as a single state machine.
//!
//! Exactly one [`InteractionState`] is active. Presses only start something
//! from `Idle`; a second pointer is ignored while dragging and turns a pan
//! into a pinch.

use log::debug;

use crate::api::ConceptId;
use crate::config::GraphConfig;

use super::model::GraphModel;
use super::simulation::ForceSimulation;
use super::types::Point;
use super::viewport::ViewportController;

pub type PointerId = i32;

/// Pointer id used for the mouse; touch points use their own identifiers.
pub const MOUSE_POINTER: PointerId = -1;

/// Named viewport actions exposed to external controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportCommand {
	ZoomIn,
	ZoomOut,
	Reset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ZoomGesture {
	/// A programmatic zoom or reset animation.
	Transition,
	/// Wheel events keep arriving; ends after a quiet period.
	Wheel { quiet_ms: f64 },
	/// Two touch points, last known screen positions.
	Pinch {
		first: (PointerId, Point),
		second: (PointerId, Point),
	},
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum InteractionState {
	#[default]
	Idle,
	Dragging {
		node: usize,
		pointer: PointerId,
		/// Screen position of the press, for telling clicks from drags.
		origin: Point,
		moved: bool,
	},
	Panning {
		pointer: PointerId,
		last: Point,
	},
	ZoomAnimating(ZoomGesture),
}

/// Signals for collaborators outside the graph view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
	Navigate(ConceptId),
}

/// Everything an input event may touch.
pub struct Scene<'a> {
	pub model: &'a mut GraphModel,
	pub simulation: &'a mut ForceSimulation,
	pub viewport: &'a mut ViewportController,
}

pub struct InteractionController {
	state: InteractionState,
	hit_radius: f64,
	click_tolerance: f64,
	drag_alpha_target: f64,
}

impl InteractionController {
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			state: InteractionState::Idle,
			hit_radius: config.node_radius,
			click_tolerance: config.click_tolerance,
			drag_alpha_target: config.simulation.drag_alpha_target,
		}
	}

	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	pub fn dragged_node(&self) -> Option<usize> {
		match self.state {
			InteractionState::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Press on a node starts a drag, press on the background starts a pan.
	pub fn pointer_down(&mut self, pointer: PointerId, screen: Point, scene: Scene<'_>) {
		match &self.state {
			InteractionState::Idle => {
				let world = scene.viewport.viewport().to_world(screen);
				if let Some(node) = scene.model.node_at(world, self.hit_radius) {
					scene.simulation.set_alpha_target(self.drag_alpha_target);
					scene.model.pin(node, world);
					self.state = InteractionState::Dragging {
						node,
						pointer,
						origin: screen,
						moved: false,
					};
				} else {
					self.state = InteractionState::Panning {
						pointer,
						last: screen,
					};
				}
			}
			InteractionState::Panning { pointer: first, last } if *first != pointer => {
				self.state = InteractionState::ZoomAnimating(ZoomGesture::Pinch {
					first: (*first, *last),
					second: (pointer, screen),
				});
			}
			other => debug!("Ignoring press of pointer {} while {:?}", pointer, other),
		}
	}

	pub fn pointer_move(&mut self, pointer: PointerId, screen: Point, scene: Scene<'_>) {
		match &mut self.state {
			InteractionState::Dragging {
				node,
				pointer: owner,
				origin,
				moved,
			} if *owner == pointer => {
				if origin.distance(screen) > self.click_tolerance {
					*moved = true;
				}
				let world = scene.viewport.viewport().to_world(screen);
				scene.model.pin(*node, world);
			}
			InteractionState::Panning {
				pointer: owner,
				last,
			} if *owner == pointer => {
				let delta = screen - *last;
				scene.viewport.pan_by(delta.x, delta.y);
				*last = screen;
			}
			InteractionState::ZoomAnimating(ZoomGesture::Pinch { first, second }) => {
				let (before_a, before_b) = (first.1, second.1);
				if first.0 == pointer {
					first.1 = screen;
				} else if second.0 == pointer {
					second.1 = screen;
				} else {
					return;
				}
				let (after_a, after_b) = (first.1, second.1);
				let mid_before = (before_a + before_b) * 0.5;
				let mid_after = (after_a + after_b) * 0.5;
				let span_before = before_a.distance(before_b);
				let span_after = after_a.distance(after_b);
				let delta = mid_after - mid_before;
				scene.viewport.pan_by(delta.x, delta.y);
				if span_before > f64::EPSILON && span_after > f64::EPSILON {
					scene.viewport.zoom_at(mid_after, (span_after / span_before).log2());
				}
			}
			_ => {}
		}
	}

	/// Release of `pointer`. A press on a node that never travelled beyond the
	/// click tolerance navigates to that node's concept.
	pub fn pointer_up(&mut self, pointer: PointerId, scene: Scene<'_>) -> Option<InteractionEvent> {
		match self.state {
			InteractionState::Dragging {
				node,
				pointer: owner,
				moved,
				..
			} if owner == pointer => {
				let clicked = (!moved)
					.then(|| scene.model.node(node).map(|n| n.id.clone()))
					.flatten();
				self.end_drag(node, scene);
				clicked.map(InteractionEvent::Navigate)
			}
			InteractionState::Panning { pointer: owner, .. } if owner == pointer => {
				self.state = InteractionState::Idle;
				None
			}
			InteractionState::ZoomAnimating(ZoomGesture::Pinch { first, second })
				if first.0 == pointer || second.0 == pointer =>
			{
				self.state = InteractionState::Idle;
				None
			}
			_ => None,
		}
	}

	/// The pointer left the surface or the gesture was cancelled: end any drag,
	/// pan or pinch without emitting a click.
	pub fn pointer_cancel(&mut self, scene: Scene<'_>) {
		match self.state {
			InteractionState::Dragging { node, .. } => self.end_drag(node, scene),
			InteractionState::Panning { .. }
			| InteractionState::ZoomAnimating(ZoomGesture::Pinch { .. }) => {
				self.state = InteractionState::Idle;
			}
			_ => {}
		}
	}

	fn end_drag(&mut self, node: usize, scene: Scene<'_>) {
		scene.model.unpin(node);
		scene.simulation.set_alpha_target(0.0);
		self.state = InteractionState::Idle;
	}

	/// Wheel zoom toward the cursor. `delta` is the exponent passed to
	/// [`ViewportController::zoom_at`].
	pub fn wheel(&mut self, screen: Point, delta: f64, scene: Scene<'_>) {
		let quiet_ms = scene.viewport.config().wheel_gesture_ms;
		match self.state {
			InteractionState::Idle
			| InteractionState::ZoomAnimating(ZoomGesture::Wheel { .. }) => {
				if scene.viewport.zoom_at(screen, delta) {
					self.state = InteractionState::ZoomAnimating(ZoomGesture::Wheel { quiet_ms });
				}
			}
			_ => debug!("Ignoring wheel while {:?}", self.state),
		}
	}

	/// Runs one of the external zoom controls. A request during another
	/// programmatic animation retargets it.
	pub fn command(&mut self, command: ViewportCommand, scene: Scene<'_>) {
		match self.state {
			InteractionState::Idle
			| InteractionState::ZoomAnimating(ZoomGesture::Transition)
			| InteractionState::ZoomAnimating(ZoomGesture::Wheel { .. }) => {}
			_ => {
				debug!("Ignoring {:?} while {:?}", command, self.state);
				return;
			}
		}
		let config = scene.viewport.config();
		let (zoom_in, zoom_out) = (config.zoom_in_factor, config.zoom_out_factor);
		match command {
			ViewportCommand::ZoomIn => {
				scene.viewport.zoom_by(zoom_in, true);
			}
			ViewportCommand::ZoomOut => {
				scene.viewport.zoom_by(zoom_out, true);
			}
			ViewportCommand::Reset => scene.viewport.reset(),
		}
		if scene.viewport.is_animating() {
			self.state = InteractionState::ZoomAnimating(ZoomGesture::Transition);
		}
	}

	/// Advances viewport animations by `dt_ms` and leaves `ZoomAnimating` once
	/// the animation or wheel gesture is over.
	pub fn advance(&mut self, dt_ms: f64, viewport: &mut ViewportController) {
		let animating = viewport.advance(dt_ms);
		match &mut self.state {
			InteractionState::ZoomAnimating(ZoomGesture::Transition) if !animating => {
				self.state = InteractionState::Idle;
			}
			InteractionState::ZoomAnimating(ZoomGesture::Wheel { quiet_ms }) => {
				*quiet_ms -= dt_ms;
				if *quiet_ms <= 0.0 {
					self.state = InteractionState::Idle;
				}
			}
			_ => {}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	struct Fixture {
		model: GraphModel,
		simulation: ForceSimulation,
		viewport: ViewportController,
		controller: InteractionController,
	}

	impl Fixture {
		/// Three nodes at known positions under an identity viewport.
		fn new() -> Self {
			let config = GraphConfig::default();
			let at = |id: &str, x: f64, y: f64| GraphNode {
				id: id.into(),
				label: id.into(),
				category: "X".into(),
				position: Some(Point::new(x, y)),
			};
			let data = GraphData {
				nodes: vec![at("1", 100.0, 100.0), at("2", 300.0, 100.0), at("3", 200.0, 300.0)],
				links: vec![GraphLink {
					source: "1".into(),
					target: "2".into(),
				}],
			};
			let center = Point::new(200.0, 150.0);
			let model = GraphModel::new(&data, center).unwrap();
			let simulation = ForceSimulation::new(&config.simulation, &model, center);
			Self {
				model,
				simulation,
				viewport: ViewportController::new(config.viewport.clone(), 400.0, 300.0),
				controller: InteractionController::new(&config),
			}
		}

		fn scene(&mut self) -> (&mut InteractionController, Scene<'_>) {
			(
				&mut self.controller,
				Scene {
					model: &mut self.model,
					simulation: &mut self.simulation,
					viewport: &mut self.viewport,
				},
			)
		}

		fn down(&mut self, pointer: PointerId, x: f64, y: f64) {
			let (c, scene) = self.scene();
			c.pointer_down(pointer, Point::new(x, y), scene);
		}

		fn drag_to(&mut self, pointer: PointerId, x: f64, y: f64) {
			let (c, scene) = self.scene();
			c.pointer_move(pointer, Point::new(x, y), scene);
		}

		fn up(&mut self, pointer: PointerId) -> Option<InteractionEvent> {
			let (c, scene) = self.scene();
			c.pointer_up(pointer, scene)
		}
	}

	#[test]
	fn press_on_node_starts_drag_and_reheats() {
		let mut f = Fixture::new();
		f.down(MOUSE_POINTER, 302.0, 98.0);
		assert_eq!(f.controller.dragged_node(), Some(1));
		assert_eq!(f.simulation.alpha_target(), 0.3);
		assert_eq!(f.model.nodes()[1].pinned, Some(Point::new(302.0, 98.0)));
	}

	#[test]
	fn dragged_node_follows_pointer_through_ticks() {
		let mut f = Fixture::new();
		f.down(MOUSE_POINTER, 100.0, 100.0);
		for step in 1..20 {
			let target = Point::new(100.0 + step as f64 * 7.0, 100.0 - step as f64 * 3.0);
			f.drag_to(MOUSE_POINTER, target.x, target.y);
			f.simulation.tick(&mut f.model);
			assert_eq!(f.model.nodes()[0].position, target);
		}
		assert_eq!(f.up(MOUSE_POINTER), None);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
		assert_eq!(f.simulation.alpha_target(), 0.0);
		assert!(!f.model.nodes()[0].is_pinned());
		assert_eq!(f.model.nodes()[0].position, Point::new(233.0, 43.0));
	}

	#[test]
	fn drag_respects_the_viewport_transform() {
		let mut f = Fixture::new();
		f.viewport.zoom_by(2.0, false);
		let screen = f.viewport.viewport().to_screen(Point::new(200.0, 300.0));
		f.down(MOUSE_POINTER, screen.x, screen.y);
		assert_eq!(f.controller.dragged_node(), Some(2));
		f.drag_to(MOUSE_POINTER, screen.x + 20.0, screen.y);
		let pinned = f.model.nodes()[2].pinned.unwrap();
		assert!(pinned.distance(Point::new(210.0, 300.0)) < 1e-9);
	}

	#[test]
	fn click_on_node_navigates() {
		let mut f = Fixture::new();
		f.down(MOUSE_POINTER, 300.0, 100.0);
		f.drag_to(MOUSE_POINTER, 301.0, 101.0);
		assert_eq!(
			f.up(MOUSE_POINTER),
			Some(InteractionEvent::Navigate(ConceptId::from("2")))
		);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn press_on_background_pans() {
		let mut f = Fixture::new();
		f.down(MOUSE_POINTER, 10.0, 10.0);
		assert!(matches!(f.controller.state(), InteractionState::Panning { .. }));
		f.drag_to(MOUSE_POINTER, 40.0, 0.0);
		f.drag_to(MOUSE_POINTER, 50.0, 5.0);
		assert_eq!(f.viewport.viewport().translate, Point::new(40.0, -5.0));
		assert_eq!(f.up(MOUSE_POINTER), None);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn second_pointer_is_ignored_while_dragging() {
		let mut f = Fixture::new();
		f.down(1, 100.0, 100.0);
		f.down(2, 300.0, 100.0);
		assert_eq!(f.controller.dragged_node(), Some(0));
		assert!(!f.model.nodes()[1].is_pinned());
		f.drag_to(2, 0.0, 0.0);
		assert_eq!(f.model.nodes()[0].pinned, Some(Point::new(100.0, 100.0)));
		assert_eq!(f.up(2), None);
		assert_eq!(f.controller.dragged_node(), Some(0));
	}

	#[test]
	fn second_pointer_during_pan_pinches() {
		let mut f = Fixture::new();
		f.down(1, 150.0, 150.0);
		f.down(2, 250.0, 150.0);
		assert!(matches!(
			f.controller.state(),
			InteractionState::ZoomAnimating(ZoomGesture::Pinch { .. })
		));
		f.drag_to(2, 350.0, 150.0);
		assert!((f.viewport.viewport().scale - 2.0).abs() < 1e-9);
		f.up(1);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn wheel_gesture_ends_after_quiet_period() {
		let mut f = Fixture::new();
		let (c, scene) = f.scene();
		c.wheel(Point::new(200.0, 150.0), 0.5, scene);
		assert!(matches!(
			f.controller.state(),
			InteractionState::ZoomAnimating(ZoomGesture::Wheel { .. })
		));
		f.controller.advance(100.0, &mut f.viewport);
		assert_ne!(f.controller.state(), &InteractionState::Idle);
		f.controller.advance(100.0, &mut f.viewport);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn zoom_controls_animate_then_return_to_idle() {
		let mut f = Fixture::new();
		let (c, scene) = f.scene();
		c.command(ViewportCommand::ZoomIn, scene);
		assert_eq!(
			f.controller.state(),
			&InteractionState::ZoomAnimating(ZoomGesture::Transition)
		);
		f.down(MOUSE_POINTER, 10.0, 10.0);
		assert_eq!(
			f.controller.state(),
			&InteractionState::ZoomAnimating(ZoomGesture::Transition)
		);
		for _ in 0..30 {
			f.controller.advance(16.0, &mut f.viewport);
		}
		assert_eq!(f.controller.state(), &InteractionState::Idle);
		assert!((f.viewport.viewport().scale - 1.2).abs() < 1e-12);
	}

	#[test]
	fn cancel_releases_a_drag_without_navigating() {
		let mut f = Fixture::new();
		f.down(MOUSE_POINTER, 200.0, 300.0);
		let (c, scene) = f.scene();
		c.pointer_cancel(scene);
		assert_eq!(f.controller.state(), &InteractionState::Idle);
		assert!(!f.model.nodes()[2].is_pinned());
		assert_eq!(f.simulation.alpha_target(), 0.0);
	}
}
