use log::debug;

use crate::config::ViewportConfig;

use super::types::Point;

fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// World to screen transform: `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub translate: Point,
}

impl Default for Viewport {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl Viewport {
	pub const IDENTITY: Viewport = Viewport {
		scale: 1.0,
		translate: Point::new(0.0, 0.0),
	};

	pub fn to_screen(&self, world: Point) -> Point {
		world * self.scale + self.translate
	}

	pub fn to_world(&self, screen: Point) -> Point {
		(screen - self.translate) * (1.0 / self.scale)
	}

	/// Scales by `scale / self.scale` around `anchor` (screen space), keeping
	/// the world point under the anchor where it is.
	fn zoomed_around(&self, anchor: Point, scale: f64) -> Viewport {
		let ratio = scale / self.scale;
		Viewport {
			scale,
			translate: anchor - (anchor - self.translate) * ratio,
		}
	}

	fn lerp(&self, to: &Viewport, t: f64) -> Viewport {
		Viewport {
			scale: self.scale + (to.scale - self.scale) * t,
			translate: self.translate + (to.translate - self.translate) * t,
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Transition {
	from: Viewport,
	to: Viewport,
	elapsed_ms: f64,
}

/// Owns the pan/zoom transform and its animations.
#[derive(Clone, Debug)]
pub struct ViewportController {
	current: Viewport,
	transition: Option<Transition>,
	config: ViewportConfig,
	size: Point,
}

impl ViewportController {
	pub fn new(config: ViewportConfig, width: f64, height: f64) -> Self {
		Self {
			current: Viewport::IDENTITY,
			transition: None,
			config,
			size: Point::new(width, height),
		}
	}

	pub fn viewport(&self) -> Viewport {
		self.current
	}

	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	pub fn config(&self) -> &ViewportConfig {
		&self.config
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.size = Point::new(width, height);
	}

	fn clamp_scale(&self, scale: f64) -> f64 {
		scale.clamp(self.config.min_scale, self.config.max_scale)
	}

	/// Where the transform ends up once any running transition completes.
	fn settled(&self) -> Viewport {
		self.transition.map(|t| t.to).unwrap_or(self.current)
	}

	fn animate_to(&mut self, to: Viewport) {
		self.transition = Some(Transition {
			from: self.current,
			to,
			elapsed_ms: 0.0,
		});
	}

	/// Multiplies the scale by `factor` around the center of the surface.
	/// Returns false when the factor is not a usable positive number.
	pub fn zoom_by(&mut self, factor: f64, animated: bool) -> bool {
		if !factor.is_finite() || factor <= 0.0 {
			debug!("Ignoring zoom factor {}", factor);
			return false;
		}
		let base = self.settled();
		let target = base.zoomed_around(self.size * 0.5, self.clamp_scale(base.scale * factor));
		if animated {
			self.animate_to(target);
		} else {
			self.transition = None;
			self.current = target;
		}
		true
	}

	/// Zooms by `2^delta` keeping the world point under `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, delta: f64) -> bool {
		if !delta.is_finite() || !anchor.is_finite() {
			return false;
		}
		self.transition = None;
		let scale = self.clamp_scale(self.current.scale * delta.exp2());
		self.current = self.current.zoomed_around(anchor, scale);
		true
	}

	/// Animates back to the identity transform.
	pub fn reset(&mut self) {
		if self.settled() == Viewport::IDENTITY {
			return;
		}
		self.animate_to(Viewport::IDENTITY);
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if !dx.is_finite() || !dy.is_finite() {
			return;
		}
		self.transition = None;
		self.current.translate = self.current.translate + Point::new(dx, dy);
	}

	/// Steps a running transition. Returns whether one is still in flight.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		let Some(mut transition) = self.transition else {
			return false;
		};
		transition.elapsed_ms += dt_ms.max(0.0);
		let t = if self.config.transition_ms > 0.0 {
			(transition.elapsed_ms / self.config.transition_ms).min(1.0)
		} else {
			1.0
		};
		if t >= 1.0 {
			self.current = transition.to;
			self.transition = None;
			return false;
		}
		self.current = transition.from.lerp(&transition.to, ease_in_out_cubic(t));
		self.transition = Some(transition);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn controller() -> ViewportController {
		ViewportController::new(ViewportConfig::default(), 800.0, 600.0)
	}

	fn finish(controller: &mut ViewportController) {
		while controller.advance(16.0) {}
	}

	#[test]
	fn zoom_by_clamps_to_the_scale_extent() {
		let mut c = controller();
		c.zoom_by(10.0, false);
		assert_eq!(c.viewport().scale, 4.0);
		for _ in 0..40 {
			c.zoom_by(0.5, false);
			assert!(c.viewport().scale >= 0.1);
		}
		assert_eq!(c.viewport().scale, 0.1);
	}

	#[test]
	fn zoom_by_rejects_degenerate_factors() {
		let mut c = controller();
		assert!(!c.zoom_by(0.0, false));
		assert!(!c.zoom_by(-2.0, false));
		assert!(!c.zoom_by(f64::NAN, false));
		assert_eq!(c.viewport(), Viewport::IDENTITY);
	}

	#[test]
	fn zoom_by_keeps_the_surface_center_fixed() {
		let mut c = controller();
		c.pan_by(37.0, -12.0);
		let center = Point::new(400.0, 300.0);
		let world = c.viewport().to_world(center);
		c.zoom_by(1.2, false);
		assert!(c.viewport().to_screen(world).distance(center) < 1e-9);
	}

	#[test]
	fn animated_zoom_reaches_its_target() {
		let mut c = controller();
		c.zoom_by(1.2, true);
		assert!(c.is_animating());
		assert_eq!(c.viewport().scale, 1.0);
		assert!(c.advance(100.0));
		let midway = c.viewport().scale;
		assert!(midway > 1.0 && midway < 1.2);
		finish(&mut c);
		assert!((c.viewport().scale - 1.2).abs() < 1e-12);
	}

	#[test]
	fn queued_zooms_compound_from_the_pending_target() {
		let mut c = controller();
		c.zoom_by(2.0, true);
		c.advance(50.0);
		c.zoom_by(2.0, true);
		finish(&mut c);
		assert!((c.viewport().scale - 4.0).abs() < 1e-12);
	}

	#[test]
	fn zoom_at_keeps_the_cursor_point_fixed() {
		let mut c = controller();
		c.pan_by(120.0, 45.0);
		for (anchor, delta) in [
			(Point::new(10.0, 20.0), 0.7),
			(Point::new(640.0, 480.0), -1.3),
			(Point::new(333.0, 12.5), 5.0),
		] {
			let before = c.viewport().to_world(anchor);
			c.zoom_at(anchor, delta);
			let after = c.viewport().to_world(anchor);
			assert!(before.distance(after) < 1e-9);
			assert!(c.viewport().scale >= 0.1 && c.viewport().scale <= 4.0);
		}
	}

	#[test]
	fn reset_is_idempotent() {
		let mut c = controller();
		c.zoom_by(3.0, false);
		c.pan_by(-80.0, 14.0);
		c.reset();
		finish(&mut c);
		let once = c.viewport();
		c.reset();
		finish(&mut c);
		assert_eq!(once, Viewport::IDENTITY);
		assert_eq!(c.viewport(), once);
	}

	#[test]
	fn screen_and_world_round_trip() {
		let v = Viewport {
			scale: 2.5,
			translate: Point::new(-30.0, 70.0),
		};
		let p = Point::new(12.0, -4.0);
		assert!(v.to_world(v.to_screen(p)).distance(p) < 1e-12);
	}
}
