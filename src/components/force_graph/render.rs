use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::config::{CategoryPalette, GraphConfig};

use super::model::GraphModel;
use super::types::Point;
use super::viewport::Viewport;

const BACKGROUND: &str = "#f7fafc";
const EDGE_COLOR: &str = "rgba(153, 153, 153, 0.6)";
const LABEL_COLOR: &str = "#2d3748";
const PIN_RING_COLOR: &str = "#2d3748";
/// Label size in world units, so labels scale with the drawing.
const LABEL_SIZE: f64 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
	pub from: Point,
	pub to: Point,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CirclePrimitive<'a> {
	pub center: Point,
	pub radius: f64,
	pub color: &'a str,
	/// Drawn with an outline while held by the pointer.
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelPrimitive<'a> {
	/// Baseline start of the text.
	pub position: Point,
	pub text: &'a str,
	pub font_size: f64,
}

/// Everything drawn in one frame, in screen coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame<'a> {
	pub width: f64,
	pub height: f64,
	pub lines: Vec<LinePrimitive>,
	pub circles: Vec<CirclePrimitive<'a>>,
	pub labels: Vec<LabelPrimitive<'a>>,
}

/// Projects the model through the viewport. Reads the model only.
pub fn build_frame<'a>(
	model: &'a GraphModel,
	viewport: &Viewport,
	palette: &'a CategoryPalette,
	config: &GraphConfig,
	size: Point,
) -> Frame<'a> {
	let k = viewport.scale;
	let nodes = model.nodes();

	let lines = model
		.edges()
		.iter()
		.filter_map(|edge| {
			let (source, target) = (nodes.get(edge.source)?, nodes.get(edge.target)?);
			Some(LinePrimitive {
				from: viewport.to_screen(source.position),
				to: viewport.to_screen(target.position),
				width: k,
			})
		})
		.collect();

	let circles = nodes
		.iter()
		.map(|node| CirclePrimitive {
			center: viewport.to_screen(node.position),
			radius: config.node_radius * k,
			color: palette.color_for(&node.category),
			pinned: node.is_pinned(),
		})
		.collect();

	let font_size = LABEL_SIZE * k;
	let labels = nodes
		.iter()
		.filter(|node| !node.label.is_empty())
		.map(|node| {
			let anchor = viewport.to_screen(node.position);
			let offset = Point::new(config.label_offset * k, font_size * 0.35);
			LabelPrimitive {
				position: anchor + offset,
				text: &node.label,
				font_size,
			}
		})
		.collect();

	Frame {
		width: size.x,
		height: size.y,
		lines,
		circles,
		labels,
	}
}

/// Draws a frame onto a 2d canvas context.
pub fn paint(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	ctx.set_stroke_style_str(EDGE_COLOR);
	for line in &frame.lines {
		ctx.set_line_width(line.width);
		ctx.begin_path();
		ctx.move_to(line.from.x, line.from.y);
		ctx.line_to(line.to.x, line.to.y);
		ctx.stroke();
	}

	for circle in &frame.circles {
		ctx.begin_path();
		let _ = ctx.arc(circle.center.x, circle.center.y, circle.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(circle.color);
		ctx.fill();
		if circle.pinned {
			ctx.set_stroke_style_str(PIN_RING_COLOR);
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
	}

	ctx.set_fill_style_str(LABEL_COLOR);
	let mut current_font = f64::NAN;
	for label in &frame.labels {
		if label.font_size != current_font {
			ctx.set_font(&format!("{}px sans-serif", label.font_size));
			current_font = label.font_size;
		}
		let _ = ctx.fill_text(label.text, label.position.x, label.position.y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn model() -> GraphModel {
		let at = |id: &str, category: &str, x: f64, y: f64| GraphNode {
			id: id.into(),
			label: format!("Concept {}", id),
			category: category.into(),
			position: Some(Point::new(x, y)),
		};
		GraphModel::new(
			&GraphData {
				nodes: vec![at("1", "色法", 0.0, 0.0), at("2", "mystery", 50.0, 20.0)],
				links: vec![GraphLink {
					source: "1".into(),
					target: "2".into(),
				}],
			},
			Point::default(),
		)
		.unwrap()
	}

	#[test]
	fn frame_projects_through_the_viewport() {
		let model = model();
		let config = GraphConfig::default();
		let viewport = Viewport {
			scale: 2.0,
			translate: Point::new(10.0, -5.0),
		};
		let surface = Point::new(800.0, 600.0);
		let frame = build_frame(&model, &viewport, &config.palette, &config, surface);

		assert_eq!(frame.lines.len(), 1);
		assert_eq!(frame.lines[0].from, Point::new(10.0, -5.0));
		assert_eq!(frame.lines[0].to, Point::new(110.0, 35.0));
		assert_eq!(frame.circles.len(), 2);
		assert_eq!(frame.circles[0].radius, 20.0);
		assert_eq!(frame.circles[0].color, "#F6AD55");
		assert_eq!(frame.circles[1].color, "#CBD5E0");
		assert_eq!(frame.labels[1].text, "Concept 2");
		assert_eq!(frame.labels[1].position.x, 110.0 + 24.0);
	}

	#[test]
	fn building_a_frame_leaves_the_model_untouched() {
		let model = model();
		let before = model.nodes().to_vec();
		let config = GraphConfig::default();
		let surface = Point::new(100.0, 100.0);
		let _ = build_frame(&model, &Viewport::IDENTITY, &config.palette, &config, surface);
		assert_eq!(model.nodes(), before.as_slice());
	}
}
