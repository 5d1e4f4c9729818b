use std::ops::{Add, Mul, Sub};

use crate::api::{Concept, ConceptId};

use super::sampler::{LinkSampler, TargetPicker};

/// A 2d point or vector, in world or screen units depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: ConceptId,
	pub label: String,
	pub category: String,
	/// Seed position; nodes without one (or with a non-finite one) are placed on a spiral.
	pub position: Option<Point>,
}

impl From<&Concept> for GraphNode {
	fn from(concept: &Concept) -> Self {
		Self {
			id: concept.id.clone(),
			label: concept.name.clone(),
			category: concept.category_label().to_string(),
			position: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: ConceptId,
	pub target: ConceptId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Builds nodes from the concept list and connects them with sampled links.
	pub fn from_concepts<P: TargetPicker + ?Sized>(concepts: &[Concept], picker: &mut P) -> Self {
		let nodes: Vec<GraphNode> = concepts.iter().map(GraphNode::from).collect();
		let links = LinkSampler::default().sample(&nodes, picker);
		Self { nodes, links }
	}
}
