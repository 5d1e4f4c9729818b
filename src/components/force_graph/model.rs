use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, warn};

use crate::api::ConceptId;
use crate::error::GraphError;

use super::types::{GraphData, Point};

/// Spacing of the seed spiral, in world units.
const SEED_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: ConceptId,
	pub label: String,
	pub category: String,
	pub position: Point,
	pub velocity: Point,
	/// While set, the node sits here regardless of forces.
	pub pinned: Option<Point>,
}

impl Node {
	pub fn is_pinned(&self) -> bool {
		self.pinned.is_some()
	}
}

/// Undirected spring between two node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
}

/// Nodes and edges of one loaded graph.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	index: HashMap<ConceptId, usize>,
	center: Point,
}

/// Position of the `i`th node on the seed spiral around `center`.
fn seed_position(i: usize, center: Point) -> Point {
	let radius = SEED_RADIUS * (0.5 + i as f64).sqrt();
	let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
	center + Point::new(radius * angle.cos(), radius * angle.sin())
}

impl GraphModel {
	/// Seeds a model from graph data. Duplicate node ids keep their first
	/// occurrence; links to unknown ids and self-loops are dropped.
	pub fn new(data: &GraphData, center: Point) -> Result<Self, GraphError> {
		if data.nodes.is_empty() {
			return Err(GraphError::NoData);
		}

		let mut nodes = Vec::with_capacity(data.nodes.len());
		let mut index = HashMap::with_capacity(data.nodes.len());
		for node in &data.nodes {
			if index.contains_key(&node.id) {
				warn!("Duplicate node id {}, keeping the first", node.id);
				continue;
			}
			let i = nodes.len();
			let position = match node.position {
				Some(p) if p.is_finite() => p,
				Some(_) => {
					debug!("Node {} has a non-finite seed position", node.id);
					seed_position(i, center)
				}
				None => seed_position(i, center),
			};
			index.insert(node.id.clone(), i);
			nodes.push(Node {
				id: node.id.clone(),
				label: node.label.clone(),
				category: node.category.clone(),
				position,
				velocity: Point::default(),
				pinned: None,
			});
		}

		let mut edges = Vec::with_capacity(data.links.len());
		for link in &data.links {
			match (index.get(&link.source), index.get(&link.target)) {
				(Some(&source), Some(&target)) if source != target => {
					edges.push(Edge { source, target });
				}
				(Some(_), Some(_)) => debug!("Dropping self-loop on {}", link.source),
				_ => warn!(
					"Dropping link {} -> {} with an unknown endpoint",
					link.source, link.target
				),
			}
		}

		Ok(Self {
			nodes,
			edges,
			index,
			center,
		})
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, index: usize) -> Option<&Node> {
		self.nodes.get(index)
	}

	pub fn index_of(&self, id: &ConceptId) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Node positions for the simulation, alongside the read-only edge list.
	pub fn parts_mut(&mut self) -> (&mut [Node], &[Edge]) {
		(&mut self.nodes, &self.edges)
	}

	/// Topmost node whose circle contains `point` (world space).
	pub fn node_at(&self, point: Point, radius: f64) -> Option<usize> {
		self.nodes
			.iter()
			.rposition(|node| node.position.distance(point) <= radius)
	}

	/// Anchors a node at `point` and moves it there immediately.
	pub fn pin(&mut self, index: usize, point: Point) {
		if !point.is_finite() {
			return;
		}
		if let Some(node) = self.nodes.get_mut(index) {
			node.pinned = Some(point);
			node.position = point;
			node.velocity = Point::default();
		}
	}

	/// Releases a node back to the simulation at its last pinned position.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			if let Some(point) = node.pinned.take() {
				node.position = point;
			}
		}
	}

	/// Moves the point new nodes are seeded around and that reseeded nodes return to.
	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	/// Reseeds any node whose position or velocity stopped being finite.
	/// Returns how many nodes were touched.
	pub fn sanitize(&mut self) -> usize {
		let center = self.center;
		let mut repaired = 0;
		for (i, node) in self.nodes.iter_mut().enumerate() {
			if node.pinned.is_some_and(|p| !p.is_finite()) {
				node.pinned = None;
			}
			if !node.position.is_finite() || !node.velocity.is_finite() {
				node.position = node.pinned.unwrap_or_else(|| seed_position(i, center));
				node.velocity = Point::default();
				repaired += 1;
			}
		}
		if repaired > 0 {
			warn!("Reinitialized {} node(s) with non-finite coordinates", repaired);
		}
		repaired
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			category: "X".into(),
			position: None,
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn empty_data_is_no_data() {
		let err = GraphModel::new(&GraphData::default(), Point::default()).unwrap_err();
		assert_eq!(err, GraphError::NoData);
	}

	#[test]
	fn drops_links_to_unknown_ids_and_self_loops() {
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			links: vec![link("a", "b"), link("a", "zz"), link("b", "b")],
		};
		let model = GraphModel::new(&data, Point::default()).unwrap();
		assert_eq!(model.edges(), &[Edge { source: 0, target: 1 }]);
	}

	#[test]
	fn duplicate_ids_keep_the_first_node() {
		let mut second = node("a");
		second.label = "second".into();
		let data = GraphData {
			nodes: vec![node("a"), second, node("b")],
			links: vec![],
		};
		let model = GraphModel::new(&data, Point::default()).unwrap();
		assert_eq!(model.len(), 2);
		assert_eq!(model.nodes()[0].label, "A");
		assert_eq!(model.index_of(&"b".into()), Some(1));
	}

	#[test]
	fn seed_positions_are_distinct_and_finite() {
		let mut bad = node("c");
		bad.position = Some(Point::new(f64::NAN, 3.0));
		let data = GraphData {
			nodes: vec![node("a"), node("b"), bad],
			links: vec![],
		};
		let model = GraphModel::new(&data, Point::new(400.0, 300.0)).unwrap();
		let positions: Vec<Point> = model.nodes().iter().map(|n| n.position).collect();
		assert!(positions.iter().all(|p| p.is_finite()));
		assert!(positions[0].distance(positions[1]) > 1.0);
		assert!(positions[1].distance(positions[2]) > 1.0);
	}

	#[test]
	fn sanitize_reseeds_non_finite_nodes() {
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			links: vec![],
		};
		let mut model = GraphModel::new(&data, Point::default()).unwrap();
		model.parts_mut().0[1].position = Point::new(f64::INFINITY, 0.0);
		assert_eq!(model.sanitize(), 1);
		assert!(model.nodes()[1].position.is_finite());
		assert_eq!(model.sanitize(), 0);
	}

	#[test]
	fn hit_testing_prefers_the_topmost_node() {
		let mut a = node("a");
		a.position = Some(Point::new(0.0, 0.0));
		let mut b = node("b");
		b.position = Some(Point::new(5.0, 0.0));
		let data = GraphData {
			nodes: vec![a, b],
			links: vec![],
		};
		let model = GraphModel::new(&data, Point::default()).unwrap();
		assert_eq!(model.node_at(Point::new(2.0, 0.0), 10.0), Some(1));
		assert_eq!(model.node_at(Point::new(-9.0, 0.0), 10.0), Some(0));
		assert_eq!(model.node_at(Point::new(50.0, 50.0), 10.0), None);
	}

	#[test]
	fn unpin_keeps_the_pinned_position() {
		let data = GraphData {
			nodes: vec![node("a")],
			links: vec![],
		};
		let mut model = GraphModel::new(&data, Point::default()).unwrap();
		model.pin(0, Point::new(42.0, -7.0));
		assert!(model.nodes()[0].is_pinned());
		model.unpin(0);
		assert!(!model.nodes()[0].is_pinned());
		assert_eq!(model.nodes()[0].position, Point::new(42.0, -7.0));
	}
}
