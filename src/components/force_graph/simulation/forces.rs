use super::super::model::{Edge, Node};
use super::super::types::Point;
use super::Force;
use super::quadtree::{Cell, QuadTree};

/// Below this distance repulsion stops growing.
const DISTANCE_MIN_SQ: f64 = 1.0;

/// Deterministic nudge for coincident points, distinct per index so two
/// overlapping nodes are pushed in different directions.
fn jiggle(index: usize) -> f64 {
	(index as f64 + 1.0) * 1e-6
}

/// Springs pulling linked nodes toward a rest distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	pub distance: f64,
	degree: Vec<usize>,
}

impl LinkForce {
	pub fn new(distance: f64) -> Self {
		Self {
			distance,
			degree: Vec::new(),
		}
	}

	fn degree(&self, index: usize) -> f64 {
		self.degree.get(index).copied().unwrap_or(1).max(1) as f64
	}
}

impl Force for LinkForce {
	fn initialize(&mut self, nodes: &[Node], edges: &[Edge]) {
		self.degree = vec![0; nodes.len()];
		for edge in edges {
			if let Some(d) = self.degree.get_mut(edge.source) {
				*d += 1;
			}
			if let Some(d) = self.degree.get_mut(edge.target) {
				*d += 1;
			}
		}
	}

	fn apply(&mut self, nodes: &mut [Node], edges: &[Edge], alpha: f64) {
		for (i, edge) in edges.iter().enumerate() {
			let (s, t) = (edge.source, edge.target);
			if s == t || s >= nodes.len() || t >= nodes.len() {
				continue;
			}
			let (source, target) = (&nodes[s], &nodes[t]);
			let mut delta =
				(target.position + target.velocity) - (source.position + source.velocity);
			if delta.x == 0.0 && delta.y == 0.0 {
				delta = Point::new(jiggle(i), jiggle(i + 1));
			}

			let (ds, dt) = (self.degree(s), self.degree(t));
			// Busy nodes get softer springs so hubs do not dominate.
			let strength = 1.0 / ds.min(dt);
			let bias = ds / (ds + dt);

			let length = delta.length();
			let pull = delta * ((length - self.distance) / length * alpha * strength);
			nodes[t].velocity = nodes[t].velocity - pull * bias;
			nodes[s].velocity = nodes[s].velocity + pull * (1.0 - bias);
		}
	}
}

fn repulsion(delta: Point, weight: f64, alpha: f64, index: usize) -> Point {
	let mut delta = delta;
	if delta.x == 0.0 && delta.y == 0.0 {
		delta = Point::new(jiggle(index), -jiggle(index + 1));
	}
	let mut distance_sq = delta.x * delta.x + delta.y * delta.y;
	if distance_sq < DISTANCE_MIN_SQ {
		distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
	}
	delta * (weight * alpha / distance_sq)
}

/// Exact O(n²) many-body force. Used as the reference for [`ChargeForce`].
#[derive(Clone, Debug)]
pub struct PairwiseChargeForce {
	pub strength: f64,
}

impl Force for PairwiseChargeForce {
	fn apply(&mut self, nodes: &mut [Node], _edges: &[Edge], alpha: f64) {
		let positions: Vec<Point> = nodes.iter().map(|n| n.position).collect();
		for (i, node) in nodes.iter_mut().enumerate() {
			let mut push = Point::default();
			for (j, other) in positions.iter().enumerate() {
				if i == j {
					continue;
				}
				push = push + repulsion(*other - positions[i], self.strength, alpha, i);
			}
			node.velocity = node.velocity + push;
		}
	}
}

/// Many-body force approximated with a Barnes-Hut quadtree.
#[derive(Clone, Debug)]
pub struct ChargeForce {
	pub strength: f64,
	pub theta: f64,
}

impl ChargeForce {
	fn accumulate(
		&self,
		tree: &QuadTree,
		cell: &Cell,
		index: usize,
		positions: &[Point],
		alpha: f64,
	) -> Point {
		if cell.mass <= 0.0 {
			return Point::default();
		}
		let point = positions[index];

		if cell.is_leaf() {
			return cell
				.members
				.iter()
				.filter(|&&other| other != index)
				.fold(Point::default(), |push, &other| {
					push + repulsion(positions[other] - point, self.strength, alpha, index)
				});
		}

		let delta = cell.centroid - point;
		let distance = delta.length().max(1e-9);
		let far_enough = !cell.square.contains(point)
			&& cell.square.side / distance < self.theta
			&& cell.mass > 1.0;
		if far_enough {
			return repulsion(delta, self.strength * cell.mass, alpha, index);
		}

		tree.children(cell).fold(Point::default(), |push, child| {
			push + self.accumulate(tree, child, index, positions, alpha)
		})
	}
}

impl Force for ChargeForce {
	fn apply(&mut self, nodes: &mut [Node], _edges: &[Edge], alpha: f64) {
		let positions: Vec<Point> = nodes.iter().map(|n| n.position).collect();
		let Some(tree) = QuadTree::build(&positions) else {
			return;
		};
		for (i, node) in nodes.iter_mut().enumerate() {
			let push = self.accumulate(&tree, tree.root(), i, &positions, alpha);
			node.velocity = node.velocity + push;
		}
	}
}

/// Shifts free nodes so their centroid sits on the drawing surface center.
#[derive(Clone, Debug)]
pub struct CenterForce {
	pub center: Point,
	pub strength: f64,
}

impl Force for CenterForce {
	fn apply(&mut self, nodes: &mut [Node], _edges: &[Edge], _alpha: f64) {
		let (sum, count) = nodes
			.iter()
			.filter(|n| !n.is_pinned())
			.fold((Point::default(), 0usize), |(sum, count), n| {
				(sum + n.position, count + 1)
			});
		if count == 0 {
			return;
		}
		let shift = (sum * (1.0 / count as f64) - self.center) * self.strength;
		for node in nodes.iter_mut().filter(|n| !n.is_pinned()) {
			node.position = node.position - shift;
		}
	}

	fn resize(&mut self, center: Point) {
		self.center = center;
	}
}
