//! Barnes-Hut quadtree kept as a flat arena of cells, rebuilt every tick.

use super::super::types::Point;

/// Cells holding this many points or fewer are not split.
const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

/// Axis-aligned square given by its top-left corner and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Square {
	pub(super) corner: Point,
	pub(super) side: f64,
}

impl Square {
	/// Smallest padded square around `points`, or `None` when there are no
	/// points or any of them is not finite.
	fn enclosing(points: &[Point]) -> Option<Self> {
		let first = *points.first()?;
		let (low, high) = points.iter().fold((first, first), |(low, high), p| {
			(
				Point::new(low.x.min(p.x), low.y.min(p.y)),
				Point::new(high.x.max(p.x), high.y.max(p.y)),
			)
		});
		if !points.iter().all(|p| p.is_finite()) {
			return None;
		}
		let side = (high.x - low.x).max(high.y - low.y).max(1.0) + 2.0;
		let middle = (low + high) * 0.5;
		Some(Self {
			corner: middle - Point::new(side / 2.0, side / 2.0),
			side,
		})
	}

	fn middle(self) -> Point {
		self.corner + Point::new(self.side / 2.0, self.side / 2.0)
	}

	pub(super) fn contains(self, p: Point) -> bool {
		let far = self.corner + Point::new(self.side, self.side);
		(self.corner.x..=far.x).contains(&p.x) && (self.corner.y..=far.y).contains(&p.y)
	}

	/// Quadrant index: bit 0 set on the right half, bit 1 on the bottom half.
	fn quadrant_of(self, p: Point) -> usize {
		let middle = self.middle();
		usize::from(p.x >= middle.x) | usize::from(p.y >= middle.y) << 1
	}

	fn quadrant(self, index: usize) -> Self {
		let half = self.side / 2.0;
		let step = |bit: usize| if index & bit == 0 { 0.0 } else { half };
		Self {
			corner: self.corner + Point::new(step(1), step(2)),
			side: half,
		}
	}
}

/// Aggregate of every point below a cell. Only leaves keep their members.
pub(super) struct Cell {
	pub(super) square: Square,
	pub(super) mass: f64,
	pub(super) centroid: Point,
	pub(super) members: Vec<usize>,
	children: Vec<usize>,
}

impl Cell {
	pub(super) fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

pub(super) struct QuadTree {
	cells: Vec<Cell>,
}

impl QuadTree {
	pub(super) fn build(points: &[Point]) -> Option<Self> {
		let square = Square::enclosing(points)?;
		let mut tree = Self {
			cells: Vec::with_capacity(points.len() / LEAF_CAPACITY + 1),
		};
		tree.insert(square, (0..points.len()).collect(), points, 0);
		Some(tree)
	}

	pub(super) fn root(&self) -> &Cell {
		&self.cells[0]
	}

	pub(super) fn children<'a>(&'a self, cell: &'a Cell) -> impl Iterator<Item = &'a Cell> + 'a {
		cell.children.iter().map(|&i| &self.cells[i])
	}

	/// Adds the cell for `members` and its subtree. Returns its arena index.
	fn insert(
		&mut self,
		square: Square,
		members: Vec<usize>,
		points: &[Point],
		depth: usize,
	) -> usize {
		let mass = members.len() as f64;
		let sum = members.iter().fold(Point::default(), |sum, &i| sum + points[i]);
		let centroid = if mass > 0.0 { sum * (1.0 / mass) } else { sum };

		let index = self.cells.len();
		self.cells.push(Cell {
			square,
			mass,
			centroid,
			members: Vec::new(),
			children: Vec::new(),
		});

		if depth >= MAX_DEPTH || members.len() <= LEAF_CAPACITY {
			self.cells[index].members = members;
			return index;
		}

		let mut split: [Vec<usize>; 4] = Default::default();
		for &i in &members {
			split[square.quadrant_of(points[i])].push(i);
		}
		// Coincident points land in one quadrant forever.
		if split.iter().filter(|part| !part.is_empty()).count() < 2 {
			self.cells[index].members = members;
			return index;
		}

		let children = split
			.into_iter()
			.enumerate()
			.filter(|(_, part)| !part.is_empty())
			.map(|(q, part)| self.insert(square.quadrant(q), part, points, depth + 1))
			.collect();
		self.cells[index].children = children;
		index
	}
}
