//! Synthetic links for when no relation data is loaded.
//!
//! The sampled edges only give the layout some structure to settle into; they
//! say nothing about how concepts are actually related.

use rand::Rng;

use super::types::{GraphLink, GraphNode};

/// Maximum number of source nodes considered by the sampler.
pub const MAX_SAMPLED_LINKS: usize = 20;

/// Source of target indices for the sampler.
pub trait TargetPicker {
	/// Returns an index in `0..len`. `len` is never zero.
	fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> TargetPicker for R {
	fn pick(&mut self, len: usize) -> usize {
		self.random_range(0..len)
	}
}

#[derive(Clone, Copy, Debug)]
pub struct LinkSampler {
	pub max_links: usize,
}

impl Default for LinkSampler {
	fn default() -> Self {
		Self {
			max_links: MAX_SAMPLED_LINKS,
		}
	}
}

impl LinkSampler {
	/// Links each of the first `max_links` nodes to a randomly picked node.
	///
	/// A pick that lands on the source itself is skipped rather than retried,
	/// and the same pair may be produced twice.
	pub fn sample<P: TargetPicker + ?Sized>(
		&self,
		nodes: &[GraphNode],
		picker: &mut P,
	) -> Vec<GraphLink> {
		if nodes.is_empty() {
			return Vec::new();
		}
		let mut links = Vec::with_capacity(nodes.len().min(self.max_links));
		for source in nodes.iter().take(self.max_links) {
			let Some(target) = nodes.get(picker.pick(nodes.len())) else {
				continue;
			};
			if source.id == target.id {
				continue;
			}
			links.push(GraphLink {
				source: source.id.clone(),
				target: target.id.clone(),
			});
		}
		links
	}
}
