//! Catalog helpers for the concept list: search matching and per-category statistics.

use std::collections::BTreeMap;

use crate::api::Concept;

/// Case-insensitive substring match of a search term against a concept's name
/// and description. An empty term matches everything.
pub fn matches_search(concept: &Concept, term: &str) -> bool {
	let term = term.trim().to_lowercase();
	if term.is_empty() {
		return true;
	}
	concept.name.to_lowercase().contains(&term)
		|| concept.description.to_lowercase().contains(&term)
}

/// Summary shown next to the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogStats {
	pub total: usize,
	/// Concept count per category label, ordered by label.
	pub per_category: Vec<(String, usize)>,
}

impl CatalogStats {
	pub fn from_concepts(concepts: &[Concept]) -> Self {
		let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
		for concept in concepts {
			*counts.entry(concept.category_label()).or_default() += 1;
		}
		Self {
			total: concepts.len(),
			per_category: counts
				.into_iter()
				.map(|(category, count)| (category.to_string(), count))
				.collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::ConceptId;
	use crate::config::UNCATEGORIZED;

	fn concept(id: &str, name: &str, description: &str, category: Option<&str>) -> Concept {
		Concept {
			id: ConceptId::from(id),
			name: name.into(),
			description: description.into(),
			category: category.map(Into::into),
		}
	}

	#[test]
	fn search_is_case_insensitive_and_trimmed() {
		let c = concept("1", "Eye Faculty", "One of the material dharmas", Some("色法"));
		assert!(matches_search(&c, "  eye "));
		assert!(matches_search(&c, "MATERIAL"));
		assert!(!matches_search(&c, "mind"));
		assert!(matches_search(&c, "   "));
	}

	#[test]
	fn stats_group_missing_categories_together() {
		let concepts = vec![
			concept("1", "A", "", Some("X")),
			concept("2", "B", "", Some("X")),
			concept("3", "C", "", None),
			concept("4", "D", "", Some("")),
		];
		let stats = CatalogStats::from_concepts(&concepts);
		assert_eq!(stats.total, 4);
		assert_eq!(
			stats.per_category,
			vec![(UNCATEGORIZED.to_string(), 2), ("X".to_string(), 2)]
		);
	}
}
