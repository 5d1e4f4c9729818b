pub mod concept_detail;
pub mod force_graph;
