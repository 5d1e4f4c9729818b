pub mod concepts;
pub mod graph;
pub mod not_found;
