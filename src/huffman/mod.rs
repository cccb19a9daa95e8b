pub mod canonical;
pub mod tables;
pub mod tree;

pub use canonical::{AssignedCode, CanonicalCode};
pub use tables::{fixed_distance_tree, fixed_literal_length_tree};
pub use tree::{CodeTree, Node};
