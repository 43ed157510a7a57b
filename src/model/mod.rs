/// Phylogenetic tree structure and operations
pub mod tree;
/// Tree vertex types (root, internal, leaf)
pub mod vertex;

pub use tree::{Tree, TreeIndex};
pub use vertex::{BranchLength, Vertex};
