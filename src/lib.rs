//! Phylodist builds phylogenetic trees from pairwise distance matrices and
//! writes them as Newick strings.
//!
//! Core functionality provided:
//! - Input: [DistanceMatrix], a validated square matrix of distances between named
//!   taxa, built from rows or loaded from a labelled CSV table.
//! - Construction: two agglomerative methods, see [Method]:
//!   - UPGMA: rooted, binary and ultrametric trees
//!   - Neighbor-Joining: unrooted trees, presented with a degree-3 top fork
//! - Output: Newick strings with branch lengths rounded to three decimals and
//!   sanitized labels, see [crate::newick].
//! - Tree model: [Tree] uses the arena pattern on [Vertex], so no direct vertex
//!   references are stored, only vertex indices. See [crate::model].
//!
//! Construction is deterministic: ties are broken by cluster ids, which are
//! assigned to taxa in matrix order and to merged clusters in creation order.
//!
//! # Usage patterns
//! 1. The quick API below runs a method with default settings.
//! 2. Configure a [Clusterer] with [ClustererBuilder], e.g. to be able to cancel
//!    long runs via a [CancellationToken].
//!
//! ## Example Default Configuration
//! ```
//! use phylodist::{DistanceMatrix, build_upgma, to_newick};
//!
//! let matrix = DistanceMatrix::from_csv_str(",A,B,C\nA,0,4,6\nB,4,0,6\nC,6,6,0").unwrap();
//! let tree = build_upgma(&matrix).unwrap();
//! assert_eq!(to_newick(&tree), "(C:3,(A:2,B:2):1);");
//! ```
//!
//! ## Example Clusterer Configuration
//! ```
//! use phylodist::{CancellationToken, ClustererBuilder, DistanceMatrix, Method};
//!
//! let matrix = DistanceMatrix::from_csv_str(",A,B,C\nA,0,3,4\nB,3,0,5\nC,4,5,0").unwrap();
//! let token = CancellationToken::new();
//! let clusterer = ClustererBuilder::new("nj".parse::<Method>().unwrap())
//!     .with_cancellation(token.clone())
//!     .build();
//!
//! let tree = clusterer.run(&matrix).unwrap();
//! assert_eq!(tree.root_degree(), 3);
//! ```

pub mod cluster;
pub mod matrix;
pub mod model;
pub mod newick;

pub use crate::cluster::{
    CancellationToken, ClusterId, Clusterer, ClustererBuilder, ClusteringError, Method,
    UnknownMethodError,
};
pub use crate::matrix::{DistanceMatrix, ValidationError};
pub use crate::model::{BranchLength, Tree, TreeIndex, Vertex};
pub use crate::newick::{NewickWriter, ParsingError, to_newick, write_newick_file};

// ============================================================================
// Quick Construction API
// ============================================================================
/// Builds a rooted, binary, ultrametric tree with UPGMA.
///
/// # Errors
/// [ClusteringError::InsufficientTaxa] for fewer than two taxa.
pub fn build_upgma(matrix: &DistanceMatrix) -> Result<Tree, ClusteringError> {
    build_tree(Method::Upgma, matrix)
}

/// Builds a Neighbor-Joining tree, presented with a degree-3 top fork.
///
/// # Errors
/// [ClusteringError::InsufficientTaxa] for fewer than three taxa.
pub fn build_neighbor_joining(matrix: &DistanceMatrix) -> Result<Tree, ClusteringError> {
    build_tree(Method::NeighborJoining, matrix)
}

/// Builds a tree with the given method and default settings.
pub fn build_tree(method: Method, matrix: &DistanceMatrix) -> Result<Tree, ClusteringError> {
    ClustererBuilder::new(method).build().run(matrix)
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a single Newick string.
///
/// See [`newick::parse_str`] for full documentation.
pub fn parse_newick<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Parses all Newick trees of a file.
///
/// See [`newick::parse_file`] for full documentation.
pub fn parse_newick_file<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<Tree>, ParsingError> {
    newick::parse_file(path)
}
