//! Agglomerative tree construction from a [DistanceMatrix].
//!
//! Two methods are provided, see [Method]. Both start with one cluster per taxon and
//! repeatedly join clusters under a new fork until a single tree remains.
//!
//! Use [ClustererBuilder] to configure a run, or the shortcuts
//! [build_upgma](crate::build_upgma) / [build_neighbor_joining](crate::build_neighbor_joining).
//!
//! # Example
//! ```
//! use phylodist::{ClustererBuilder, DistanceMatrix, Method};
//!
//! let matrix = DistanceMatrix::from_csv_str(",A,B,C\nA,0,4,6\nB,4,0,6\nC,6,6,0").unwrap();
//! let tree = ClustererBuilder::new(Method::Upgma).build().run(&matrix).unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! ```

mod cancel;
mod clustering_error;
mod neighbor_joining;
mod queue;
mod registry;
mod store;
mod upgma;
mod workspace;

pub use cancel::CancellationToken;
pub use clustering_error::{ClusteringError, UnknownMethodError};

use crate::matrix::DistanceMatrix;
use crate::model::Tree;
use std::fmt;
use std::str::FromStr;

/// Identifier of a cluster during construction: `0..n` for the taxa in matrix order,
/// then increasing for each merged cluster.
pub type ClusterId = usize;

// =#========================================================================#=
// METHOD
// =#========================================================================#=
/// Tree construction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Unweighted pair group method with arithmetic mean; rooted, binary, ultrametric.
    Upgma,
    /// Saitou and Nei's Neighbor-Joining; unrooted tree with a degree-3 top fork.
    NeighborJoining,
}

impl Method {
    /// Smallest number of taxa the method accepts.
    pub fn min_taxa(&self) -> usize {
        match self {
            Method::Upgma => 2,
            Method::NeighborJoining => 3,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Upgma => write!(f, "UPGMA"),
            Method::NeighborJoining => write!(f, "Neighbor-Joining"),
        }
    }
}

impl FromStr for Method {
    type Err = UnknownMethodError;

    /// Case-insensitive; accepts `upgma`, `nj`, `neighbor-joining` and `neighbour-joining`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "upgma" => Ok(Method::Upgma),
            "nj" | "neighbor-joining" | "neighbour-joining" | "neighborjoining" => Ok(Method::NeighborJoining),
            _ => Err(UnknownMethodError(s.to_string())),
        }
    }
}

// =#========================================================================#=
// CLUSTERER
// =#========================================================================#=
/// Builder for [Clusterer].
///
/// # Example
/// ```
/// use phylodist::{CancellationToken, ClustererBuilder, Method};
///
/// let token = CancellationToken::new();
/// let clusterer = ClustererBuilder::new(Method::NeighborJoining)
///     .with_cancellation(token.clone())
///     .build();
/// assert_eq!(clusterer.method(), Method::NeighborJoining);
/// ```
#[derive(Debug, Clone)]
pub struct ClustererBuilder {
    method: Method,
    cancellation: Option<CancellationToken>,
}

impl ClustererBuilder {
    /// Creates a builder for the given method, without cancellation.
    pub fn new(method: Method) -> Self {
        ClustererBuilder {
            method,
            cancellation: None,
        }
    }

    /// Sets the token checked once per merge.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn build(self) -> Clusterer {
        Clusterer {
            method: self.method,
            cancellation: self.cancellation,
        }
    }
}

/// Configured tree constructor. Runs are independent; the matrix is never modified.
#[derive(Debug, Clone)]
pub struct Clusterer {
    method: Method,
    cancellation: Option<CancellationToken>,
}

impl Clusterer {
    pub fn method(&self) -> Method {
        self.method
    }

    /// Builds a tree from `matrix`.
    ///
    /// # Errors
    /// - [ClusteringError::InsufficientTaxa] if `matrix` has fewer than [Method::min_taxa] taxa
    /// - [ClusteringError::Cancelled] if the cancellation token was raised
    /// - [ClusteringError::UnknownPair] / [ClusteringError::ExhaustedIndex] on internal inconsistencies
    pub fn run(&self, matrix: &DistanceMatrix) -> Result<Tree, ClusteringError> {
        let cancellation = self.cancellation.as_ref();
        match self.method {
            Method::Upgma => upgma::build(matrix, cancellation),
            Method::NeighborJoining => neighbor_joining::build(matrix, cancellation),
        }
    }
}
