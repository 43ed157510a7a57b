use super::{ClusterId, Method};
use thiserror::Error;

/// Error raised while building a tree from a [DistanceMatrix](crate::DistanceMatrix).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// The matrix has fewer taxa than the method needs.
    #[error("{method} requires at least {required} taxa, got {found}")]
    InsufficientTaxa {
        method: Method,
        required: usize,
        found: usize,
    },

    /// A distance was requested for a pair that is not (or no longer) active.
    #[error("No distance stored between clusters {a} and {b}")]
    UnknownPair { a: ClusterId, b: ClusterId },

    /// The nearest-pair index ran dry while clusters were still waiting to be merged.
    #[error("Nearest-pair index exhausted with {active} clusters still active")]
    ExhaustedIndex { active: usize },

    /// A branch length or distance left the finite range, e.g. from huge input distances.
    #[error("Non-finite value {value} computed in merge {merge}")]
    NonFinite { merge: usize, value: f64 },

    /// A [CancellationToken](super::CancellationToken) was raised.
    #[error("Tree construction cancelled after {merges} merges")]
    Cancelled { merges: usize },
}

/// Parse failure for [Method] names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown clustering method '{0}', expected 'upgma' or 'nj'")]
pub struct UnknownMethodError(pub String);
