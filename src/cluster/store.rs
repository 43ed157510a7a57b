//! Pairwise distances between active clusters.

use super::{ClusterId, ClusteringError};
use std::collections::HashMap;

/// Unordered pair of cluster ids, normalised so that `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PairKey {
    lo: ClusterId,
    hi: ClusterId,
}

impl PairKey {
    /// # Panics
    /// Panics in debug builds if `a == b`.
    pub(crate) fn new(a: ClusterId, b: ClusterId) -> Self {
        debug_assert_ne!(a, b, "pair of identical clusters");
        if a < b {
            PairKey { lo: a, hi: b }
        } else {
            PairKey { lo: b, hi: a }
        }
    }

    pub(crate) fn lo(&self) -> ClusterId {
        self.lo
    }

    pub(crate) fn hi(&self) -> ClusterId {
        self.hi
    }
}

/// Symmetric distance table over cluster ids.
///
/// Only pairs of distinct, active clusters are stored; merging retires every
/// pair touching the merged clusters.
#[derive(Debug, Default)]
pub(crate) struct DistanceStore {
    distances: HashMap<PairKey, f64>,
}

impl DistanceStore {
    /// Creates a store with room for all pairs of `n` taxa.
    pub(crate) fn with_taxa(n: usize) -> Self {
        DistanceStore {
            distances: HashMap::with_capacity(n * n.saturating_sub(1) / 2),
        }
    }

    pub(crate) fn get(&self, a: ClusterId, b: ClusterId) -> Result<f64, ClusteringError> {
        if a == b {
            return Err(ClusteringError::UnknownPair { a, b });
        }
        self.distances
            .get(&PairKey::new(a, b))
            .copied()
            .ok_or(ClusteringError::UnknownPair { a, b })
    }

    pub(crate) fn set(&mut self, a: ClusterId, b: ClusterId, distance: f64) {
        self.distances.insert(PairKey::new(a, b), distance);
    }

    /// Drops every pair touching one of `ids`, returns how many were removed.
    ///
    /// # Arguments
    /// * `ids` - Retired cluster ids
    /// * `active` - All other clusters that may still share a pair with `ids`
    pub(crate) fn retire(&mut self, ids: &[ClusterId], active: impl IntoIterator<Item = ClusterId>) -> usize {
        let before = self.distances.len();
        for (n, &a) in ids.iter().enumerate() {
            for &b in &ids[n + 1..] {
                self.distances.remove(&PairKey::new(a, b));
            }
        }
        for k in active {
            for &id in ids {
                self.distances.remove(&PairKey::new(id, k));
            }
        }
        before - self.distances.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.distances.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (PairKey, f64)> + '_ {
        self.distances.iter().map(|(&pair, &d)| (pair, d))
    }
}
