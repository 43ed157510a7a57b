//! Min-priority index of candidate pairs, with lazy deletion.

use super::registry::ActiveClusters;
use super::store::PairKey;
use super::{ClusterId, ClusteringError};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Candidate merge; ordered by distance, then by the pair's ids.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    pair: PairKey,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Candidate {}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.pair.cmp(&other.pair))
    }
}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of candidate pairs.
///
/// Entries referring to a merged cluster are not removed eagerly; they are skipped
/// when they reach the top. Ties pop in ascending `(lo, hi)` order.
#[derive(Debug, Default)]
pub(crate) struct NearestPairIndex {
    heap: BinaryHeap<Reverse<Candidate>>,
    stale_skipped: usize,
}

impl NearestPairIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        NearestPairIndex {
            heap: BinaryHeap::with_capacity(capacity),
            stale_skipped: 0,
        }
    }

    pub(crate) fn push(&mut self, a: ClusterId, b: ClusterId, distance: f64) {
        self.heap.push(Reverse(Candidate {
            distance,
            pair: PairKey::new(a, b),
        }));
    }

    /// Pops the closest pair whose clusters are both still active.
    ///
    /// # Errors
    /// [ClusteringError::ExhaustedIndex] if no such pair is left.
    pub(crate) fn pop_active(&mut self, active: &ActiveClusters) -> Result<(PairKey, f64), ClusteringError> {
        while let Some(Reverse(candidate)) = self.heap.pop() {
            let pair = candidate.pair;
            if active.contains(pair.lo()) && active.contains(pair.hi()) {
                return Ok((pair, candidate.distance));
            }
            self.stale_skipped += 1;
            tracing::trace!(lo = pair.lo(), hi = pair.hi(), "skipping stale candidate");
        }
        Err(ClusteringError::ExhaustedIndex { active: active.len() })
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Number of stale entries discarded so far.
    pub(crate) fn stale_skipped(&self) -> usize {
        self.stale_skipped
    }
}
