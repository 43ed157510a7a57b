//! Bookkeeping of the clusters still waiting to be merged.

use super::{ClusterId, ClusteringError};
use crate::model::TreeIndex;
use std::collections::BTreeMap;

/// A cluster of taxa, represented in the tree by the subtree rooted at `subtree`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cluster {
    pub(crate) id: ClusterId,
    /// Root of this cluster's subtree in the tree arena
    pub(crate) subtree: TreeIndex,
    /// Number of taxa (leaves) in the cluster
    pub(crate) size: usize,
    /// Largest distance from the subtree root down to one of its leaves
    pub(crate) height: f64,
}

/// Active clusters keyed by id, plus the id generator.
///
/// Iteration is in ascending id order, which is what makes tie-breaking
/// deterministic. Ids are never reused.
#[derive(Debug, Default)]
pub(crate) struct ActiveClusters {
    clusters: BTreeMap<ClusterId, Cluster>,
    next_id: ClusterId,
}

impl ActiveClusters {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Hands out a fresh id, strictly larger than all previous ones.
    pub(crate) fn allocate_id(&mut self) -> ClusterId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Registers a cluster whose id was obtained from [ActiveClusters::allocate_id].
    pub(crate) fn register(&mut self, cluster: Cluster) {
        debug_assert!(cluster.id < self.next_id, "cluster id {} was not allocated", cluster.id);
        let previous = self.clusters.insert(cluster.id, cluster);
        debug_assert!(previous.is_none(), "cluster id {} registered twice", cluster.id);
    }

    /// Removes and returns an active cluster.
    pub(crate) fn take(&mut self, id: ClusterId) -> Option<Cluster> {
        self.clusters.remove(&id)
    }

    pub(crate) fn get(&self, id: ClusterId) -> Result<&Cluster, ClusteringError> {
        self.clusters
            .get(&id)
            .ok_or(ClusteringError::UnknownPair { a: id, b: id })
    }

    pub(crate) fn contains(&self, id: ClusterId) -> bool {
        self.clusters.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.clusters.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Active ids in ascending order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(registry: &mut ActiveClusters) -> ClusterId {
        let id = registry.allocate_id();
        registry.register(Cluster {
            id,
            subtree: id,
            size: 1,
            height: 0.0,
        });
        id
    }

    #[test]
    fn test_ids_are_fresh_and_sorted() {
        let mut registry = ActiveClusters::new();
        let a = leaf(&mut registry);
        let b = leaf(&mut registry);
        let c = leaf(&mut registry);
        assert_eq!((a, b, c), (0, 1, 2));

        registry.take(b);
        assert!(!registry.contains(b));
        assert_eq!(registry.allocate_id(), 3);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_unknown() {
        let registry = ActiveClusters::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get(4),
            Err(ClusteringError::UnknownPair { a: 4, b: 4 })
        );
    }
}
