//! Mutable state shared by the agglomerative engines.

use super::registry::{ActiveClusters, Cluster};
use super::store::DistanceStore;
use super::{CancellationToken, ClusterId, ClusteringError};
use crate::matrix::DistanceMatrix;
use crate::model::{BranchLength, Tree};

/// Active clusters, their pairwise distances and the tree built so far.
///
/// Leaves get cluster ids `0..n` in matrix order; each join allocates the next id.
/// The fork created by the join that leaves no other cluster active becomes the root.
pub(crate) struct Workspace<'a> {
    registry: ActiveClusters,
    store: DistanceStore,
    tree: Tree,
    cancellation: Option<&'a CancellationToken>,
    merges: usize,
}

impl<'a> Workspace<'a> {
    pub(crate) fn from_matrix(matrix: &DistanceMatrix, cancellation: Option<&'a CancellationToken>) -> Self {
        let n = matrix.len();
        let mut tree = Tree::new(n);
        let mut registry = ActiveClusters::new();
        for label in matrix.labels() {
            let id = registry.allocate_id();
            let subtree = tree.add_leaf(label.as_str(), None);
            registry.register(Cluster {
                id,
                subtree,
                size: 1,
                height: 0.0,
            });
        }

        let mut store = DistanceStore::with_taxa(n);
        for (i, j, distance) in matrix.pairs() {
            store.set(i, j, distance);
        }

        Workspace {
            registry,
            store,
            tree,
            cancellation,
            merges: 0,
        }
    }

    pub(crate) fn active(&self) -> &ActiveClusters {
        &self.registry
    }

    pub(crate) fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// Active ids in ascending order.
    pub(crate) fn active_ids(&self) -> Vec<ClusterId> {
        self.registry.ids().collect()
    }

    pub(crate) fn cluster(&self, id: ClusterId) -> Result<&Cluster, ClusteringError> {
        self.registry.get(id)
    }

    /// Distance between two active clusters.
    pub(crate) fn distance(&self, a: ClusterId, b: ClusterId) -> Result<f64, ClusteringError> {
        if !self.registry.contains(a) || !self.registry.contains(b) {
            return Err(ClusteringError::UnknownPair { a, b });
        }
        self.store.get(a, b)
    }

    /// All stored pairs between active clusters.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (ClusterId, ClusterId, f64)> + '_ {
        self.store.iter().map(|(pair, d)| (pair.lo(), pair.hi(), d))
    }

    pub(crate) fn merges(&self) -> usize {
        self.merges
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), ClusteringError> {
        match self.cancellation {
            Some(token) if token.is_cancelled() => Err(ClusteringError::Cancelled { merges: self.merges }),
            _ => Ok(()),
        }
    }

    /// Joins active clusters under a new fork.
    ///
    /// # Arguments
    /// * `children` - `(id, branch length)` of each cluster to join, in output order
    /// * `distances` - Distance from the new cluster to each remaining active cluster
    ///
    /// # Returns
    /// The id of the new cluster.
    ///
    /// # Errors
    /// * [ClusteringError::UnknownPair] if a child is not active
    /// * [ClusteringError::NonFinite] if a branch length or distance is not finite
    ///
    /// Nothing is modified on error.
    pub(crate) fn join(
        &mut self,
        children: &[(ClusterId, f64)],
        distances: &[(ClusterId, f64)],
    ) -> Result<ClusterId, ClusteringError> {
        let mut subtrees = Vec::with_capacity(children.len());
        let mut size = 0;
        let mut height: f64 = 0.0;
        for &(id, _) in children {
            let cluster = self.registry.get(id)?;
            subtrees.push(cluster.subtree);
        }
        let mut values = children.iter().chain(distances).map(|&(_, value)| value);
        if let Some(value) = values.find(|value| !value.is_finite()) {
            return Err(ClusteringError::NonFinite {
                merge: self.merges + 1,
                value,
            });
        }

        let ids: Vec<ClusterId> = children.iter().map(|&(id, _)| id).collect();
        for &(id, length) in children {
            if let Some(cluster) = self.registry.take(id) {
                self.tree.set_branch_length(cluster.subtree, BranchLength::new(length));
                size += cluster.size;
                height = height.max(cluster.height + length);
            }
        }

        let new_id = self.registry.allocate_id();
        let subtree = if self.registry.is_empty() {
            self.tree.add_root(subtrees)
        } else {
            self.tree.add_internal_vertex(subtrees, None)
        };

        for &(other, distance) in distances {
            self.store.set(other, new_id, distance);
        }
        self.store.retire(&ids, self.registry.ids());
        self.registry.register(Cluster {
            id: new_id,
            subtree,
            size,
            height,
        });
        self.merges += 1;

        Ok(new_id)
    }

    /// Hands out the finished tree once a single cluster is left.
    pub(crate) fn finish(self) -> Result<Tree, ClusteringError> {
        if self.registry.len() != 1 || !self.tree.is_root_set() {
            return Err(ClusteringError::ExhaustedIndex {
                active: self.registry.len(),
            });
        }
        debug_assert_eq!(self.store.len(), 0);
        Ok(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> DistanceMatrix {
        let rows = vec![vec![0.0, 2.0, 4.0], vec![2.0, 0.0, 4.0], vec![4.0, 4.0, 0.0]];
        DistanceMatrix::new(vec!["A", "B", "C"], rows).unwrap()
    }

    #[test]
    fn test_join_registers_new_cluster() {
        let matrix = matrix();
        let mut workspace = Workspace::from_matrix(&matrix, None);

        let merged = workspace.join(&[(0, 1.0), (1, 1.0)], &[(2, 4.0)]).unwrap();
        assert_eq!(merged, 3);
        assert_eq!(workspace.active_ids(), vec![2, 3]);
        assert_eq!(workspace.distance(2, 3), Ok(4.0));
        assert_eq!(workspace.cluster(3).unwrap().size, 2);
        assert_eq!(workspace.pairs().count(), 1);
    }

    #[test]
    fn test_join_rejects_non_finite_values() {
        let matrix = matrix();
        let mut workspace = Workspace::from_matrix(&matrix, None);

        let err = workspace.join(&[(0, f64::NAN), (1, 1.0)], &[(2, 4.0)]).unwrap_err();
        assert!(matches!(err, ClusteringError::NonFinite { merge: 1, value } if value.is_nan()));

        let err = workspace.join(&[(0, 1.0), (1, 1.0)], &[(2, f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, ClusteringError::NonFinite { merge: 1, .. }));

        assert_eq!(workspace.active_count(), 3);
        assert_eq!(workspace.merges(), 0);
        assert_eq!(workspace.distance(0, 1), Ok(2.0));
    }
}
