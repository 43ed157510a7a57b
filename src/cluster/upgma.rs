//! UPGMA (average linkage) construction of an ultrametric tree.

use super::queue::NearestPairIndex;
use super::workspace::Workspace;
use super::{CancellationToken, ClusterId, ClusteringError, Method};
use crate::matrix::DistanceMatrix;
use crate::model::Tree;

/// Builds a rooted, binary, ultrametric tree by repeatedly merging the closest pair.
///
/// The fork joining clusters `i` and `j` at distance `d` sits at height `d / 2`;
/// each child's branch length is that height minus the child's own height.
/// Distances to the merged cluster are the size-weighted average of the
/// distances to `i` and `j`.
pub(crate) fn build(
    matrix: &DistanceMatrix,
    cancellation: Option<&CancellationToken>,
) -> Result<Tree, ClusteringError> {
    let n = matrix.len();
    let required = Method::Upgma.min_taxa();
    if n < required {
        return Err(ClusteringError::InsufficientTaxa {
            method: Method::Upgma,
            required,
            found: n,
        });
    }

    let _span = tracing::debug_span!("upgma", taxa = n).entered();

    let mut workspace = Workspace::from_matrix(matrix, cancellation);
    let mut index = NearestPairIndex::with_capacity(n * (n - 1));
    for (a, b, distance) in workspace.pairs() {
        index.push(a, b, distance);
    }

    while workspace.active_count() > 1 {
        workspace.check_cancelled()?;

        let (pair, _) = index.pop_active(workspace.active())?;
        let (i, j) = (pair.lo(), pair.hi());
        let distance = workspace.distance(i, j)?;
        let height = distance / 2.0;

        let cluster_i = *workspace.cluster(i)?;
        let cluster_j = *workspace.cluster(j)?;
        let (size_i, size_j) = (cluster_i.size as f64, cluster_j.size as f64);

        let updates = workspace
            .active_ids()
            .into_iter()
            .filter(|&k| k != i && k != j)
            .map(|k| {
                let d_ik = workspace.distance(i, k)?;
                let d_jk = workspace.distance(j, k)?;
                Ok((k, d_ik + (d_jk - d_ik) / (size_i + size_j) * size_j))
            })
            .collect::<Result<Vec<(ClusterId, f64)>, ClusteringError>>()?;

        let merged = workspace.join(
            &[(i, height - cluster_i.height), (j, height - cluster_j.height)],
            &updates,
        )?;
        tracing::debug!(i, j, distance, height, merged, "UPGMA merge");

        for (k, d) in updates {
            index.push(k, merged, d);
        }
    }

    tracing::debug!(
        merges = workspace.merges(),
        stale_skipped = index.stale_skipped(),
        left_in_index = index.len(),
        "UPGMA finished"
    );
    workspace.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::to_newick;

    #[test]
    fn test_two_taxa() {
        let matrix = DistanceMatrix::new(vec!["A", "B"], vec![vec![0.0, 3.0], vec![3.0, 0.0]]).unwrap();
        let tree = build(&matrix, None).unwrap();
        assert_eq!(to_newick(&tree), "(A:1.5,B:1.5);");
    }

    #[test]
    fn test_tie_prefers_lowest_ids() {
        // All distances equal: (A,B) first, then (C,D), then the two pairs.
        let rows = vec![
            vec![0.0, 2.0, 2.0, 2.0],
            vec![2.0, 0.0, 2.0, 2.0],
            vec![2.0, 2.0, 0.0, 2.0],
            vec![2.0, 2.0, 2.0, 0.0],
        ];
        let matrix = DistanceMatrix::new(vec!["A", "B", "C", "D"], rows).unwrap();
        let tree = build(&matrix, None).unwrap();
        assert_eq!(to_newick(&tree), "((A:1,B:1):0,(C:1,D:1):0);");
    }

    #[test]
    fn test_single_taxon_rejected() {
        let matrix = DistanceMatrix::new(vec!["A"], vec![vec![0.0]]).unwrap();
        assert_eq!(
            build(&matrix, None).unwrap_err(),
            ClusteringError::InsufficientTaxa {
                method: Method::Upgma,
                required: 2,
                found: 1,
            }
        );
    }
}
