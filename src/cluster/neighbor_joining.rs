//! Neighbor-Joining construction of an unrooted tree, presented rooted at a degree-3 fork.

use super::workspace::Workspace;
use super::{CancellationToken, ClusterId, ClusteringError, Method};
use crate::matrix::DistanceMatrix;
use crate::model::Tree;

/// Builds a Neighbor-Joining tree.
///
/// While more than three clusters are active, the pair minimising
/// `Q(i, j) = (n - 2) * d(i, j) - T(i) - T(j)` is joined, where `T(x)` is the sum of
/// distances from `x` to all other active clusters. The last three clusters are joined
/// under a single fork, which becomes the root.
///
/// Branch lengths are kept as computed and may be negative.
pub(crate) fn build(
    matrix: &DistanceMatrix,
    cancellation: Option<&CancellationToken>,
) -> Result<Tree, ClusteringError> {
    let n = matrix.len();
    let required = Method::NeighborJoining.min_taxa();
    if n < required {
        return Err(ClusteringError::InsufficientTaxa {
            method: Method::NeighborJoining,
            required,
            found: n,
        });
    }

    let _span = tracing::debug_span!("neighbor_joining", taxa = n).entered();

    let mut workspace = Workspace::from_matrix(matrix, cancellation);

    while workspace.active_count() > 3 {
        workspace.check_cancelled()?;

        let ids = workspace.active_ids();
        let totals = row_totals(&workspace, &ids)?;
        let (a, b, q) = select_pair(&workspace, &ids, &totals)?;
        let (i, j) = (ids[a], ids[b]);

        let active = ids.len() as f64;
        let d_ij = workspace.distance(i, j)?;
        let length_i = d_ij / 2.0 + (totals[a] - totals[b]) / (2.0 * (active - 2.0));
        let length_j = d_ij - length_i;

        let updates = ids
            .iter()
            .copied()
            .filter(|&k| k != i && k != j)
            .map(|k| {
                let d_ik = workspace.distance(i, k)?;
                let d_jk = workspace.distance(j, k)?;
                Ok((k, (d_ik + d_jk - d_ij) / 2.0))
            })
            .collect::<Result<Vec<(ClusterId, f64)>, ClusteringError>>()?;

        let merged = workspace.join(&[(i, length_i), (j, length_j)], &updates)?;
        tracing::debug!(i, j, q, length_i, length_j, merged, "NJ merge");
    }

    workspace.check_cancelled()?;
    let children = terminal_join(&workspace)?;
    workspace.join(&children, &[])?;
    tracing::debug!(children = ?children, merges = workspace.merges(), "NJ finished");

    workspace.finish()
}

/// `T(x)` for each id in `ids`, in the same order.
fn row_totals(workspace: &Workspace<'_>, ids: &[ClusterId]) -> Result<Vec<f64>, ClusteringError> {
    ids.iter()
        .map(|&x| {
            ids.iter()
                .filter(|&&y| y != x)
                .map(|&y| workspace.distance(x, y))
                .sum::<Result<f64, ClusteringError>>()
        })
        .collect()
}

/// Positions `(a, b)` in `ids` of the pair with the smallest Q, plus that Q.
///
/// Scans pairs `a < b` in ascending id order and keeps the first strict minimum.
fn select_pair(
    workspace: &Workspace<'_>,
    ids: &[ClusterId],
    totals: &[f64],
) -> Result<(usize, usize, f64), ClusteringError> {
    let factor = ids.len() as f64 - 2.0;
    let mut best: Option<(usize, usize, f64)> = None;

    for a in 0..ids.len() {
        for b in a + 1..ids.len() {
            let q = factor * workspace.distance(ids[a], ids[b])? - totals[a] - totals[b];
            if best.is_none_or(|(_, _, best_q)| q < best_q) {
                best = Some((a, b, q));
            }
        }
    }

    best.ok_or(ClusteringError::ExhaustedIndex { active: ids.len() })
}

/// Branch lengths for the last three clusters.
///
/// Children are ordered by descending branch length, ties by ascending id.
fn terminal_join(workspace: &Workspace<'_>) -> Result<Vec<(ClusterId, f64)>, ClusteringError> {
    let ids = workspace.active_ids();
    let &[x, y, z] = ids.as_slice() else {
        return Err(ClusteringError::ExhaustedIndex { active: ids.len() });
    };

    let d_xy = workspace.distance(x, y)?;
    let d_xz = workspace.distance(x, z)?;
    let d_yz = workspace.distance(y, z)?;

    let mut children = vec![
        (x, (d_xy + d_xz - d_yz) / 2.0),
        (y, (d_xy + d_yz - d_xz) / 2.0),
        (z, (d_xz + d_yz - d_xy) / 2.0),
    ];
    // Stable sort keeps ascending ids among equal lengths
    children.sort_by(|(_, l1), (_, l2)| l2.total_cmp(l1));

    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::to_newick;

    #[test]
    fn test_three_taxa_star() {
        let rows = vec![vec![0.0, 3.0, 4.0], vec![3.0, 0.0, 5.0], vec![4.0, 5.0, 0.0]];
        let matrix = DistanceMatrix::new(vec!["A", "B", "C"], rows).unwrap();
        let tree = build(&matrix, None).unwrap();
        // A = 1, B = 2, C = 3
        assert_eq!(to_newick(&tree), "(C:3,B:2,A:1);");
        assert_eq!(tree.root_degree(), 3);
    }

    #[test]
    fn test_two_taxa_rejected() {
        let matrix = DistanceMatrix::new(vec!["A", "B"], vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert!(matches!(
            build(&matrix, None),
            Err(ClusteringError::InsufficientTaxa { required: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_additive_distances_recovered() {
        // Tree ((A:1,B:2):1,C:3,D:4) rooted anywhere; pairwise path lengths are additive.
        let rows = vec![
            vec![0.0, 3.0, 5.0, 6.0],
            vec![3.0, 0.0, 6.0, 7.0],
            vec![5.0, 6.0, 0.0, 7.0],
            vec![6.0, 7.0, 7.0, 0.0],
        ];
        let matrix = DistanceMatrix::new(vec!["A", "B", "C", "D"], rows.clone()).unwrap();
        let tree = build(&matrix, None).unwrap();
        let labels = tree.leaf_labels();
        let distances = tree.leaf_distances();
        for (a, la) in labels.iter().enumerate() {
            for (b, lb) in labels.iter().enumerate() {
                let i = matrix.labels().iter().position(|l| l == la).unwrap();
                let j = matrix.labels().iter().position(|l| l == lb).unwrap();
                assert!((distances[a][b] - rows[i][j]).abs() < 1e-9);
            }
        }
    }
}
