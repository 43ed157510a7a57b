use phylodist::{DistanceMatrix, Tree, build_neighbor_joining, build_upgma, parse_newick, to_newick};
use proptest::prelude::*;

fn plain_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{}", i)).collect()
}

/// Symmetric matrix with zero diagonal from the upper triangle `values`.
fn matrix_from_upper(labels: Vec<String>, values: &[f64]) -> DistanceMatrix {
    let n = labels.len();
    let mut rows = vec![vec![0.0; n]; n];
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            rows[i][j] = values[k];
            rows[j][i] = values[k];
            k += 1;
        }
    }
    DistanceMatrix::new(labels, rows).unwrap()
}

fn random_matrix(min_taxa: usize, max_taxa: usize) -> impl Strategy<Value = DistanceMatrix> {
    (min_taxa..=max_taxa).prop_flat_map(|n| {
        prop::collection::vec(0.0f64..100.0, n * (n - 1) / 2)
            .prop_map(move |values| matrix_from_upper(plain_labels(n), &values))
    })
}

/// Like [random_matrix], but labels mix letters, underscores and spaces.
fn random_labelled_matrix(min_taxa: usize, max_taxa: usize) -> impl Strategy<Value = DistanceMatrix> {
    (min_taxa..=max_taxa).prop_flat_map(|n| {
        (
            prop::collection::vec("[a-z_ ]{0,4}", n),
            prop::collection::vec(0.0f64..100.0, n * (n - 1) / 2),
        )
            .prop_map(|(prefixes, values)| {
                let labels = prefixes
                    .iter()
                    .enumerate()
                    .map(|(i, prefix)| format!("{}{}", prefix, i))
                    .collect();
                matrix_from_upper(labels, &values)
            })
    })
}

fn sorted_labels(tree: &Tree) -> Vec<String> {
    let mut labels: Vec<String> = tree.leaf_labels().into_iter().map(str::to_string).collect();
    labels.sort();
    labels
}

proptest! {
    #[test]
    fn upgma_is_binary_and_ultrametric(matrix in random_matrix(2, 8)) {
        let tree = build_upgma(&matrix).unwrap();
        let n = matrix.len();

        prop_assert!(tree.is_valid());
        prop_assert!(tree.is_binary());
        prop_assert_eq!(tree.num_leaves(), n);
        prop_assert_eq!(tree.num_forks(), n - 1);
        prop_assert!(tree.is_ultrametric(1e-6));
        prop_assert!(tree.vertices().iter().filter_map(|v| v.branch_length()).all(|bl| *bl >= -1e-9));
    }

    #[test]
    fn neighbor_joining_shape(matrix in random_matrix(3, 8)) {
        let tree = build_neighbor_joining(&matrix).unwrap();
        let n = matrix.len();

        prop_assert!(tree.is_valid());
        prop_assert_eq!(tree.num_leaves(), n);
        prop_assert_eq!(tree.root_degree(), 3);
        prop_assert_eq!(tree.num_internal(), n - 3);
        prop_assert!(tree.vertices().iter().filter(|v| v.is_internal()).all(|v| v.degree() == 2));
        prop_assert!(tree.vertices_have_branch_lengths());
    }

    #[test]
    fn neighbor_joining_recovers_star_lengths(
        lengths in prop::collection::vec(0.5f64..50.0, 3..8)
    ) {
        let n = lengths.len();
        let mut values = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                values.push(lengths[i] + lengths[j]);
            }
        }
        let matrix = matrix_from_upper(plain_labels(n), &values);
        let tree = build_neighbor_joining(&matrix).unwrap();

        let labels = tree.leaf_labels();
        let distances = tree.leaf_distances();
        for (a, label_a) in labels.iter().enumerate() {
            for (b, label_b) in labels.iter().enumerate() {
                let i = matrix.labels().iter().position(|l| l == label_a).unwrap();
                let j = matrix.labels().iter().position(|l| l == label_b).unwrap();
                prop_assert!((distances[a][b] - matrix.get(i, j)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn newick_output_reparses_identically(matrix in random_labelled_matrix(3, 8)) {
        for tree in [build_upgma(&matrix).unwrap(), build_neighbor_joining(&matrix).unwrap()] {
            let newick = to_newick(&tree);
            let parsed = parse_newick(&newick).unwrap();

            prop_assert_eq!(to_newick(&parsed), newick);
            prop_assert_eq!(sorted_labels(&parsed), sorted_labels(&tree));
        }
    }

    #[test]
    fn runs_are_deterministic(matrix in random_matrix(3, 8)) {
        prop_assert_eq!(build_upgma(&matrix).unwrap(), build_upgma(&matrix).unwrap());
        prop_assert_eq!(
            build_neighbor_joining(&matrix).unwrap(),
            build_neighbor_joining(&matrix).unwrap()
        );
    }
}
