use phylodist::model::tree::Tree;
use phylodist::model::vertex::BranchLength;

/// ((A:1,B:1):1.5,C:2.5); plus index of the internal vertex
fn ultrametric_tree() -> (Tree, usize) {
    let mut tree = Tree::new(3);
    let index_a = tree.add_leaf("A", Some(BranchLength::new(1.0)));
    let index_b = tree.add_leaf("B", Some(BranchLength::new(1.0)));
    let index_c = tree.add_leaf("C", Some(BranchLength::new(2.5)));
    let index_i = tree.add_internal_vertex(vec![index_a, index_b], Some(BranchLength::new(1.5)));
    tree.add_root(vec![index_i, index_c]);
    (tree, index_i)
}

#[test]
fn test_building_tree() {
    let mut tree = Tree::new(3);
    let index_l1 = tree.add_leaf("Kea", Some(BranchLength::new(1.0)));
    let index_l2 = tree.add_leaf("Kaka", Some(BranchLength::new(1.0)));
    let index_l3 = tree.add_leaf("Kakapo", Some(BranchLength::new(0.5)));
    let index_i1 = tree.add_internal_vertex(vec![index_l1, index_l2], Some(BranchLength::new(1.5)));
    let index_root = tree.add_root(vec![index_l3, index_i1]);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_forks(), 2);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Root
    let root = tree.root();
    assert_eq!(root.index(), index_root);
    assert!(root.is_root());
    assert_eq!(root.children(), Some(&[index_l3, index_i1][..]));

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.label(), Some("Kaka"));
    assert_eq!(l2.parent_index(), Some(index_i1));

    // Internal
    let inti = &tree[index_i1];
    assert!(inti.is_internal());
    assert_eq!(inti.branch_length(), Some(BranchLength::new(1.5)));
    assert_eq!(tree.find_leaf("Kakapo"), Some(index_l3));
    assert_eq!(tree.find_leaf("Takahe"), None);
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new(2);
    tree.root();
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new(2);
    let _ = &tree[55];
}

#[test]
fn test_unfinished_tree_is_invalid() {
    let mut tree = Tree::new(2);
    tree.add_leaf("A", None);
    tree.add_leaf("B", None);
    assert!(!tree.is_valid());
    assert_eq!(tree.pre_order_iter().count(), 0);
}

#[test]
fn test_tree_with_dangling_vertex_is_invalid() {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf("A", None);
    let b = tree.add_leaf("B", None);
    tree.add_leaf("C", None);
    tree.add_root(vec![a, b]);
    assert!(!tree.is_valid());
}

#[test]
fn test_heights_and_lengths() {
    let (tree, _) = ultrametric_tree();
    assert!(tree.is_ultrametric(1e-9));
    assert_eq!(tree.height(), 2.5);
    assert_eq!(tree.total_branch_length(), 6.0);
    assert!(tree.vertices_have_branch_lengths());
    assert!(tree.is_binary());
    assert_eq!(tree.root_degree(), 2);
}

#[test]
fn test_not_ultrametric() {
    let mut tree = Tree::new(2);
    let a = tree.add_leaf("A", Some(BranchLength::new(1.0)));
    let b = tree.add_leaf("B", Some(BranchLength::new(1.1)));
    tree.add_root(vec![a, b]);
    assert!(!tree.is_ultrametric(1e-3));
    assert!(tree.is_ultrametric(0.2));
}

#[test]
fn test_missing_branch_length_not_ultrametric() {
    let mut tree = Tree::new(2);
    let a = tree.add_leaf("A", None);
    let b = tree.add_leaf("B", None);
    tree.add_root(vec![a, b]);
    assert!(!tree.vertices_have_branch_lengths());
    assert!(!tree.is_ultrametric(1e-9));
}

#[test]
fn test_leaf_distances() {
    let (tree, _) = ultrametric_tree();
    assert_eq!(tree.leaf_labels(), vec!["A", "B", "C"]);
    let distances = tree.leaf_distances();
    assert_eq!(distances[0][1], 2.0);
    assert_eq!(distances[0][2], 5.0);
    assert_eq!(distances[2][1], 5.0);
    assert_eq!(distances[1][1], 0.0);
}

#[test]
fn test_traversal_orders() {
    let (tree, index_i) = ultrametric_tree();

    let post: Vec<_> = tree.post_order_iter().map(|v| v.index()).collect();
    assert_eq!(post, vec![0, 1, index_i, 2, tree.root_index()]);

    let pre: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    assert_eq!(pre, vec![tree.root_index(), index_i, 0, 1, 2]);
}

#[test]
fn test_multifurcating_root() {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf("A", Some(BranchLength::new(1.0)));
    let b = tree.add_leaf("B", Some(BranchLength::new(-0.25)));
    let c = tree.add_leaf("C", Some(BranchLength::new(2.0)));
    tree.add_root(vec![c, b, a]);

    assert!(tree.is_valid());
    assert!(!tree.is_binary());
    assert_eq!(tree.root_degree(), 3);
    assert_eq!(tree.leaf_labels(), vec!["C", "B", "A"]);
    assert_eq!(tree.leaf_distances()[1][2], 0.75);
}
