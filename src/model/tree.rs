//! Tree module for phylogenetic tree representation.
//!
//! This module provides the core data structures for representing phylogenetic trees:
//! - `Tree`: The main tree structure using the arena pattern for efficient memory layout.
//! - `TreeIndex` is used to index vertices.

use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type TreeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: TreeIndex = usize::MAX;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by [TreeIndex].
/// Aim is to avoid referencing troubles as well as to provide efficient memory layout
/// and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena
/// - Index of root is maintained
/// - Forks may have any number (at least two) of children; UPGMA trees are binary,
///   Neighbor-Joining trees have a root with three children
/// - Leaves own their taxon label
/// - Branch lengths are optional, but if provided must be finite
///
/// # Construction
/// Add leaves first, then forks bottom-up; adding a fork sets the parent of its children.
/// The last vertex added is the root. Test validity with [Tree::is_valid].
///
/// # Example
/// ```
/// use phylodist::model::tree::Tree;
/// use phylodist::model::vertex::BranchLength;
///
/// // Create a tree: ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new(3);
///
/// let index_a = tree.add_leaf("A", Some(BranchLength::new(0.2)));
/// let index_b = tree.add_leaf("B", Some(BranchLength::new(0.2)));
/// let index_c = tree.add_leaf("C", Some(BranchLength::new(0.4)));
///
/// let index_internal = tree.add_internal_vertex(vec![index_a, index_b], Some(BranchLength::new(0.2)));
/// tree.add_root(vec![index_internal, index_c]);
///
/// assert!(tree.is_valid());
/// assert!(tree.is_ultrametric(1e-9));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: TreeIndex,
}

// ============================================================================
// New, Construction (pub)
// ============================================================================
impl Tree {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// # Arguments
    /// `num_leaves` - expected number of leaves, used to reserve `2n - 1` vertices
    pub fn new(num_leaves: usize) -> Self {
        let capacity = (2 * num_leaves).saturating_sub(1);
        Tree {
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in output order
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root(&mut self, children: Vec<TreeIndex>) -> TreeIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices.push(Vertex::new_root(index, children));
        self.root_index = index;

        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in output order
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Returns
    /// The index of the newly created internal vertex.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<TreeIndex>,
        branch_length: Option<BranchLength>,
    ) -> TreeIndex {
        let index = self.vertices.len();
        for &child in &children {
            self[child].set_parent(index);
        }
        self.vertices.push(Vertex::new_internal(index, children, branch_length));

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `label` - Taxon label of the leaf
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Returns
    /// The index of the newly created leaf vertex.
    pub fn add_leaf(&mut self, label: impl Into<String>, branch_length: Option<BranchLength>) -> TreeIndex {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new_leaf(index, label.into(), branch_length));
        index
    }

    /// Sets the length of the branch above the given non-root vertex.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds or the root.
    pub fn set_branch_length(&mut self, index: TreeIndex, branch_length: BranchLength) {
        self[index].set_branch_length(branch_length);
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and points to a Root vertex
    /// - All vertex indices match their position in the arena
    /// - There is only one root and every fork has at least two children
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Root vertex has no parent set, all others have valid parent set
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index == NO_ROOT_SET_INDEX || self.root_index >= self.vertices.len() {
            return false;
        }
        if !self.vertices[self.root_index].is_root() {
            return false;
        }

        let mut found_root = false;
        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            if vertex.is_root() {
                if found_root || vertex.has_parent() {
                    return false;
                }
                found_root = true;
            }

            if let Some(children) = vertex.children() {
                if children.len() < 2 {
                    return false;
                }
                for &child in children {
                    if child >= self.vertices.len() || self.vertices[child].parent_index() != Some(index) {
                        return false;
                    }
                }
            }

            if !vertex.is_root() {
                let Some(parent_index) = vertex.parent_index() else {
                    return false;
                };
                if parent_index >= self.vertices.len() {
                    return false;
                }
                match self.vertices[parent_index].children() {
                    Some(siblings) if siblings.contains(&index) => {}
                    _ => return false,
                }
            }
        }

        // All vertices must hang below the root
        self.pre_order_iter().count() == self.vertices.len()
    }
}

// ============================================================================
// Getters / Accessors, Queries (pub)
// ============================================================================
impl Tree {
    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns the index of the root vertex.
    pub fn root_index(&self) -> TreeIndex {
        self.root_index
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: TreeIndex) -> &Vertex {
        &self[index]
    }

    /// Returns all vertices in arena order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree (root excluded).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of forks, i.e. internal vertices plus the root.
    pub fn num_forks(&self) -> usize {
        self.vertices.iter().filter(|&v| !v.is_leaf()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of children of the root.
    pub fn root_degree(&self) -> usize {
        self.root().degree()
    }

    /// Returns `true` if every fork, root included, has exactly two children.
    pub fn is_binary(&self) -> bool {
        self.vertices.iter().filter(|v| !v.is_leaf()).all(|v| v.degree() == 2)
    }

    /// Returns the leaf labels in pre-order, i.e. the order they appear in Newick output.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter().filter_map(|v| v.label()).collect()
    }

    /// Returns the index of the leaf with the given label, if any.
    pub fn find_leaf(&self, label: &str) -> Option<TreeIndex> {
        self.vertices.iter().find(|v| v.label() == Some(label)).map(|v| v.index())
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices.iter().all(|v| v.has_branch_length())
    }

    /// Returns the sum of all branch lengths in the tree; missing lengths count as zero.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices.iter().filter_map(|v| v.branch_length()).map(f64::from).sum()
    }

    /// Returns the distance of every vertex from the root, indexed by [TreeIndex].
    ///
    /// Missing branch lengths count as zero.
    pub fn root_distances(&self) -> Vec<f64> {
        let mut depths = vec![0.0; self.num_vertices()];
        for vertex in self.pre_order_iter() {
            if let Some(children) = vertex.children() {
                let depth = depths[vertex.index()];
                for &child in children {
                    depths[child] = depth + self[child].branch_length().map_or(0.0, f64::from);
                }
            }
        }
        depths
    }

    /// Returns the height of this tree, that is, the largest distance from the root to a leaf.
    ///
    /// For an ultrametric tree this is the distance from the root to each leaf.
    pub fn height(&self) -> f64 {
        let depths = self.root_distances();
        self.vertices
            .iter()
            .filter(|v| v.is_leaf())
            .map(|v| depths[v.index()])
            .fold(0.0, f64::max)
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from root).
    ///
    /// # Arguments
    /// * `tolerance` - Absolute tolerance used to compare root-to-leaf distances
    ///
    /// # Returns
    /// `true` if all leaves are at the same distance from the root (within `tolerance`),
    /// `false` otherwise or if some branch length is missing.
    pub fn is_ultrametric(&self, tolerance: f64) -> bool {
        if !self.vertices_have_branch_lengths() {
            return false;
        }

        // Distance from leaves in subtree to each vertex
        let mut distances = vec![0.0; self.num_vertices()];

        for vertex in self.post_order_iter() {
            let Some(children) = vertex.children() else {
                continue;
            };
            let heights: Vec<f64> = children
                .iter()
                .map(|&child| distances[child] + self[child].branch_length().map_or(0.0, f64::from))
                .collect();
            let first = heights[0];
            if heights.iter().any(|h| (h - first).abs() > tolerance) {
                return false;
            }
            distances[vertex.index()] = first;
        }

        true
    }

    /// Returns the pairwise path lengths between all leaves (patristic distances).
    ///
    /// Rows and columns follow the order of [Tree::leaf_labels].
    pub fn leaf_distances(&self) -> Vec<Vec<f64>> {
        let depths = self.root_distances();
        let leaves: Vec<TreeIndex> = self
            .pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(|v| v.index())
            .collect();

        let mut matrix = vec![vec![0.0; leaves.len()]; leaves.len()];
        for (a, &leaf_a) in leaves.iter().enumerate() {
            let ancestors = self.ancestors(leaf_a);
            for (b, &leaf_b) in leaves.iter().enumerate().skip(a + 1) {
                let lca = self.lowest_ancestor_in(leaf_b, &ancestors);
                let distance = depths[leaf_a] + depths[leaf_b] - 2.0 * depths[lca];
                matrix[a][b] = distance;
                matrix[b][a] = distance;
            }
        }
        matrix
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for computing heights, aggregating data from leaves upward, etc.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    /// This is useful for propagating data from root to leaves.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl Tree {
    /// Marks `index` and all its ancestors.
    fn ancestors(&self, index: TreeIndex) -> Vec<bool> {
        let mut marked = vec![false; self.num_vertices()];
        let mut current = Some(index);
        while let Some(i) = current {
            marked[i] = true;
            current = self[i].parent_index();
        }
        marked
    }

    /// Walks up from `index` until hitting a marked vertex.
    fn lowest_ancestor_in(&self, index: TreeIndex, marked: &[bool]) -> TreeIndex {
        let mut current = index;
        while !marked[current] {
            match self[current].parent_index() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }
}

impl std::ops::Index<TreeIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: TreeIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<TreeIndex> for Tree {
    fn index_mut(&mut self, index: TreeIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(TreeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            match vertex.children() {
                Some(children) if !children_visited => {
                    self.stack.push((index, true));
                    // Push in reverse, so first child is processed first
                    for &child in children.iter().rev() {
                        self.stack.push((child, false));
                    }
                }
                _ => return Some(vertex),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<TreeIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        if let Some(children) = vertex.children() {
            self.stack.extend(children.iter().rev());
        }

        Some(vertex)
    }
}
