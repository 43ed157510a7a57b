//! Newick format string and file writing.

use crate::model::{BranchLength, Tree, TreeIndex};
use crate::newick::defs::DEFAULT_PRECISION;
use crate::newick::labels::sanitize_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Serializes [Tree]s to Newick strings.
///
/// Branch lengths are rounded to `precision` decimal places with trailing zeros
/// (and a trailing decimal point) removed, so `8.500` is written as `8.5` and
/// `11.000` as `11`. A value that rounds to zero is always written as `0`.
///
/// # Example
/// ```
/// use phylodist::model::{BranchLength, Tree};
/// use phylodist::newick::NewickWriter;
///
/// let mut tree = Tree::new(2);
/// let a = tree.add_leaf("A", Some(BranchLength::new(1.0 / 3.0)));
/// let b = tree.add_leaf("B", Some(BranchLength::new(2.0)));
/// tree.add_root(vec![a, b]);
///
/// assert_eq!(NewickWriter::new().write(&tree), "(A:0.333,B:2);");
/// assert_eq!(NewickWriter::new().with_precision(1).write(&tree), "(A:0.3,B:2);");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewickWriter {
    precision: usize,
}

impl Default for NewickWriter {
    fn default() -> Self {
        NewickWriter {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl NewickWriter {
    /// Creates a writer with [DEFAULT_PRECISION] decimal places.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of decimal places for branch lengths.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Returns the Newick representation of `tree` with closing semicolon.
    ///
    /// Each fork is written as `(child,child,...)` in stored child order, each leaf by
    /// its sanitized label, and every non-root vertex with a branch length gets `:length`.
    pub fn write(&self, tree: &Tree) -> String {
        self.write_with_capacity(tree, estimate_newick_len(tree))
    }

    pub(crate) fn write_with_capacity(&self, tree: &Tree, estimated_capacity: usize) -> String {
        let mut newick = String::with_capacity(estimated_capacity);
        if tree.is_root_set() {
            self.build_newick(tree, &mut newick, tree.root_index());
        }
        newick.push(';');
        newick
    }

    /// Writes given trees to a file in Newick format, one tree per line.
    ///
    /// # Errors
    /// Returns an I/O error if creating or writing the file fails.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, trees: &[Tree]) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        let Some(first) = trees.first() else {
            return writer.flush();
        };

        let estimated_capacity = estimate_newick_len(first);
        for tree in trees {
            let newick = self.write_with_capacity(tree, estimated_capacity);
            writer.write_all(newick.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()
    }

    // Recursive helper for building the Newick string
    fn build_newick(&self, tree: &Tree, newick: &mut String, index: TreeIndex) {
        let vertex = &tree[index];

        if let Some(children) = vertex.children() {
            newick.push('(');
            for (i, &child) in children.iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                self.build_newick(tree, newick, child);
            }
            newick.push(')');
        } else if let Some(label) = vertex.label() {
            newick.push_str(&sanitize_label(label));
        }

        self.push_branch_length(newick, vertex.branch_length());
    }

    fn push_branch_length(&self, newick: &mut String, branch_length: Option<BranchLength>) {
        if let Some(branch_length) = branch_length {
            newick.push(':');
            newick.push_str(&format_length(*branch_length, self.precision));
        }
    }
}

/// Formats a branch length with at most `precision` decimals, trailing zeros trimmed.
///
/// # Examples
/// ```
/// use phylodist::newick::format_length;
///
/// assert_eq!(format_length(8.5, 3), "8.5");
/// assert_eq!(format_length(11.0, 3), "11");
/// assert_eq!(format_length(0.33333, 3), "0.333");
/// assert_eq!(format_length(-0.0001, 3), "0");
/// assert_eq!(format_length(-1.25, 3), "-1.25");
/// ```
pub fn format_length(value: f64, precision: usize) -> String {
    let mut formatted = format!("{value:.precision$}");
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.').len();
        formatted.truncate(trimmed);
    }
    if formatted == "-0" {
        formatted = "0".to_string();
    }
    formatted
}

/// Estimates the length of the Newick string of `tree`.
fn estimate_newick_len(tree: &Tree) -> usize {
    // Each fork: "(" + ")" plus a "," per extra child
    const FORK_CHARS: usize = 3;
    // Branch lengths: ":" plus about 6 characters, e.g. ":12.345"
    const BRANCH_LENGTH_CHARS: usize = 7;

    let label_chars: usize = tree.vertices().iter().filter_map(|v| v.label()).map(str::len).sum();
    let structure_chars = tree.num_forks() * FORK_CHARS;
    let branch_chars = tree.num_vertices().saturating_sub(1) * BRANCH_LENGTH_CHARS;

    label_chars + structure_chars + branch_chars + BUFFER_CHARS
}
