//! Constants for Newick parsing and writing.

/// Newick label delimiters: parentheses, brackets, comma, colon, semicolon, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"()[],:; \n\t\r";

/// Characters that force a label to be single-quoted on output
pub(crate) const NEWICK_RESERVED_CHARS: &[char] = &['(', ')', ',', ':', ';', '[', ']', '\''];

/// Default number of decimal places for branch lengths
pub const DEFAULT_PRECISION: usize = 3;

/// Default guess for number of leaves, when unknown
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 10;
