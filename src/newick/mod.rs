//! Newick format parser and writer for phylogenetic trees.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`to_newick`] - serializes a [Tree] with three decimal places
//! * [`write_newick_file`] - writes trees to a file, one per line
//! * [`parse_str`] - parses a single Newick string
//! * [`parse_file`] - parses all trees of a file
//!
//! # Full API
//! * [`NewickWriter`] - configurable precision
//! * [`NewickParser`] together with a [`ByteParser`]
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)+ ')' [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere where whitespace is allowed
//! * Labels containing reserved characters or `_` are single-quoted, with `''` for a quote;
//!   underscores in unquoted labels stand for spaces

mod byte_parser;
mod defs;
mod labels;
mod parser;
mod parsing_error;
mod writer;

pub use byte_parser::ByteParser;
pub use defs::DEFAULT_PRECISION;
pub use labels::sanitize_label;
pub use parser::NewickParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
pub use writer::{NewickWriter, format_length};

use crate::model::Tree;
use std::fs;
use std::io;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string.
///
/// # Example
/// ```
/// use phylodist::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}

/// Parses a file containing a list of Newick strings, each terminated by `;`.
///
/// # Errors
/// Returns a [ParsingError] if reading the file fails or any tree is invalid.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Tree>, ParsingError> {
    let contents = fs::read(path)?;
    NewickParser::new().parse_all(ByteParser::for_bytes(&contents))
}

// ============================================================================
// QUICK WRITING API (pub)
// ============================================================================
/// Returns the Newick representation of `tree` using [DEFAULT_PRECISION].
pub fn to_newick(tree: &Tree) -> String {
    NewickWriter::default().write(tree)
}

/// Writes given trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[Tree]) -> io::Result<()> {
    NewickWriter::default().write_file(path, trees)
}
