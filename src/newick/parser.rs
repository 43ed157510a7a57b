//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse a single tree or all trees of an input.

use crate::model::{BranchLength, Tree, TreeIndex};
use crate::newick::byte_parser::ByteParser;
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::newick::labels::unescape_unquoted;
use crate::newick::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick trees with arbitrary fork degrees.
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with number of leaves in trees to parse,
///       otherwise it is inferred from the first parsed tree and then stored.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees eagerly
///
/// Internal vertex labels are not supported; a root branch length is read but dropped.
///
/// # Example
/// ```
/// use phylodist::newick::{ByteParser, NewickParser};
///
/// let input = "((A_meleagrides:1.0,A_vulturinum:1.0):0.5,N_meleagris:1.5,G_plumifera:1.5);";
/// let mut byte_parser = ByteParser::for_str(input);
/// let mut newick_parser = NewickParser::new();
///
/// let tree = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.root_degree(), 3);
/// assert_eq!(tree.leaf_labels()[0], "A meleagrides");
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in each parsed tree.
    ///
    /// This allows pre-allocation of the tree arena.
    /// If not set, it is taken from the first parsed tree.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses all Newick trees until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser over input containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<Tree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&mut self, mut byte_parser: ByteParser<'_>) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_str(&mut self, parser: &mut ByteParser<'_>) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new(self.num_leaves);
        self.parse_root(&mut tree, parser)?;

        if !self.know_num_leaves {
            self.num_leaves = tree.num_leaves();
            self.know_num_leaves = true;
        }

        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree and adds it to tree:
    /// - `(child,child,...)[:branch_length];`
    /// - The root branch length, if any, is dropped
    fn parse_root(&self, tree: &mut Tree, parser: &mut ByteParser<'_>) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let children = self.parse_children(tree, parser)?;
        let _ = self.parse_branch_length(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        tree.add_root(children);
        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index.
    fn parse_vertex(&self, tree: &mut Tree, parser: &mut ByteParser<'_>) -> Result<TreeIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            let children = self.parse_children(tree, parser)?;
            let branch_length = self.parse_branch_length(parser)?;
            Ok(tree.add_internal_vertex(children, branch_length))
        } else {
            self.parse_leaf(tree, parser)
        }
    }

    /// Parses children `(vertex,vertex,...)` and returns their indices:
    /// - Expects parser at opening `(`
    /// - Requires at least two children
    fn parse_children(&self, tree: &mut Tree, parser: &mut ByteParser<'_>) -> Result<Vec<TreeIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            }
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", next_char),
            ));
        }

        let mut children = vec![self.parse_vertex(tree, parser)?];
        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => children.push(self.parse_vertex(tree, parser)?),
                Some(b')') => break,
                Some(b) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!("Expected ',' or ')' between children but found {:?}", char::from(b)),
                    ));
                }
                None => return Err(ParsingError::unexpected_eof(parser)),
            }
        }

        if children.len() < 2 {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Fork with a single child".to_string(),
            ));
        }

        Ok(children)
    }

    /// Parses leaf vertex `label[:branch_length]` and adds it to tree.
    fn parse_leaf(&self, tree: &mut Tree, parser: &mut ByteParser<'_>) -> Result<TreeIndex, ParsingError> {
        let (label, quoted) = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() && !quoted {
            if parser.is_eof() {
                return Err(ParsingError::unexpected_eof(parser));
            }
            return Err(ParsingError::invalid_newick_string(parser, "Missing leaf label".to_string()));
        }
        let label = if quoted { label } else { unescape_unquoted(&label) };

        let branch_length = self.parse_branch_length(parser)?;
        Ok(tree.add_leaf(label, branch_length))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a branch length and was able to parse it
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if it couldn't parse branch length value or it is not finite
    fn parse_branch_length(&self, parser: &mut ByteParser<'_>) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let text = parser.take_while(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(BranchLength::new(value))),
            _ => Err(ParsingError::invalid_branch_length(parser, format!("'{}'", text))),
        }
    }
}
