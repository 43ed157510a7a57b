//! Errors raised while loading or validating a distance matrix.

use thiserror::Error;

/// Reason a distance matrix was rejected.
///
/// Row and column positions are 1-based, counting data rows and data columns
/// (the header row and the label column are not counted).
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("CSV must contain a header and at least one data row")]
    NoDataRows,

    #[error("Header must contain a corner cell followed by at least one column label")]
    HeaderTooShort,

    #[error("Header has {labels} labels but there are {rows} rows; matrix must be square")]
    NotSquare { labels: usize, rows: usize },

    #[error("Empty column label at position {index} in header")]
    EmptyLabel { index: usize },

    #[error("Duplicate label '{label}' in header")]
    DuplicateLabel { label: String },

    #[error("Row {row} has {found} numeric cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Row label mismatch at row {row}: expected '{expected}', found '{found}'")]
    LabelMismatch {
        row: usize,
        expected: String,
        found: String,
    },

    #[error("Invalid number at row {row}, column {column} (label '{label}'): '{text}'")]
    NonNumericCell {
        row: usize,
        column: usize,
        label: String,
        text: String,
    },

    #[error("Non-finite distance ({row_label},{column_label}) = {value}")]
    NonFinite {
        row_label: String,
        column_label: String,
        value: f64,
    },

    #[error("Negative distance ({row_label},{column_label}) = {value}")]
    NegativeValue {
        row_label: String,
        column_label: String,
        value: f64,
    },

    #[error("Diagonal entry must be zero: ({label},{label}) = {value}")]
    NonZeroDiagonal { label: String, value: f64 },

    #[error("Distance matrix is not symmetric between {a} and {b} ({forward} vs {backward})")]
    Asymmetric {
        a: String,
        b: String,
        forward: f64,
        backward: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
