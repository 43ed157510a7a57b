//! Validated square distance matrices over labelled taxa.
//!
//! A [DistanceMatrix] can be built from labels and rows with [DistanceMatrix::new],
//! or loaded from a labelled CSV table with [DistanceMatrix::from_csv_str] /
//! [DistanceMatrix::from_csv_path]. Either way, construction only succeeds if the
//! matrix is square, finite, non-negative, zero on the diagonal and symmetric.

mod csv;
mod validation_error;

pub use validation_error::ValidationError;

use std::collections::HashSet;

/// Default absolute tolerance for the diagonal and symmetry checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

// =#========================================================================#=
// DISTANCE MATRIX
// =#========================================================================#=
/// Square, symmetric matrix of non-negative pairwise distances between named taxa.
///
/// # Invariants
/// - `labels` are non-empty and pairwise distinct
/// - `values` holds `n * n` finite, non-negative entries in row-major order
/// - Diagonal entries are zero and `d(i, j) == d(j, i)`, both within `tolerance`
///
/// # Example
/// ```
/// use phylodist::DistanceMatrix;
///
/// let matrix = DistanceMatrix::new(
///     vec!["A", "B", "C"],
///     vec![vec![0.0, 4.0, 6.0], vec![4.0, 0.0, 6.0], vec![6.0, 6.0, 0.0]],
/// ).unwrap();
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix.get(0, 2), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    values: Vec<f64>,
    tolerance: f64,
}

impl DistanceMatrix {
    /// Creates a validated matrix using [DEFAULT_TOLERANCE].
    ///
    /// # Arguments
    /// * `labels` - Taxon labels, one per row and column
    /// * `rows` - Distance rows, in the same order as `labels`
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking shape, then labels,
    /// then finiteness, negativity, the diagonal and finally symmetry.
    pub fn new<S: Into<String>>(labels: Vec<S>, rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        Self::with_tolerance(labels, rows, DEFAULT_TOLERANCE)
    }

    /// Creates a validated matrix with a custom tolerance for the diagonal and symmetry checks.
    pub fn with_tolerance<S: Into<String>>(
        labels: Vec<S>,
        rows: Vec<Vec<f64>>,
        tolerance: f64,
    ) -> Result<Self, ValidationError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();

        // Shape
        if rows.is_empty() {
            return Err(ValidationError::NoDataRows);
        }
        if n != rows.len() {
            return Err(ValidationError::NotSquare {
                labels: n,
                rows: rows.len(),
            });
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, cells)| cells.len() != n) {
            return Err(ValidationError::RowWidth {
                row: row + 1,
                found: cells.len(),
                expected: n,
            });
        }

        validate_labels(&labels)?;

        let values: Vec<f64> = rows.into_iter().flatten().collect();
        let matrix = DistanceMatrix {
            labels,
            values,
            tolerance,
        };
        matrix.validate_values()?;

        Ok(matrix)
    }

    /// Returns the number of taxa.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the matrix holds no taxa (never the case for a validated matrix).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the taxon labels in row order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the label of taxon `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn label(&self, i: usize) -> &str {
        &self.labels[i]
    }

    /// Returns the distance between taxa `i` and `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    /// Returns row `i` of the matrix.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Returns an iterator over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.len().max(1))
    }

    /// Returns the tolerance used for the diagonal and symmetry checks.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns all unordered pairs `(i, j)` with `i < j` together with their distance.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j, self.get(i, j))))
    }

    /// Checks every cell; order of checks decides which error is reported first.
    fn validate_values(&self) -> Result<(), ValidationError> {
        let n = self.len();

        for i in 0..n {
            for j in 0..n {
                let value = self.get(i, j);
                if !value.is_finite() {
                    return Err(ValidationError::NonFinite {
                        row_label: self.labels[i].clone(),
                        column_label: self.labels[j].clone(),
                        value,
                    });
                }
            }
        }

        for i in 0..n {
            for j in 0..n {
                let value = self.get(i, j);
                if value < 0.0 {
                    return Err(ValidationError::NegativeValue {
                        row_label: self.labels[i].clone(),
                        column_label: self.labels[j].clone(),
                        value,
                    });
                }
            }
        }

        for i in 0..n {
            let value = self.get(i, i);
            if value.abs() > self.tolerance {
                return Err(ValidationError::NonZeroDiagonal {
                    label: self.labels[i].clone(),
                    value,
                });
            }
        }

        for (i, j, forward) in self.pairs() {
            let backward = self.get(j, i);
            if (forward - backward).abs() > self.tolerance {
                return Err(ValidationError::Asymmetric {
                    a: self.labels[i].clone(),
                    b: self.labels[j].clone(),
                    forward,
                    backward,
                });
            }
        }

        Ok(())
    }
}

/// Labels must be non-empty (after trimming) and unique.
fn validate_labels(labels: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for (index, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(ValidationError::EmptyLabel { index: index + 1 });
        }
        if !seen.insert(label.as_str()) {
            return Err(ValidationError::DuplicateLabel { label: label.clone() });
        }
    }
    Ok(())
}
