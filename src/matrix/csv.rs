//! Loading a [DistanceMatrix] from a labelled CSV table.
//!
//! Expected layout, with an arbitrary (usually empty) corner cell:
//! ```text
//! ,A,B,C
//! A,0,4,6
//! B,4,0,6
//! C,6,6,0
//! ```
//! Cells are trimmed; blank lines are skipped. Row labels must repeat the header labels
//! in the same order.

use super::{DEFAULT_TOLERANCE, DistanceMatrix, ValidationError};
use std::fs;
use std::path::Path;

const SEPARATOR: char = ',';

impl DistanceMatrix {
    /// Parses a labelled CSV distance table.
    ///
    /// # Errors
    /// Returns a [ValidationError] naming the offending row/column for malformed tables,
    /// or the first violated matrix invariant (see [DistanceMatrix::new]).
    ///
    /// # Example
    /// ```
    /// use phylodist::DistanceMatrix;
    ///
    /// let matrix = DistanceMatrix::from_csv_str(",A,B\nA,0,3\nB,3,0\n").unwrap();
    /// assert_eq!(matrix.labels(), &["A", "B"]);
    /// assert_eq!(matrix.get(1, 0), 3.0);
    /// ```
    pub fn from_csv_str(content: &str) -> Result<Self, ValidationError> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let header: Vec<&str> = match lines.next() {
            Some(line) => split_cells(line),
            None => return Err(ValidationError::NoDataRows),
        };
        if header.len() < 2 {
            return Err(ValidationError::HeaderTooShort);
        }

        let data: Vec<Vec<&str>> = lines.map(split_cells).collect();
        if data.is_empty() {
            return Err(ValidationError::NoDataRows);
        }

        let labels: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();
        super::validate_labels(&labels)?;

        let n = labels.len();
        if data.len() != n {
            return Err(ValidationError::NotSquare {
                labels: n,
                rows: data.len(),
            });
        }

        let mut rows = Vec::with_capacity(n);
        for (i, cells) in data.iter().enumerate() {
            let row = i + 1;
            let found = cells.len() - 1;
            if found != n {
                return Err(ValidationError::RowWidth { row, found, expected: n });
            }
            if cells[0] != labels[i] {
                return Err(ValidationError::LabelMismatch {
                    row,
                    expected: labels[i].clone(),
                    found: cells[0].to_string(),
                });
            }

            let values = cells[1..]
                .iter()
                .enumerate()
                .map(|(j, text)| {
                    text.parse::<f64>().map_err(|_| ValidationError::NonNumericCell {
                        row,
                        column: j + 1,
                        label: labels[j].clone(),
                        text: text.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            rows.push(values);
        }

        DistanceMatrix::with_tolerance(labels, rows, DEFAULT_TOLERANCE)
    }

    /// Reads and parses a labelled CSV distance table from `path`.
    ///
    /// # Errors
    /// Returns [ValidationError::Io] if the file can't be read, otherwise as [DistanceMatrix::from_csv_str].
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, ValidationError> {
        let content = fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }
}

fn split_cells(line: &str) -> Vec<&str> {
    line.split(SEPARATOR).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_whitespace_and_blank_lines() {
        let csv = "\n , A , B \n A , 0 , 2.5 \n\n B , 2.5 , 0 \n\n";
        let matrix = DistanceMatrix::from_csv_str(csv).unwrap();
        assert_eq!(matrix.labels(), &["A", "B"]);
        assert_eq!(matrix.get(0, 1), 2.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            DistanceMatrix::from_csv_str("   \n"),
            Err(ValidationError::NoDataRows)
        ));
    }

    #[test]
    fn test_non_numeric_cell_reports_position() {
        let err = DistanceMatrix::from_csv_str(",A,B\nA,0,abc\nB,1,0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid number at row 1, column 2 (label 'B'): 'abc'"
        );
    }
}
