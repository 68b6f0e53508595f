//! Upload-text matrix decoding and validation.
//!
//! The gateway accepts matrix files with one row per line and cells
//! separated by whitespace:
//!
//! ```text
//! 1 2
//! 3 4
//! ```
//!
//! Validation happens here, before the dispatch engine is ever invoked:
//! the grid must be square and its size a power of two.

use super::{Matrix, MatrixError};

/// Decodes and validates an uploaded matrix file.
///
/// Checks, in order: non-empty input, row count equals the first row's
/// column count, size is a power of two, every row has the same length,
/// every cell parses as an integer.
pub fn parse_matrix_file(text: &str) -> Result<Matrix, MatrixError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MatrixError::Empty);
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    let cols = lines[0].split_whitespace().count();
    if cols == 0 {
        return Err(MatrixError::Empty);
    }
    if lines.len() != cols {
        return Err(MatrixError::NotSquare {
            rows: lines.len(),
            cols,
        });
    }
    if !cols.is_power_of_two() {
        return Err(MatrixError::NotPowerOfTwo { dim: cols });
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != cols {
            return Err(MatrixError::RaggedRow {
                row: index,
                expected: cols,
                found: values.len(),
            });
        }
        let mut row = Vec::with_capacity(cols);
        for value in values {
            let cell = value.parse::<i64>().map_err(|_| MatrixError::InvalidValue {
                value: value.to_string(),
            })?;
            row.push(cell);
        }
        rows.push(row);
    }

    Matrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_two_by_two() {
        let m = parse_matrix_file("1 2\n3 4").unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(1, 0), 3);
    }

    #[test]
    fn test_parses_with_surrounding_whitespace() {
        let m = parse_matrix_file("  1 2\n3 4\n\n").unwrap();
        assert_eq!(m.dim(), 2);
    }

    #[test]
    fn test_parses_negative_values() {
        let m = parse_matrix_file("-1 2\n3 -4").unwrap();
        assert_eq!(m.get(0, 0), -1);
        assert_eq!(m.get(1, 1), -4);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(parse_matrix_file(""), Err(MatrixError::Empty));
        assert_eq!(parse_matrix_file("   \n  "), Err(MatrixError::Empty));
    }

    #[test]
    fn test_rejects_rectangular_matrix() {
        // 3 rows of 4 columns
        let text = "1 2 3 4\n5 6 7 8\n9 10 11 12";
        assert_eq!(
            parse_matrix_file(text),
            Err(MatrixError::NotSquare { rows: 3, cols: 4 })
        );
    }

    #[test]
    fn test_rejects_size_three() {
        // Square but not a power of two
        let text = "1 2 3\n4 5 6\n7 8 9";
        assert_eq!(
            parse_matrix_file(text),
            Err(MatrixError::NotPowerOfTwo { dim: 3 })
        );
    }

    #[test]
    fn test_accepts_size_one() {
        let m = parse_matrix_file("7").unwrap();
        assert_eq!(m.dim(), 1);
        assert_eq!(m.get(0, 0), 7);
    }

    #[test]
    fn test_rejects_ragged_row() {
        let text = "1 2\n3";
        assert_eq!(
            parse_matrix_file(text),
            Err(MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_rejects_non_numeric_cell() {
        let text = "1 x\n3 4";
        assert_eq!(
            parse_matrix_file(text),
            Err(MatrixError::InvalidValue {
                value: "x".to_string(),
            })
        );
    }

    #[test]
    fn test_parses_four_by_four() {
        let text = "1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1";
        let m = parse_matrix_file(text).unwrap();
        assert_eq!(m, Matrix::identity(4));
    }
}
