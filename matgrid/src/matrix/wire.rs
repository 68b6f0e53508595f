//! Bracket-notation text codec for matrices in transit.
//!
//! Matrices cross the worker protocol and the HTTP response as nested
//! bracket text, rows comma-separated: `[[1, 2], [3, 4]]`. Decoding
//! tolerates exactly this separator convention (comma-space between
//! elements, no trailing separators).

use super::{Matrix, MatrixError};

/// Encodes a matrix as nested bracket text.
pub fn to_wire(matrix: &Matrix) -> String {
    let rows: Vec<String> = matrix
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", "))
}

/// Decodes bracket text back into a matrix.
///
/// The result is validated for squareness; rectangular or ragged wire
/// text is rejected.
pub fn from_wire(text: &str) -> Result<Matrix, MatrixError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| MatrixError::MalformedWire {
            reason: "missing outer brackets".to_string(),
        })?;

    if inner.trim().is_empty() {
        return Err(MatrixError::Empty);
    }

    let mut rows = Vec::new();
    for part in inner.split("], [") {
        let row_text = part.trim().trim_start_matches('[').trim_end_matches(']');
        if row_text.is_empty() {
            return Err(MatrixError::Empty);
        }
        let mut row = Vec::new();
        for value in row_text.split(", ") {
            let cell = value.parse::<i64>().map_err(|_| MatrixError::InvalidValue {
                value: value.to_string(),
            })?;
            row.push(cell);
        }
        rows.push(row);
    }

    Matrix::from_rows(rows)
}
