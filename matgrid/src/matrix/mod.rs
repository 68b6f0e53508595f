//! Square integer matrices and the block operations performed on them.
//!
//! The [`Matrix`] type is immutable after construction and enforces
//! squareness by construction: every decode path funnels through
//! [`Matrix::from_rows`], so downstream code never sees a ragged or
//! rectangular grid.
//!
//! # Submodules
//!
//! - [`parse`] - upload-text decoding with square/power-of-two validation
//! - [`wire`] - bracket-notation text codec used on the worker protocol
//! - [`blocks`] - quadrant split and join
//! - [`ops`] - element-wise add and triple-loop multiply kernels

mod blocks;
mod ops;
mod parse;
mod wire;

pub use blocks::{join_quadrants, split_quadrants, Quadrant};
pub use ops::{block_add, block_multiply};
pub use parse::parse_matrix_file;
pub use wire::{from_wire, to_wire};

use std::fmt;
use thiserror::Error;

/// Errors raised while decoding, validating, or combining matrices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Input contained no rows or no columns.
    #[error("matrix must have rows and columns")]
    Empty,

    /// Row count and column count differ.
    #[error("matrix must have the same number of rows and columns ({rows} rows, {cols} columns)")]
    NotSquare { rows: usize, cols: usize },

    /// Size is square but not a power of two.
    #[error("matrix size must be a power of two (got {dim})")]
    NotPowerOfTwo { dim: usize },

    /// A row's length disagrees with the first row's.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell could not be parsed as an integer.
    #[error("invalid matrix value {value:?}")]
    InvalidValue { value: String },

    /// Wire text did not follow the bracket notation.
    #[error("malformed matrix text: {reason}")]
    MalformedWire { reason: String },

    /// Two operands of a block operation have different sizes.
    #[error("operand sizes differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    /// Matrix is too small to partition into quadrants.
    #[error("matrix of size {dim} cannot be split into quadrants")]
    NotSplittable { dim: usize },
}

/// An immutable n×n grid of integers, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    dim: usize,
    cells: Vec<i64>,
}

impl Matrix {
    /// Builds a matrix from rows, enforcing equal row lengths and squareness.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, MatrixError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(MatrixError::Empty);
        }

        let dim = rows[0].len();
        if rows.len() != dim {
            return Err(MatrixError::NotSquare {
                rows: rows.len(),
                cols: dim,
            });
        }

        let mut cells = Vec::with_capacity(dim * dim);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(MatrixError::RaggedRow {
                    row: index,
                    expected: dim,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self { dim, cells })
    }

    /// An n×n matrix of zeros.
    pub fn zeroed(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![0; dim * dim],
        }
    }

    /// The n×n identity matrix.
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeroed(dim);
        for i in 0..dim {
            m.set(i, i, 1);
        }
        m
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Value at `(row, col)`. Panics if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.dim + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: i64) {
        self.cells[row * self.dim + col] = value;
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.cells.chunks(self.dim.max(1))
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matrix({}x{}) {}", self.dim, self.dim, wire::to_wire(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_builds_square_matrix() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(m.dim(), 2);
        assert_eq!(m.get(0, 0), 1);
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(1, 0), 3);
        assert_eq!(m.get(1, 1), 4);
    }

    #[test]
    fn test_from_rows_rejects_empty_input() {
        assert_eq!(Matrix::from_rows(vec![]), Err(MatrixError::Empty));
        assert_eq!(Matrix::from_rows(vec![vec![]]), Err(MatrixError::Empty));
    }

    #[test]
    fn test_from_rows_rejects_rectangular_shape() {
        let result = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(result, Err(MatrixError::NotSquare { rows: 2, cols: 3 }));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Matrix::from_rows(vec![vec![1, 2], vec![3]]);
        assert_eq!(
            result,
            Err(MatrixError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_identity_has_ones_on_diagonal() {
        let m = Matrix::identity(4);
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1 } else { 0 };
                assert_eq!(m.get(row, col), expected);
            }
        }
    }

    #[test]
    fn test_rows_iterates_in_order() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let rows: Vec<&[i64]> = m.rows().collect();
        assert_eq!(rows, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_debug_includes_dimensions() {
        let m = Matrix::identity(2);
        let debug = format!("{:?}", m);
        assert!(debug.contains("2x2"));
    }
}
