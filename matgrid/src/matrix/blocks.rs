//! Quadrant partitioning of square matrices.
//!
//! A matrix of even size n splits into four (n/2)×(n/2) blocks at the
//! quadrant positions. [`split_quadrants`] and [`join_quadrants`] are
//! exact inverses for any even-sized matrix.

use super::{Matrix, MatrixError};

/// One of the four quadrant positions of a square matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in split/join order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Row and column offset of this quadrant in a matrix with the
    /// given half size.
    fn offsets(self, half: usize) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, half),
            Quadrant::BottomLeft => (half, 0),
            Quadrant::BottomRight => (half, half),
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quadrant::TopLeft => write!(f, "top-left"),
            Quadrant::TopRight => write!(f, "top-right"),
            Quadrant::BottomLeft => write!(f, "bottom-left"),
            Quadrant::BottomRight => write!(f, "bottom-right"),
        }
    }
}

/// Splits a matrix into its four quadrant blocks, in
/// `[top-left, top-right, bottom-left, bottom-right]` order.
///
/// Blocks are true-size copies; no padding is carried along.
pub fn split_quadrants(matrix: &Matrix) -> Result<[Matrix; 4], MatrixError> {
    let dim = matrix.dim();
    if dim < 2 || dim % 2 != 0 {
        return Err(MatrixError::NotSplittable { dim });
    }
    let half = dim / 2;

    let extract = |quadrant: Quadrant| {
        let (row_off, col_off) = quadrant.offsets(half);
        let mut block = Matrix::zeroed(half);
        for row in 0..half {
            for col in 0..half {
                block.set(row, col, matrix.get(row_off + row, col_off + col));
            }
        }
        block
    };

    Ok([
        extract(Quadrant::TopLeft),
        extract(Quadrant::TopRight),
        extract(Quadrant::BottomLeft),
        extract(Quadrant::BottomRight),
    ])
}

/// Joins four equally sized blocks back into one matrix.
pub fn join_quadrants(
    tl: &Matrix,
    tr: &Matrix,
    bl: &Matrix,
    br: &Matrix,
) -> Result<Matrix, MatrixError> {
    let half = tl.dim();
    for block in [tr, bl, br] {
        if block.dim() != half {
            return Err(MatrixError::DimensionMismatch {
                left: half,
                right: block.dim(),
            });
        }
    }

    let mut joined = Matrix::zeroed(half * 2);
    for (quadrant, block) in Quadrant::ALL.iter().zip([tl, tr, bl, br]) {
        let (row_off, col_off) = quadrant.offsets(half);
        for row in 0..half {
            for col in 0..half {
                joined.set(row_off + row, col_off + col, block.get(row, col));
            }
        }
    }
    Ok(joined)
}
