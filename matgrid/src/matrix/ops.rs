//! Block kernels executed by compute workers.
//!
//! Both kernels operate over the block's full dimension; blocks arrive
//! as true-size copies, never padded.

use super::{Matrix, MatrixError};

/// Element-wise sum of two equally sized blocks.
pub fn block_add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    let dim = a.dim();
    if b.dim() != dim {
        return Err(MatrixError::DimensionMismatch {
            left: dim,
            right: b.dim(),
        });
    }

    let mut sum = Matrix::zeroed(dim);
    for row in 0..dim {
        for col in 0..dim {
            sum.set(row, col, a.get(row, col) + b.get(row, col));
        }
    }
    Ok(sum)
}

/// Standard triple-loop product of two equally sized square blocks.
pub fn block_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
    let dim = a.dim();
    if b.dim() != dim {
        return Err(MatrixError::DimensionMismatch {
            left: dim,
            right: b.dim(),
        });
    }

    let mut product = Matrix::zeroed(dim);
    for row in 0..dim {
        for col in 0..dim {
            let mut acc = 0;
            for k in 0..dim {
                acc += a.get(row, k) * b.get(k, col);
            }
            product.set(row, col, acc);
        }
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sums_element_wise() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![10, 20], vec![30, 40]]).unwrap();
        let sum = block_add(&a, &b).unwrap();
        assert_eq!(
            sum,
            Matrix::from_rows(vec![vec![11, 22], vec![33, 44]]).unwrap()
        );
    }

    #[test]
    fn test_add_rejects_mismatched_dimensions() {
        let a = Matrix::identity(2);
        let b = Matrix::identity(4);
        assert_eq!(
            block_add(&a, &b),
            Err(MatrixError::DimensionMismatch { left: 2, right: 4 })
        );
    }

    #[test]
    fn test_multiply_two_by_two() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
        let product = block_multiply(&a, &b).unwrap();
        assert_eq!(
            product,
            Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap()
        );
    }

    #[test]
    fn test_multiply_by_identity_is_identity_transform() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let product = block_multiply(&a, &Matrix::identity(2)).unwrap();
        assert_eq!(product, a);
    }

    #[test]
    fn test_multiply_one_by_one_is_scalar_product() {
        let a = Matrix::from_rows(vec![vec![6]]).unwrap();
        let b = Matrix::from_rows(vec![vec![7]]).unwrap();
        let product = block_multiply(&a, &b).unwrap();
        assert_eq!(product.get(0, 0), 42);
    }

    #[test]
    fn test_multiply_handles_negative_values() {
        let a = Matrix::from_rows(vec![vec![-1, 2], vec![3, -4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, -6], vec![-7, 8]]).unwrap();
        let product = block_multiply(&a, &b).unwrap();
        assert_eq!(
            product,
            Matrix::from_rows(vec![vec![-19, 22], vec![43, -50]]).unwrap()
        );
    }

    #[test]
    fn test_multiply_rejects_mismatched_dimensions() {
        let a = Matrix::identity(4);
        let b = Matrix::identity(2);
        assert_eq!(
            block_multiply(&a, &b),
            Err(MatrixError::DimensionMismatch { left: 4, right: 2 })
        );
    }
}
