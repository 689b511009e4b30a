//! Shared small-matrix numerics: the weighted / regularized normal
//! equation solves every technique refines through, and a checked inverse.
use nalgebra::{DMatrix, DVector};

use crate::error::Error;

/// Solves the weighted, diagonally regularized normal equations
/// (AᵀWA + λI)x = AᵀWb, with W a diagonal weight matrix.
pub(crate) fn solve_weighted_regularized(
    a: &DMatrix<f64>,
    weights: &DVector<f64>,
    b: &DVector<f64>,
    lambda: f64,
) -> Result<DVector<f64>, Error> {
    let mut atwa = weighted_normal_matrix(a, weights);
    for i in 0..atwa.nrows() {
        atwa[(i, i)] += lambda;
    }

    let at = a.transpose();
    let w = DMatrix::from_diagonal(weights);
    let atwb = &at * w * b;

    atwa.lu().solve(&atwb).ok_or(Error::MatrixInversion)
}

/// AᵀWA, with W a diagonal weight matrix.
pub(crate) fn weighted_normal_matrix(a: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    let at = a.transpose();
    let w = DMatrix::from_diagonal(weights);
    &at * w * a
}

/// Checked matrix inverse.
pub(crate) fn try_inverse(m: DMatrix<f64>) -> Result<DMatrix<f64>, Error> {
    m.try_inverse().ok_or(Error::MatrixInversion)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn weighted_solve_recovers_exact_solution() {
        // overdetermined consistent system: y = 2x + 1 sampled 4 times
        let a = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0, 1.0]);
        let w = DVector::from_vec(vec![1.0, 2.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![3.0, 5.0, 7.0, 9.0]);
        let x = solve_weighted_regularized(&a, &w, &b, 0.0).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-9);
        assert!((x[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singular_system_rejected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let w = DVector::from_vec(vec![1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_weighted_regularized(&a, &w, &b, 0.0),
            Err(Error::MatrixInversion)
        ));
    }

    #[test]
    fn regularized_solve_handles_rank_deficiency() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let w = DVector::from_vec(vec![1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        // λ makes the system solvable again
        assert!(solve_weighted_regularized(&a, &w, &b, 1.0e-6).is_ok());
    }

    #[test]
    fn inverse_round_trip() {
        let m = DMatrix::from_row_slice(3, 3, &[4.0, 0.0, 0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1.0]);
        let inv = try_inverse(m.clone()).unwrap();
        let identity = m * inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((identity[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }
}
