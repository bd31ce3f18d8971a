use nalgebra::{DMatrix, DVector, Dim, RealField, U1, Vector, convert, storage::Storage};
use num_traits::Float;
use std::error::Error;
use std::fmt;

/// determinant magnitude below which a 2x2 system is rejected as singular
pub const SINGULARITY_THRESHOLD: f64 = 1e-14;

#[derive(Debug, Clone, PartialEq)]
pub enum LinearSolveError {
    /// the coefficient matrix has no unique solution
    SingularMatrix { determinant: f64 },
    /// shapes of the matrix and the right hand side do not agree
    WrongDimensions(&'static str),
}

impl fmt::Display for LinearSolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinearSolveError::SingularMatrix { determinant } => write!(
                f,
                "matrix is singular or nearly singular (det = {})",
                determinant
            ),
            LinearSolveError::WrongDimensions(what) => write!(f, "wrong dimensions: {}", what),
        }
    }
}

impl Error for LinearSolveError {}

/// Solves a 2x2 system exactly with the determinant formula.
pub fn solve_2x2(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, LinearSolveError> {
    assert_eq!(A.shape(), (2, 2), "solve_2x2 expects a 2x2 matrix");
    assert_eq!(b.len(), 2, "right hand side must have 2 components");
    let determinant = A[(0, 0)] * A[(1, 1)] - A[(0, 1)] * A[(1, 0)];
    if determinant.abs() < SINGULARITY_THRESHOLD {
        return Err(LinearSolveError::SingularMatrix { determinant });
    }
    let x0 = (b[0] * A[(1, 1)] - b[1] * A[(0, 1)]) / determinant;
    let x1 = (A[(0, 0)] * b[1] - A[(1, 0)] * b[0]) / determinant;
    Ok(DVector::from_vec(vec![x0, x1]))
}

/// Solves a square dense system A x = b.
///
/// 2x2 systems go through the closed-form formula, everything else through
/// LU decomposition. A failed decomposition is reported as a singular matrix.
pub fn solve_linear_system(
    A: &DMatrix<f64>,
    b: &DVector<f64>,
) -> Result<DVector<f64>, LinearSolveError> {
    if !A.is_square() {
        return Err(LinearSolveError::WrongDimensions(
            "coefficient matrix must be square",
        ));
    }
    if A.nrows() != b.len() {
        return Err(LinearSolveError::WrongDimensions(
            "matrix and right hand side must have the same number of rows",
        ));
    }
    if A.shape() == (2, 2) {
        return solve_2x2(A, b);
    }
    let lu = A.clone().lu();
    match lu.solve(b) {
        Some(x) => Ok(x),
        None => Err(LinearSolveError::SingularMatrix {
            determinant: A.determinant(),
        }),
    }
}

/// Euclidean norm accumulated in three bins (small, intermediate, large
/// components) so that very large or very small entries neither overflow
/// nor underflow the sum of squares.
#[inline]
pub fn enorm<F, N, VS>(v: &Vector<F, N, VS>) -> F
where
    F: RealField + Float + Copy,
    N: Dim,
    VS: Storage<F, N, U1>,
{
    let mut s1 = F::zero();
    let mut s2 = F::zero();
    let mut s3 = F::zero();
    let mut x1max = F::zero();
    let mut x3max = F::zero();
    let agiant = Float::sqrt(<F as Float>::max_value()) / convert(v.nrows() as f64);
    let rdwarf = Float::sqrt(<F as Float>::min_positive_value());
    for xi in v.iter() {
        let xabs = Float::abs(*xi);
        if Float::is_nan(xabs) {
            return xabs;
        }
        if xabs >= agiant || xabs <= rdwarf {
            if xabs > rdwarf {
                // sum for large components
                if xabs > x1max {
                    s1 = F::one() + s1 * Float::powi(x1max / xabs, 2);
                    x1max = xabs;
                } else {
                    s1 = s1 + Float::powi(xabs / x1max, 2);
                }
            } else if xabs > x3max {
                // sum for small components
                s3 = F::one() + s3 * Float::powi(x3max / xabs, 2);
                x3max = xabs;
            } else if xabs != F::zero() {
                s3 = s3 + Float::powi(xabs / x3max, 2);
            }
        } else {
            s2 = s2 + xabs * xabs;
        }
    }

    if s1 != F::zero() {
        x1max * Float::sqrt(s1 + (s2 / x1max) / x1max)
    } else if s2 != F::zero() {
        Float::sqrt(if s2 >= x3max {
            s2 * (F::one() + (x3max / s2) * (x3max * s3))
        } else {
            x3max * ((s2 / x3max) + (x3max * s3))
        })
    } else {
        x3max * Float::sqrt(s3)
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     TESTS
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_2x2_known_solution() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
        let b = DVector::from_vec(vec![4.0, 9.0]);
        let x = solve_2x2(&A, &b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_2x2_singular() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        match solve_2x2(&A, &b) {
            Err(LinearSolveError::SingularMatrix { determinant }) => {
                assert!(determinant.abs() < SINGULARITY_THRESHOLD)
            }
            other => panic!("expected SingularMatrix, got {:?}", other),
        }
    }

    #[test]
    fn test_solve_2x2_nearly_singular() {
        // determinant of order 1e-16, below the stability threshold
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0 + 1e-16]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert!(matches!(
            solve_2x2(&A, &b),
            Err(LinearSolveError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_solve_linear_system_dispatches_to_2x2() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
        let b = DVector::from_vec(vec![4.0, 9.0]);
        let x = solve_linear_system(&A, &b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_linear_system_lu_3x3() {
        // x = [1, 2, 3]
        let A = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 4.0]);
        let x_expected = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = &A * &x_expected;
        let x = solve_linear_system(&A, &b).unwrap();
        for i in 0..3 {
            assert_relative_eq!(x[i], x_expected[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_solve_linear_system_lu_singular() {
        let A = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 1.0, 0.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            solve_linear_system(&A, &b),
            Err(LinearSolveError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_solve_linear_system_wrong_dimensions() {
        let A = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&A, &b),
            Err(LinearSolveError::WrongDimensions(_))
        ));
        let A = DMatrix::from_row_slice(3, 3, &[1.0; 9]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&A, &b),
            Err(LinearSolveError::WrongDimensions(_))
        ));
    }

    #[test]
    fn test_enorm_matches_naive_norm() {
        let v = DVector::from_vec(vec![3.0, 4.0]);
        assert_relative_eq!(enorm(&v), 5.0, epsilon = 1e-14);
        let w = DVector::from_vec(vec![1e-8, -2e-8, 2e-8]);
        assert_relative_eq!(enorm(&w), w.norm(), max_relative = 1e-12);
    }

    #[test]
    fn test_enorm_huge_components_do_not_overflow() {
        let v = DVector::from_vec(vec![1e300, 1e300]);
        let norm = enorm(&v);
        assert!(norm.is_finite());
        assert_relative_eq!(norm, 2.0f64.sqrt() * 1e300, max_relative = 1e-12);
    }
}
