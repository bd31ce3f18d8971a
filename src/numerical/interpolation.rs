use crate::somelinalg::linear_solver::{LinearSolveError, solve_linear_system};
use itertools::izip;
use nalgebra::{DMatrix, DVector};
use std::error::Error;
use std::fmt;

/// Lagrange interpolation polynomial through the given support points,
/// evaluated at t.
pub fn lagrange_interpolation(t_points: &[f64], y_points: &[f64], t: f64) -> f64 {
    assert_eq!(
        t_points.len(),
        y_points.len(),
        "support points must come in pairs"
    );
    assert!(!t_points.is_empty(), "no support points given");
    let n = t_points.len();
    let mut result = 0.0;
    for i in 0..n {
        let mut term = y_points[i];
        for j in 0..n {
            if i != j {
                term *= (t - t_points[j]) / (t_points[i] - t_points[j]);
            }
        }
        result += term;
    }
    result
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// evaluation point lies outside the interpolation range
    OutOfRange { x: f64 },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::OutOfRange { x } => {
                write!(f, "x = {} is out of the interpolation range", x)
            }
        }
    }
}

impl Error for InterpolationError {}

/// Natural cubic spline through sorted support points.
///
/// The second-derivative unknowns of the interior knots come from a
/// tridiagonal system; the natural boundary rows pin the end second
/// derivatives to zero. Each interval stores the polynomial
/// `a + b dx + c dx^2 + d dx^3` around its left knot.
pub struct CubicSpline {
    pub knots: Vec<f64>,
    pub coefficients: Vec<(f64, f64, f64, f64)>,
}

impl CubicSpline {
    pub fn construct(x: &[f64], y: &[f64]) -> Result<Self, LinearSolveError> {
        assert_eq!(x.len(), y.len(), "support points must come in pairs");
        assert!(x.len() >= 2, "a spline needs at least two support points");
        assert!(
            x.windows(2).all(|w| w[0] < w[1]),
            "x values must be strictly increasing"
        );
        let n = x.len() - 1;
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let mut matrix = DMatrix::zeros(n + 1, n + 1);
        let mut rhs = DVector::zeros(n + 1);
        // natural boundary: zero second derivative at both ends
        matrix[(0, 0)] = 1.0;
        matrix[(n, n)] = 1.0;
        for i in 1..n {
            matrix[(i, i - 1)] = h[i - 1];
            matrix[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            matrix[(i, i + 1)] = h[i];
            rhs[i] = 3.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }
        let m = solve_linear_system(&matrix, &rhs)?;

        let mut coefficients = Vec::with_capacity(n);
        for (i, (&hi, window)) in izip!(&h, y.windows(2)).enumerate() {
            let (y_left, y_right) = (window[0], window[1]);
            let a = y_left;
            let b = (y_right - y_left) / hi - hi * (2.0 * m[i] + m[i + 1]) / 3.0;
            let c = m[i];
            let d = (m[i + 1] - m[i]) / (3.0 * hi);
            coefficients.push((a, b, c, d));
        }
        Ok(CubicSpline {
            knots: x.to_vec(),
            coefficients,
        })
    }

    fn interval_of(&self, x: f64) -> Result<usize, InterpolationError> {
        for i in 0..self.knots.len() - 1 {
            if self.knots[i] <= x && x <= self.knots[i + 1] {
                return Ok(i);
            }
        }
        Err(InterpolationError::OutOfRange { x })
    }

    pub fn evaluate(&self, x: f64) -> Result<f64, InterpolationError> {
        let i = self.interval_of(x)?;
        let (a, b, c, d) = self.coefficients[i];
        let dx = x - self.knots[i];
        Ok(a + b * dx + c * dx * dx + d * dx * dx * dx)
    }

    /// Second derivative of the spline, handy for checking the natural
    /// boundary conditions.
    pub fn second_derivative(&self, x: f64) -> Result<f64, InterpolationError> {
        let i = self.interval_of(x)?;
        let (_, _, c, d) = self.coefficients[i];
        let dx = x - self.knots[i];
        Ok(2.0 * c + 6.0 * d * dx)
    }
}
