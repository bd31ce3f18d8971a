use nalgebra::{DMatrix, DVector};

/// default perturbation for central differences
pub const DEFAULT_DELTA: f64 = 1e-5;

/// Central-difference approximation of the Jacobian of a vector-valued
/// function at `point`.
///
/// Column i holds `(f(x + δ e_i) - f(x - δ e_i)) / (2 δ)`, so the result has
/// one row per component of `func` and one column per variable.
pub fn central_difference_jacobian<F>(func: F, point: &DVector<f64>, delta: f64) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let num_vars = point.len();
    let mut columns: Vec<DVector<f64>> = Vec::with_capacity(num_vars);
    for i in 0..num_vars {
        let mut forward_point = point.clone();
        let mut backward_point = point.clone();
        forward_point[i] += delta;
        backward_point[i] -= delta;
        let column = (func(&forward_point) - func(&backward_point)) / (2.0 * delta);
        columns.push(column);
    }
    DMatrix::from_columns(&columns)
}

/// Central-difference partial derivative of a scalar function with respect
/// to the variable at `var_index`.
pub fn partial_derivative<F>(func: F, var_index: usize, point: &DVector<f64>, delta: f64) -> f64
where
    F: Fn(&DVector<f64>) -> f64,
{
    assert!(
        var_index < point.len(),
        "variable index out of bounds for the evaluation point"
    );
    let mut forward_point = point.clone();
    let mut backward_point = point.clone();
    forward_point[var_index] += delta;
    backward_point[var_index] -= delta;
    (func(&forward_point) - func(&backward_point)) / (2.0 * delta)
}

/// First-order Taylor evaluation of `func` around `point`:
/// `f(x0) + J(x0) (x - x0)`.
pub fn linearize<F>(
    func: F,
    point: &DVector<f64>,
    jacobian: &DMatrix<f64>,
    evaluation_point: &DVector<f64>,
) -> DVector<f64>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    func(point) + jacobian * (evaluation_point - point)
}
