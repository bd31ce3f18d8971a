use crate::numerical::Nonlinear_systems::jacobian::{DEFAULT_DELTA, central_difference_jacobian};
use nalgebra::{DMatrix, DVector};

/// model function: (parameters, sample points) -> predicted values
pub type ModelFunction = Box<dyn Fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>>;
/// jacobian function: (parameters, sample points) -> m x d matrix of partials
pub type ModelJacobian = Box<dyn Fn(&DVector<f64>, &DVector<f64>) -> DMatrix<f64>>;

/// What the Gauss-Newton iteration needs from a model: predictions at the
/// sample points and the jacobian of those predictions with respect to the
/// parameters. Closed-form and finite-difference jacobians implement the
/// same capability and are interchangeable at the solver boundary - the
/// solver never knows which one it is given.
pub trait FitModel {
    /// Predicted values at every sample point, length m.
    fn evaluate(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DVector<f64>;

    /// Jacobian of the predictions with respect to the parameters, m x d.
    fn jacobian(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DMatrix<f64>;
}

/// Model with a closed-form jacobian, the explicit setup step that replaces
/// ahead-of-time symbolic differentiation: both closures are prepared once
/// and handed to the solver as plain callables.
pub struct AnalyticModel {
    pub func: ModelFunction,
    pub jac: ModelJacobian,
}

impl AnalyticModel {
    pub fn new(func: ModelFunction, jac: ModelJacobian) -> Self {
        AnalyticModel { func, jac }
    }
}

impl FitModel for AnalyticModel {
    fn evaluate(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DVector<f64> {
        (self.func)(params, x_vals)
    }

    fn jacobian(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DMatrix<f64> {
        (self.jac)(params, x_vals)
    }
}

/// Model whose jacobian is approximated by central differences with a fixed
/// perturbation of each parameter.
pub struct NumericModel {
    pub func: ModelFunction,
    pub delta: f64,
}

impl NumericModel {
    pub fn new(func: ModelFunction) -> Self {
        NumericModel {
            func,
            delta: DEFAULT_DELTA,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        assert!(delta > 0.0, "Jacobian perturbation should be positive.");
        self.delta = delta;
        self
    }
}

impl FitModel for NumericModel {
    fn evaluate(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DVector<f64> {
        (self.func)(params, x_vals)
    }

    fn jacobian(&self, params: &DVector<f64>, x_vals: &DVector<f64>) -> DMatrix<f64> {
        central_difference_jacobian(|p| (self.func)(p, x_vals), params, self.delta)
    }
}
