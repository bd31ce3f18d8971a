/// Gauss-Newton solver for nonlinear least-squares fitting, with and
/// without step-halving damping
pub mod gauss_newton;
/// per-iteration diagnostics records and the solve report
pub mod history;
/// the model/jacobian capability the Gauss-Newton solver consumes;
/// closed-form and finite-difference realizations
pub mod problem;
