///  Newton-Raphson solvers for nonlinear algebraic equation systems,
///  undamped and damped (step-halving line search)
pub mod Nonlinear_systems;

/// Gauss-Newton least-squares fitting with the model/jacobian capability
/// trait and per-iteration history
pub mod optimization;

///  Example#1
/// ```
///    //  solve y'(t) = t^2 + 0.1 y, y(-1.5) = 0 with the classical
///    //  4th-order Runge-Kutta method
///  use RustedNumMethods::numerical::ODE_api::{Method, ODEsolver};
///  let rhs = Box::new(|t: f64, y: f64| t * t + 0.1 * y);
///  let mut solver = ODEsolver::new(rhs, Method::RK4, -1.5, 0.0, 1.5, 50);
///  solver.solve();
///  let (t_result, y_result) = solver.get_result();
///  println!("y({}) = {}", t_result[50], y_result[50]);
/// ```
pub mod ODE_api;

/// Romberg extrapolation of the trapezoid rule
pub mod Romberg;
/// Lagrange interpolation and natural cubic splines
pub mod interpolation;
/// tiny module to plot computed results
pub mod plots;
/// rectangle/trapezoid/Simpson rules with a-priori error bounds and
/// Gauss-Legendre quadrature
pub mod quadrature;
