//! examples of usage of RustedNumMethods
/// least-squares fitting with Gauss-Newton, with and without damping
pub mod fitting_examples;
/// interpolation: Lagrange polynomial and cubic splines
pub mod interpolation_examples;
/// initial value problems: Euler family and Runge-Kutta methods
pub mod ivp_examples;
/// nonlinear equation systems: undamped and damped Newton-Raphson
pub mod nonlinear_eqs_examples;
/// quadrature rules and Romberg extrapolation
pub mod quadrature_examples;
