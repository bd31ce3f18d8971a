///  Example#1
/// ```
///  use RustedNumMethods::numerical::Nonlinear_systems::NR::NR;
///  use nalgebra::{DMatrix, DVector};
///  // first define the system of equations and the initial guess
///  let mut NR_instanse = NR::new();
///  let fun = Box::new(|x: &DVector<f64>| {
///      DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 10.0, x[0] - x[1] - 4.0])
///  });
///  let jac = Box::new(|x: &DVector<f64>| {
///      DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0])
///  });
///  let initial_guess = vec![1.0, 1.0];
///  // solve
///  NR_instanse.set_system(fun, Some(jac), initial_guess, 1e-6, 100);
///  NR_instanse.main_loop().unwrap();
///  println!("result = {:?} \n", NR_instanse.get_result().unwrap());
/// ```
/// Example#2
/// ```
///  // without an analytic jacobian a central-difference approximation is used
///  use RustedNumMethods::numerical::Nonlinear_systems::NR::NR;
///  use nalgebra::DVector;
///  let mut NR_instanse = NR::new();
///  let fun = Box::new(|x: &DVector<f64>| {
///      DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 10.0, x[0] - x[1] - 4.0])
///  });
///  NR_instanse.set_system(fun, None, vec![1.0, 1.0], 1e-6, 100);
///  let (solution, _report) = NR_instanse.main_loop().unwrap();
///  assert!((solution[0] - 3.0).abs() < 1e-4);
///  assert!((solution[1] + 1.0).abs() < 1e-4);
/// ```
use super::jacobian::{DEFAULT_DELTA, central_difference_jacobian};
use crate::Utils::logger::init_term_logger;
use crate::numerical::optimization::history::{IterationRecord, SolveReport, SolveStatus};
use crate::somelinalg::linear_solver::{LinearSolveError, enorm, solve_linear_system};
use log::{error, info};
use nalgebra::{DMatrix, DVector};
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// residual function of the nonlinear system, f(x) = 0
pub type VectorFunction = Box<dyn Fn(&DVector<f64>) -> DVector<f64>>;
/// jacobian matrix function of the nonlinear system
pub type JacobianFunction = Box<dyn Fn(&DVector<f64>) -> DMatrix<f64>>;

/// Hard failures of a root-finding solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverFailure {
    /// iteration budget exhausted without meeting the tolerance test
    NonConvergence {
        iterations: usize,
        residual_norm: f64,
    },
    /// the linearized correction system could not be solved
    Linear(LinearSolveError),
}

impl fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverFailure::NonConvergence {
                iterations,
                residual_norm,
            } => write!(
                f,
                "no convergence after {} iterations (residual norm = {:.3e})",
                iterations, residual_norm
            ),
            SolverFailure::Linear(err) => write!(f, "linear solve failed: {}", err),
        }
    }
}

impl Error for SolverFailure {}

impl From<LinearSolveError> for SolverFailure {
    fn from(err: LinearSolveError) -> Self {
        SolverFailure::Linear(err)
    }
}

pub struct NR {
    pub fun: Option<VectorFunction>, // residual function of the system
    pub jac: Option<JacobianFunction>, // analytic jacobian; central differences when absent
    pub initial_guess: Vec<f64>,     // initial guess
    pub tolerance: f64,              // tolerance
    pub max_iterations: usize,       // max number of iterations
    pub max_halving: usize,          // max number of step halvings (damped variant)
    pub delta: f64,                  // perturbation of the central-difference jacobian

    pub i: usize, // iteration counter
    pub(crate) max_error: f64,
    pub history: Vec<IterationRecord>, // per-iteration diagnostics
    pub result: Option<DVector<f64>>,  // result of the iteration
    pub report: Option<SolveReport>,

    pub loglevel: Option<String>,
}

impl NR {
    pub fn new() -> NR {
        NR {
            fun: None,
            jac: None,
            initial_guess: Vec::new(),
            tolerance: 1e-6,
            max_iterations: 100,
            max_halving: 8,
            delta: DEFAULT_DELTA,
            i: 0,
            max_error: 0.0,
            history: Vec::new(),
            result: None,
            report: None,
            loglevel: Some("info".to_string()),
        }
    }
    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    /// Basic method to set the equation system
    pub fn set_system(
        &mut self,
        fun: VectorFunction,
        jac: Option<JacobianFunction>,
        initial_guess: Vec<f64>,
        tolerance: f64,
        max_iterations: usize,
    ) {
        assert!(
            !initial_guess.is_empty(),
            "Initial guess should not be empty."
        );
        assert!(
            tolerance >= 0.0,
            "Tolerance should be a non-negative number."
        );
        assert!(
            max_iterations > 0,
            "Max iterations should be a positive number."
        );
        self.fun = Some(fun);
        self.jac = jac;
        self.initial_guess = initial_guess;
        self.tolerance = tolerance;
        self.max_iterations = max_iterations;
    }

    pub fn set_solver_params(
        &mut self,
        loglevel: Option<String>,
        max_halving: Option<usize>,
        delta: Option<f64>,
    ) {
        self.loglevel = if let Some(level) = loglevel {
            assert!(
                level == "debug"
                    || level == "info"
                    || level == "warn"
                    || level == "error"
                    || level == "off"
                    || level == "none",
                "loglevel must be debug/info, warn, error or off"
            );
            Some(level)
        } else {
            self.loglevel.clone()
        };
        if let Some(max_halving) = max_halving {
            assert!(
                max_halving > 0,
                "Max halving should be a positive number."
            );
            self.max_halving = max_halving;
        }
        if let Some(delta) = delta {
            assert!(delta > 0.0, "Jacobian perturbation should be positive.");
            self.delta = delta;
        }
    }

    /// Evaluates the jacobian at x: analytic when set, central differences otherwise.
    pub(crate) fn evaluate_jacobian(&self, x: &DVector<f64>) -> DMatrix<f64> {
        let fun = self.fun.as_ref().unwrap();
        match &self.jac {
            Some(jac) => jac(x),
            None => central_difference_jacobian(|p| fun(p), x, self.delta),
        }
    }
    /////////////////////////////////////////////////////////////////////////////////////////////
    //                ITERATIONS
    /////////////////////////////////////////////////////////////////////////////////////////////
    /// Newton-Raphson iterations: solve J(x) dx = -f(x), apply the full step.
    ///
    /// The convergence signal is the residual norm of the CURRENT point,
    /// checked before the step is applied; on success the already-computed
    /// step is still applied and the updated point is returned together
    /// with the iteration history. Exhausting the iteration budget is a
    /// hard NonConvergence failure (the history stays available through
    /// `get_report`).
    pub fn main_loop(&mut self) -> Result<(DVector<f64>, SolveReport), SolverFailure> {
        assert!(self.fun.is_some(), "Equation system must be set first.");
        let mut x = DVector::from_vec(self.initial_guess.clone());
        self.history.clear();
        self.i = 0;
        self.result = Some(x.clone());
        while self.i < self.max_iterations {
            let fun = self.fun.as_ref().unwrap();
            let fx = fun(&x);
            let residual_norm = enorm(&fx);
            self.max_error = residual_norm;
            let jac = self.evaluate_jacobian(&x);
            let step = solve_linear_system(&jac, &(-&fx))?;
            self.history.push(IterationRecord::undamped(
                self.i,
                x.clone(),
                step.clone(),
                residual_norm,
            ));
            let new_x = &x + &step;
            self.i += 1;
            info!("iteration = {}, error = {}", self.i, residual_norm);
            if residual_norm < self.tolerance {
                let report = SolveReport {
                    status: SolveStatus::Converged,
                    iterations: self.i,
                    residual_norm,
                    history: self.history.clone(),
                };
                self.result = Some(new_x.clone());
                self.report = Some(report.clone());
                info!("Solution found!");
                return Ok((new_x, report));
            }
            x = new_x;
            self.result = Some(x.clone());
        }
        self.report = Some(SolveReport {
            status: SolveStatus::MaxIterations,
            iterations: self.i,
            residual_norm: self.max_error,
            history: self.history.clone(),
        });
        error!("Maximum number of iterations reached. No solution found.");
        Err(SolverFailure::NonConvergence {
            iterations: self.i,
            residual_norm: self.max_error,
        })
    }
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    //                                       main functions to start the solver and calculate statistics
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    /// wrapper around main_loop to implement logging and statistics
    pub fn solve(&mut self) -> Result<(DVector<f64>, SolveReport), SolverFailure> {
        init_term_logger(&self.loglevel);
        let begin = Instant::now();
        let res = self.main_loop();
        info!("solve took {:?}", begin.elapsed());
        self.calc_statistics();
        res
    }

    pub fn get_result(&self) -> Option<DVector<f64>> {
        self.result.clone()
    }

    pub fn get_report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    pub(crate) fn calc_statistics(&self) {
        let mut builder = Builder::default();
        builder.push_record(["number of iterations", &self.i.to_string()]);
        builder.push_record(["length of x vector", &self.initial_guess.len().to_string()]);
        builder.push_record(["final residual norm", &format!("{:.3e}", self.max_error)]);
        builder.push_record(["history records", &self.history.len().to_string()]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        info!("\n \n CALC STATISTICS \n \n {}", table);
        if let Some(report) = &self.report {
            info!("\n {}", report.history_table());
        }
    }
}

impl Default for NR {
    fn default() -> Self {
        Self::new()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     TESTS
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn benchmark_fun() -> VectorFunction {
        Box::new(|x: &DVector<f64>| {
            DVector::from_vec(vec![
                2.0 * x[0] + 4.0 * x[1],
                4.0 * x[0] + 8.0 * x[1].powi(3),
            ])
        })
    }

    fn benchmark_jac() -> JacobianFunction {
        Box::new(|x: &DVector<f64>| {
            DMatrix::from_row_slice(2, 2, &[2.0, 4.0, 4.0, 24.0 * x[1] * x[1]])
        })
    }

    #[test]
    fn test_NR_quadratic_convergence_benchmark() {
        let mut solver = NR::new();
        solver.set_system(benchmark_fun(), Some(benchmark_jac()), vec![4.0, 2.0], 1e-6, 100);
        let (solution, _) = solver.main_loop().unwrap();
        // the residual must be driven to zero well within the budget
        let residual = (benchmark_fun())(&solution);
        assert!(enorm(&residual) < 1e-6);
        // from this starting point the iteration lands on the root (-2, 1)
        assert_relative_eq!(solution[0], -2.0, epsilon = 1e-5);
        assert_relative_eq!(solution[1], 1.0, epsilon = 1e-5);
        let report = solver.get_report().unwrap();
        assert!(report.status.was_successful());
        assert!(report.iterations < 100);
    }

    #[test]
    fn test_NR_circle_line_system_with_analytic_jacobian() {
        let fun: VectorFunction = Box::new(|x: &DVector<f64>| {
            DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 10.0, x[0] - x[1] - 4.0])
        });
        let jac: JacobianFunction = Box::new(|x: &DVector<f64>| {
            DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0])
        });
        let mut solver = NR::new();
        solver.set_system(fun, Some(jac), vec![1.0, 1.0], 1e-6, 100);
        let (solution, _) = solver.main_loop().unwrap();
        assert_relative_eq!(solution[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(solution[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_NR_numeric_jacobian_matches_analytic_result() {
        let fun: VectorFunction = Box::new(|x: &DVector<f64>| {
            DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 10.0, x[0] - x[1] - 4.0])
        });
        let mut solver = NR::new();
        solver.set_system(fun, None, vec![1.0, 1.0], 1e-6, 100);
        let (solution, _) = solver.main_loop().unwrap();
        assert_relative_eq!(solution[0], 3.0, epsilon = 1e-5);
        assert_relative_eq!(solution[1], -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_NR_non_convergence_is_a_hard_failure() {
        // x^2 + 1 = 0 has no real root
        let fun: VectorFunction =
            Box::new(|x: &DVector<f64>| DVector::from_vec(vec![x[0] * x[0] + 1.0]));
        let jac: JacobianFunction =
            Box::new(|x: &DVector<f64>| DMatrix::from_row_slice(1, 1, &[2.0 * x[0]]));
        let mut solver = NR::new();
        solver.set_system(fun, Some(jac), vec![0.5], 1e-10, 15);
        match solver.main_loop() {
            Err(SolverFailure::NonConvergence { iterations, .. }) => assert_eq!(iterations, 15),
            other => panic!("expected NonConvergence, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_NR_singular_jacobian_propagates() {
        // jacobian rows are linearly dependent everywhere
        let fun: VectorFunction = Box::new(|x: &DVector<f64>| {
            DVector::from_vec(vec![x[0] + 2.0 * x[1] - 1.0, 2.0 * x[0] + 4.0 * x[1] - 2.0])
        });
        let jac: JacobianFunction =
            Box::new(|_x: &DVector<f64>| DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]));
        let mut solver = NR::new();
        solver.set_system(fun, Some(jac), vec![1.0, 1.0], 1e-6, 100);
        assert!(matches!(
            solver.main_loop(),
            Err(SolverFailure::Linear(LinearSolveError::SingularMatrix { .. }))
        ));
    }

    #[test]
    fn test_NR_history_length_equals_iterations() {
        let mut solver = NR::new();
        solver.set_system(benchmark_fun(), Some(benchmark_jac()), vec![4.0, 2.0], 1e-6, 100);
        solver.main_loop().unwrap();
        let report = solver.get_report().unwrap();
        assert_eq!(report.history.len(), report.iterations);
        // records are undamped: no damping diagnostics
        assert!(report.history.iter().all(|r| r.damping_factor.is_none()));
    }

    #[test]
    fn test_NR_idempotence_at_the_root() {
        let mut solver = NR::new();
        solver.set_system(benchmark_fun(), Some(benchmark_jac()), vec![4.0, 2.0], 1e-6, 100);
        let (solution, _) = solver.main_loop().unwrap();

        let mut second = NR::new();
        second.set_system(
            benchmark_fun(),
            Some(benchmark_jac()),
            solution.iter().copied().collect(),
            1e-6,
            100,
        );
        second.main_loop().unwrap();
        let report = second.get_report().unwrap();
        assert_eq!(report.iterations, 1);
        assert!(report.history[0].step.norm() < 1e-6);
    }
}
