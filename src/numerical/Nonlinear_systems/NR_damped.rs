use super::NR::{NR, SolverFailure};
use crate::Utils::logger::init_term_logger;
use crate::numerical::optimization::history::{IterationRecord, SolveReport, SolveStatus};
use crate::somelinalg::linear_solver::{enorm, solve_linear_system};
use log::{error, info, warn};
use nalgebra::DVector;
use std::time::Instant;

impl NR {
    /// Damped Newton-Raphson main loop.
    ///
    /// Each outer iteration computes the full Newton step and then backtracks:
    /// lambda = 1, 1/2, 1/4, ... until the residual norm of the trial point
    /// drops below the residual norm of the current point, with at most
    /// `max_halving` halvings. If no lambda gives a decrease the solve
    /// stagnates and returns the current point unchanged - a terminal but
    /// non-fatal outcome, reported in the solve status.
    ///
    /// Unlike the undamped loop, convergence is checked AFTER the update:
    /// the solve succeeds when the accepted damped step `lambda * dx` has
    /// norm below the tolerance, and the trial point is returned together
    /// with the iteration history.
    pub fn main_loop_damped(&mut self) -> Result<(DVector<f64>, SolveReport), SolverFailure> {
        assert!(self.fun.is_some(), "Equation system must be set first.");
        let mut x = DVector::from_vec(self.initial_guess.clone());
        self.history.clear();
        self.i = 0;
        self.result = Some(x.clone());
        while self.i < self.max_iterations {
            let fun = self.fun.as_ref().unwrap();
            let fx = fun(&x);
            let old_error = enorm(&fx);
            let jac = self.evaluate_jacobian(&x);
            let step = solve_linear_system(&jac, &(-&fx))?;

            // damping: lambda = 1, 1/2, 1/4, ...
            let mut damping_factor: f64 = 1.0;
            let mut accepted: Option<(DVector<f64>, f64)> = None;
            for _ in 0..=self.max_halving {
                let trial = &x + damping_factor * &step;
                let new_error = enorm(&fun(&trial));
                if new_error < old_error {
                    accepted = Some((trial, new_error));
                    break;
                }
                damping_factor *= 0.5;
            }

            let Some((trial, new_error)) = accepted else {
                self.max_error = old_error;
                let report = SolveReport {
                    status: SolveStatus::Stagnated,
                    iterations: self.i,
                    residual_norm: old_error,
                    history: self.history.clone(),
                };
                self.report = Some(report.clone());
                warn!(
                    "No damping coefficient found after {} halvings - stagnation.",
                    self.max_halving
                );
                return Ok((x, report));
            };

            let damped_step = damping_factor * &step;
            self.history.push(IterationRecord::damped(
                self.i,
                x.clone(),
                damped_step.clone(),
                old_error,
                new_error,
                damping_factor,
            ));
            self.i += 1;
            self.max_error = new_error;
            info!(
                "iteration = {}, damping coefficient = {}, error {} -> {}",
                self.i, damping_factor, old_error, new_error
            );
            if enorm(&damped_step) < self.tolerance {
                let report = SolveReport {
                    status: SolveStatus::Converged,
                    iterations: self.i,
                    residual_norm: new_error,
                    history: self.history.clone(),
                };
                self.result = Some(trial.clone());
                self.report = Some(report.clone());
                info!("Solution found!");
                return Ok((trial, report));
            }
            x = trial;
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

    /// wrapper around main_loop_damped to implement logging and statistics
    pub fn solve_damped(&mut self) -> Result<(DVector<f64>, SolveReport), SolverFailure> {
        init_term_logger(&self.loglevel);
        let begin = Instant::now();
        let res = self.main_loop_damped();
        info!("solve took {:?}", begin.elapsed());
        self.calc_statistics();
        res
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     TESTS
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::Nonlinear_systems::NR::{JacobianFunction, VectorFunction};
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn arctan_fun() -> VectorFunction {
        Box::new(|x: &DVector<f64>| DVector::from_vec(vec![x[0].atan()]))
    }

    fn arctan_jac() -> JacobianFunction {
        Box::new(|x: &DVector<f64>| DMatrix::from_row_slice(1, 1, &[1.0 / (1.0 + x[0] * x[0])]))
    }

    #[test]
    fn test_damped_newton_shrinks_the_step_where_plain_newton_diverges() {
        // from x0 = 3 the full Newton step on arctan(x) = 0 overshoots and
        // increases the residual, so the line search must pick lambda < 1
        let mut solver = NR::new();
        solver.set_system(arctan_fun(), Some(arctan_jac()), vec![3.0], 1e-8, 50);
        let (solution, report) = solver.main_loop_damped().unwrap();
        assert_relative_eq!(solution[0], 0.0, epsilon = 1e-6);
        assert!(report.status.was_successful());
        assert!(
            report
                .history
                .iter()
                .any(|r| r.damping_factor.unwrap() < 1.0),
            "expected at least one damped step"
        );
    }

    #[test]
    fn test_damped_newton_error_decreases_monotonically() {
        let mut solver = NR::new();
        solver.set_system(arctan_fun(), Some(arctan_jac()), vec![3.0], 1e-8, 50);
        solver.main_loop_damped().unwrap();
        for record in &solver.get_report().unwrap().history {
            assert!(record.new_error.unwrap() < record.error);
        }
    }

    #[test]
    fn test_damped_newton_on_the_benchmark_system() {
        let fun: VectorFunction = Box::new(|x: &DVector<f64>| {
            DVector::from_vec(vec![
                2.0 * x[0] + 4.0 * x[1],
                4.0 * x[0] + 8.0 * x[1].powi(3),
            ])
        });
        let jac: JacobianFunction = Box::new(|x: &DVector<f64>| {
            DMatrix::from_row_slice(2, 2, &[2.0, 4.0, 4.0, 24.0 * x[1] * x[1]])
        });
        let mut solver = NR::new();
        solver.set_system(fun, Some(jac), vec![4.0, 2.0], 1e-6, 100);
        let (solution, report) = solver.main_loop_damped().unwrap();
        let residual = DVector::from_vec(vec![
            2.0 * solution[0] + 4.0 * solution[1],
            4.0 * solution[0] + 8.0 * solution[1].powi(3),
        ]);
        assert!(enorm(&residual) < 1e-5);
        assert_eq!(report.history.len(), report.iterations);
    }

    #[test]
    fn test_damped_newton_stagnation_is_soft() {
        // far out on the arctan tail with only two halvings allowed no trial
        // point can decrease the residual: the solve must stop without error
        // and without touching the parameters
        let mut solver = NR::new();
        solver.set_system(arctan_fun(), Some(arctan_jac()), vec![500.0], 1e-8, 50);
        solver.set_solver_params(None, Some(2), None);
        let (solution, report) = solver.main_loop_damped().unwrap();
        assert_relative_eq!(solution[0], 500.0, epsilon = 1e-12);
        assert_eq!(report.status, SolveStatus::Stagnated);
        assert_eq!(report.iterations, 0);
        assert!(report.history.is_empty());
    }
}
