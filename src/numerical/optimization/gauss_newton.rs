///  Example#1
/// ```
///  use RustedNumMethods::numerical::optimization::gauss_newton::GaussNewton;
///  use RustedNumMethods::numerical::optimization::problem::AnalyticModel;
///  use nalgebra::{DMatrix, DVector};
///  // model f(x) = a * exp(b * x) with its closed-form jacobian
///  let model = AnalyticModel::new(
///      Box::new(|p: &DVector<f64>, x: &DVector<f64>| x.map(|xi| p[0] * (p[1] * xi).exp())),
///      Box::new(|p: &DVector<f64>, x: &DVector<f64>| {
///          DMatrix::from_columns(&[
///              x.map(|xi| (p[1] * xi).exp()),
///              x.map(|xi| p[0] * xi * (p[1] * xi).exp()),
///          ])
///      }),
///  );
///  let mut fitting = GaussNewton::new(model);
///  fitting.set_fitting(
///      vec![0.0, 1.0, 2.0, 3.0, 4.0],
///      vec![3.0, 1.0, 0.5, 0.2, 0.05],
///      vec![1.0, -1.5],
///  );
///  let (params, report) = fitting.fit().unwrap();
///  println!("a = {}, b = {}, steps = {}", params[0], params[1], report.iterations);
/// ```
use super::history::{IterationRecord, SolveReport, SolveStatus};
use super::problem::FitModel;
use crate::Utils::logger::init_term_logger;
use crate::somelinalg::linear_solver::{LinearSolveError, enorm, solve_linear_system};
use log::{info, warn};
use nalgebra::DVector;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// Nonlinear least-squares fitting with the Gauss-Newton iteration.
///
/// Each iteration linearizes the model around the current parameters and
/// solves the normal equations `(J^T J) dp = J^T r` for the correction.
/// `fit` applies full steps; `fit_damped` shrinks the step by halving until
/// the residual norm decreases.
pub struct GaussNewton<M: FitModel> {
    pub model: M,
    pub x_data: DVector<f64>,      // x values of the measurements
    pub y_data: DVector<f64>,      // y values of the measurements
    pub initial_guess: Vec<f64>,   // initial guess of the parameters
    pub tolerance: f64,            // step-size convergence criterion
    pub max_iterations: usize,     // max number of iterations
    pub max_halving: usize,        // max number of step halvings (damped variant)

    pub i: usize, // iteration counter
    pub result: Option<DVector<f64>>,
    pub report: Option<SolveReport>,

    pub loglevel: Option<String>,
}

impl<M: FitModel> GaussNewton<M> {
    pub fn new(model: M) -> Self {
        GaussNewton {
            model,
            x_data: DVector::zeros(0),
            y_data: DVector::zeros(0),
            initial_guess: Vec::new(),
            tolerance: 1e-8,
            max_iterations: 20,
            max_halving: 8,
            i: 0,
            result: None,
            report: None,
            loglevel: Some("info".to_string()),
        }
    }
    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    pub fn set_fitting(&mut self, x_data: Vec<f64>, y_data: Vec<f64>, initial_guess: Vec<f64>) {
        assert!(!x_data.is_empty(), "Measurement data should not be empty.");
        assert_eq!(
            x_data.len(),
            y_data.len(),
            "x and y data should have the same length."
        );
        assert!(
            !initial_guess.is_empty(),
            "Initial guess should not be empty."
        );
        self.x_data = DVector::from_vec(x_data);
        self.y_data = DVector::from_vec(y_data);
        self.initial_guess = initial_guess;
    }

    pub fn set_solver_params(
        &mut self,
        loglevel: Option<String>,
        tolerance: Option<f64>,
        max_iterations: Option<usize>,
        max_halving: Option<usize>,
    ) {
        if let Some(level) = loglevel {
            assert!(
                level == "debug"
                    || level == "info"
                    || level == "warn"
                    || level == "error"
                    || level == "off"
                    || level == "none",
                "loglevel must be debug/info, warn, error or off"
            );
            self.loglevel = Some(level);
        }
        if let Some(tolerance) = tolerance {
            assert!(
                tolerance >= 0.0,
                "Tolerance should be a non-negative number."
            );
            self.tolerance = tolerance;
        }
        if let Some(max_iterations) = max_iterations {
            assert!(
                max_iterations > 0,
                "Max iterations should be a positive number."
            );
            self.max_iterations = max_iterations;
        }
        if let Some(max_halving) = max_halving {
            assert!(max_halving > 0, "Max halving should be a positive number.");
            self.max_halving = max_halving;
        }
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        &self.y_data - self.model.evaluate(params, &self.x_data)
    }
    /////////////////////////////////////////////////////////////////////////////////////////////
    //                ITERATIONS
    /////////////////////////////////////////////////////////////////////////////////////////////
    /// Undamped Gauss-Newton iteration.
    ///
    /// Convergence is signalled by the norm of the freshly computed step,
    /// checked before the update; the converged exit still applies that
    /// step and returns `params + dp`. Running out of iterations is a
    /// legitimate outcome here and is reported in the status, not raised.
    pub fn fit(&mut self) -> Result<(DVector<f64>, SolveReport), LinearSolveError> {
        assert!(
            self.x_data.len() > 0,
            "Fitting data must be set before fit."
        );
        let mut params = DVector::from_vec(self.initial_guess.clone());
        let mut history: Vec<IterationRecord> = Vec::new();
        self.i = 0;
        for iteration in 0..self.max_iterations {
            let residuals = self.residuals(&params);
            let jacobi_matrix = self.model.jacobian(&params, &self.x_data);
            assert_eq!(
                jacobi_matrix.nrows(),
                self.y_data.len(),
                "Jacobian must have one row per measurement."
            );
            let normal_matrix = jacobi_matrix.transpose() * &jacobi_matrix;
            let right_hand_side = jacobi_matrix.transpose() * &residuals;
            let step = solve_linear_system(&normal_matrix, &right_hand_side)?;
            let error = enorm(&residuals);
            history.push(IterationRecord::undamped(
                iteration,
                params.clone(),
                step.clone(),
                error,
            ));
            self.i = iteration + 1;
            info!(
                "iteration = {}, residual norm = {}, step norm = {}",
                iteration,
                error,
                enorm(&step)
            );
            if enorm(&step) < self.tolerance {
                let solution = &params + &step;
                return Ok(self.finish(solution, SolveStatus::Converged, history));
            }
            params += &step;
        }
        Ok(self.finish(params, SolveStatus::MaxIterations, history))
    }

    /// Damped Gauss-Newton iteration with step-halving line search.
    ///
    /// The full correction is shrunk by lambda = 1, 1/2, 1/4, ... until the
    /// residual norm of the trial point drops below the current one, with at
    /// most `max_halving` halvings. If no lambda helps, the fit stagnates:
    /// the current parameters and history are returned with a `Stagnated`
    /// status and no update is applied. Convergence is checked AFTER the
    /// update (`|lambda * dp| < tolerance`) and returns the trial point.
    pub fn fit_damped(&mut self) -> Result<(DVector<f64>, SolveReport), LinearSolveError> {
        assert!(
            self.x_data.len() > 0,
            "Fitting data must be set before fit."
        );
        let mut params = DVector::from_vec(self.initial_guess.clone());
        let mut history: Vec<IterationRecord> = Vec::new();
        self.i = 0;
        for iteration in 0..self.max_iterations {
            let residuals = self.residuals(&params);
            let jacobi_matrix = self.model.jacobian(&params, &self.x_data);
            let normal_matrix = jacobi_matrix.transpose() * &jacobi_matrix;
            let right_hand_side = jacobi_matrix.transpose() * &residuals;
            let step = solve_linear_system(&normal_matrix, &right_hand_side)?;
            let old_error = enorm(&residuals);

            // damping: halve the step until the error decreases
            let mut damping_factor: f64 = 1.0;
            let mut accepted: Option<(DVector<f64>, f64)> = None;
            for _ in 0..=self.max_halving {
                let trial = &params + damping_factor * &step;
                let new_error = enorm(&self.residuals(&trial));
                if new_error < old_error {
                    accepted = Some((trial, new_error));
                    break;
                }
                damping_factor *= 0.5;
            }

            let Some((trial, new_error)) = accepted else {
                warn!(
                    "No damping coefficient found after {} halvings - stagnation.",
                    self.max_halving
                );
                return Ok(self.finish(params, SolveStatus::Stagnated, history));
            };

            let damped_step = damping_factor * &step;
            history.push(IterationRecord::damped(
                iteration,
                params.clone(),
                damped_step.clone(),
                old_error,
                new_error,
                damping_factor,
            ));
            self.i = iteration + 1;
            info!(
                "iteration = {}, damping coefficient = {}, error {} -> {}",
                iteration, damping_factor, old_error, new_error
            );
            if enorm(&damped_step) < self.tolerance {
                return Ok(self.finish(trial, SolveStatus::Converged, history));
            }
            params = trial;
        }
        Ok(self.finish(params, SolveStatus::MaxIterations, history))
    }

    fn finish(
        &mut self,
        params: DVector<f64>,
        status: SolveStatus,
        history: Vec<IterationRecord>,
    ) -> (DVector<f64>, SolveReport) {
        let residual_norm = enorm(&self.residuals(&params));
        let report = SolveReport {
            status,
            iterations: self.i,
            residual_norm,
            history,
        };
        match status {
            SolveStatus::Converged => info!("Fitting converged: {}", status),
            _ => warn!("Fitting finished: {}", status),
        }
        self.result = Some(params.clone());
        self.report = Some(report.clone());
        (params, report)
    }
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    //                                       main functions to start the solver and calculate statistics
    ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
    /// wrapper around fit to implement logging and statistics
    pub fn solve(&mut self) -> Result<(DVector<f64>, SolveReport), LinearSolveError> {
        init_term_logger(&self.loglevel);
        let begin = Instant::now();
        let res = self.fit();
        info!("fit took {:?}", begin.elapsed());
        self.calc_statistics();
        res
    }

    /// wrapper around fit_damped to implement logging and statistics
    pub fn solve_damped(&mut self) -> Result<(DVector<f64>, SolveReport), LinearSolveError> {
        init_term_logger(&self.loglevel);
        let begin = Instant::now();
        let res = self.fit_damped();
        info!("damped fit took {:?}", begin.elapsed());
        self.calc_statistics();
        res
    }

    pub fn get_result(&self) -> Option<DVector<f64>> {
        self.result.clone()
    }

    pub fn get_report(&self) -> Option<&SolveReport> {
        self.report.as_ref()
    }

    /// Coefficient of determination of the stored fit result.
    pub fn r_squared(&self) -> Option<f64> {
        let params = self.result.as_ref()?;
        let residuals = self.residuals(params);
        let ss_res = residuals.dot(&residuals);
        let y_mean = self.y_data.mean();
        let ss_tot = self
            .y_data
            .iter()
            .map(|y| (y - y_mean) * (y - y_mean))
            .sum::<f64>();
        if ss_tot == 0.0 {
            return None;
        }
        Some(1.0 - ss_res / ss_tot)
    }

    fn calc_statistics(&self) {
        let mut builder = Builder::default();
        builder.push_record(["number of iterations", &self.i.to_string()]);
        builder.push_record(["number of measurements", &self.y_data.len().to_string()]);
        builder.push_record(["number of parameters", &self.initial_guess.len().to_string()]);
        if let Some(report) = &self.report {
            builder.push_record(["status", &report.status.to_string()]);
            builder.push_record(["final residual norm", &format!("{:.3e}", report.residual_norm)]);
        }
        if let Some(r2) = self.r_squared() {
            builder.push_record(["R^2", &format!("{:.6}", r2)]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        info!("\n \n CALC STATISTICS \n \n {}", table);
        if let Some(report) = &self.report {
            info!("\n {}", report.history_table());
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     TESTS
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::optimization::problem::{
        AnalyticModel, ModelFunction, ModelJacobian, NumericModel,
    };
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn exponential_func() -> ModelFunction {
        Box::new(|p: &DVector<f64>, x: &DVector<f64>| x.map(|xi| p[0] * (p[1] * xi).exp()))
    }

    fn exponential_jac() -> ModelJacobian {
        Box::new(|p: &DVector<f64>, x: &DVector<f64>| {
            DMatrix::from_columns(&[
                x.map(|xi| (p[1] * xi).exp()),
                x.map(|xi| p[0] * xi * (p[1] * xi).exp()),
            ])
        })
    }

    fn exponential_fitting() -> GaussNewton<AnalyticModel> {
        let model = AnalyticModel::new(exponential_func(), exponential_jac());
        let mut fitting = GaussNewton::new(model);
        fitting.set_fitting(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![3.0, 1.0, 0.5, 0.2, 0.05],
            vec![1.0, -1.5],
        );
        fitting
    }

    #[test]
    fn test_gauss_newton_exponential_benchmark() {
        let mut fitting = exponential_fitting();
        let (params, report) = fitting.fit().unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        // the data is nearly exponential, the fit should track it closely
        assert!(report.residual_norm < 0.2);
        assert!(params[0] > 0.0);
        assert!(params[1] < 0.0);
        assert!(fitting.r_squared().unwrap() > 0.99);
    }

    #[test]
    fn test_gauss_newton_round_trip_refit() {
        let mut fitting = exponential_fitting();
        let (params, _) = fitting.fit().unwrap();
        // refitting the model to its own predictions from the solution
        // converges immediately with a near-zero step
        let predictions = fitting.model.evaluate(&params, &fitting.x_data);
        let mut refit = GaussNewton::new(AnalyticModel::new(
            exponential_func(),
            exponential_jac(),
        ));
        refit.set_fitting(
            fitting.x_data.iter().copied().collect(),
            predictions.iter().copied().collect(),
            params.iter().copied().collect(),
        );
        let (refit_params, report) = refit.fit().unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert_eq!(report.iterations, 1);
        assert!(report.history[0].step.norm() < refit.tolerance);
        for i in 0..2 {
            assert_relative_eq!(refit_params[i], params[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_gauss_newton_history_matches_iterations() {
        let mut fitting = exponential_fitting();
        let (_, report) = fitting.fit().unwrap();
        assert_eq!(report.history.len(), report.iterations);
        assert!(report.history.iter().all(|r| r.damping_factor.is_none()));
    }

    #[test]
    fn test_numeric_model_reproduces_analytic_fit() {
        let mut analytic_fitting = exponential_fitting();
        let (analytic_params, _) = analytic_fitting.fit().unwrap();

        let mut numeric_fitting = GaussNewton::new(NumericModel::new(exponential_func()));
        numeric_fitting.set_fitting(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![3.0, 1.0, 0.5, 0.2, 0.05],
            vec![1.0, -1.5],
        );
        let (numeric_params, report) = numeric_fitting.fit().unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        for i in 0..2 {
            assert_relative_eq!(numeric_params[i], analytic_params[i], epsilon = 1e-5);
        }
    }

    // single-parameter model atan(c) * x, deliberately prone to overshooting
    fn arctan_model() -> AnalyticModel {
        AnalyticModel::new(
            Box::new(|p: &DVector<f64>, x: &DVector<f64>| x.map(|xi| p[0].atan() * xi)),
            Box::new(|p: &DVector<f64>, x: &DVector<f64>| {
                DMatrix::from_columns(&[x.map(|xi| xi / (1.0 + p[0] * p[0]))])
            }),
        )
    }

    #[test]
    fn test_damped_fit_shrinks_overshooting_steps() {
        let mut fitting = GaussNewton::new(arctan_model());
        fitting.set_fitting(vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0], vec![3.0]);
        let (params, report) = fitting.fit_damped().unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert_relative_eq!(params[0], 0.0, epsilon = 1e-6);
        assert!(
            report
                .history
                .iter()
                .any(|r| r.damping_factor.unwrap() < 1.0),
            "expected at least one damped step"
        );
        // the accepted trial must improve the merit function every iteration
        for record in &report.history {
            assert!(record.new_error.unwrap() < record.error);
        }
    }

    #[test]
    fn test_damped_fit_stagnation_returns_parameters_softly() {
        let mut fitting = GaussNewton::new(arctan_model());
        fitting.set_fitting(vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0], vec![500.0]);
        fitting.set_solver_params(None, None, None, Some(2));
        let (params, report) = fitting.fit_damped().unwrap();
        assert_eq!(report.status, SolveStatus::Stagnated);
        assert_relative_eq!(params[0], 500.0, epsilon = 1e-12);
        assert_eq!(report.iterations, 0);
        assert!(report.history.is_empty());
    }

    #[test]
    fn test_singular_normal_matrix_is_fatal() {
        // both parameters multiply the same basis function, so the jacobian
        // columns are identical and the normal matrix is singular
        let model = AnalyticModel::new(
            Box::new(|p: &DVector<f64>, x: &DVector<f64>| x.map(|xi| (p[0] + p[1]) * xi)),
            Box::new(|_p: &DVector<f64>, x: &DVector<f64>| {
                DMatrix::from_columns(&[x.clone(), x.clone()])
            }),
        );
        let mut fitting = GaussNewton::new(model);
        fitting.set_fitting(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0], vec![1.0, 1.0]);
        assert!(matches!(
            fitting.fit(),
            Err(LinearSolveError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_damped_fit_on_exponential_benchmark() {
        let mut fitting = exponential_fitting();
        let (params, report) = fitting.fit_damped().unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert!(report.residual_norm < 0.2);
        assert_eq!(report.history.len(), report.iterations);
        let mut undamped = exponential_fitting();
        let (undamped_params, _) = undamped.fit().unwrap();
        for i in 0..2 {
            assert_relative_eq!(params[i], undamped_params[i], epsilon = 1e-5);
        }
    }
}
