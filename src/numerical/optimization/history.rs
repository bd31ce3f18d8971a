use nalgebra::DVector;
use std::fmt;
use tabled::{builder::Builder, settings::Style};

/// Outcome of a finished solve.
///
/// `Stagnated` and `MaxIterations` are legitimate terminal states of the
/// damped and least-squares iterations, not programming errors; callers
/// inspect the status together with the history to tell "converged early",
/// "ran out of budget" and "could not improve further" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// the step-size (or residual) test was satisfied within the budget
    Converged,
    /// the iteration budget was exhausted without meeting the tolerance
    MaxIterations,
    /// backtracking exhausted all halvings without any error decrease
    Stagnated,
}

impl SolveStatus {
    pub fn was_successful(&self) -> bool {
        matches!(self, SolveStatus::Converged)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "converged"),
            SolveStatus::MaxIterations => write!(f, "maximum iterations reached"),
            SolveStatus::Stagnated => write!(f, "stagnated"),
        }
    }
}

/// Immutable snapshot of a single solver iteration.
///
/// `params` and `error` are taken before the update is applied; `new_error`
/// and `damping_factor` are only filled by the damped variants. Records are
/// never consulted by the solvers themselves.
#[derive(Debug, Clone)]
pub struct IterationRecord {
    pub iteration: usize,
    pub params: DVector<f64>,
    pub step: DVector<f64>,
    pub error: f64,
    pub new_error: Option<f64>,
    pub damping_factor: Option<f64>,
}

impl IterationRecord {
    pub fn undamped(iteration: usize, params: DVector<f64>, step: DVector<f64>, error: f64) -> Self {
        IterationRecord {
            iteration,
            params,
            step,
            error,
            new_error: None,
            damping_factor: None,
        }
    }

    pub fn damped(
        iteration: usize,
        params: DVector<f64>,
        step: DVector<f64>,
        old_error: f64,
        new_error: f64,
        damping_factor: f64,
    ) -> Self {
        IterationRecord {
            iteration,
            params,
            step,
            error: old_error,
            new_error: Some(new_error),
            damping_factor: Some(damping_factor),
        }
    }
}

/// Final parameters' companion: status, iteration count and the full
/// per-iteration history of the solve.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub iterations: usize,
    pub residual_norm: f64,
    pub history: Vec<IterationRecord>,
}

impl SolveReport {
    /// Renders the iteration history as a table for the log.
    pub fn history_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["iter", "params", "step norm", "error", "new error", "lambda"]);
        for record in &self.history {
            let params = record
                .params
                .iter()
                .map(|p| format!("{:.6}", p))
                .collect::<Vec<String>>()
                .join(", ");
            builder.push_record([
                record.iteration.to_string(),
                format!("[{}]", params),
                format!("{:.3e}", record.step.norm()),
                format!("{:.3e}", record.error),
                record
                    .new_error
                    .map(|e| format!("{:.3e}", e))
                    .unwrap_or_else(|| "-".to_string()),
                record
                    .damping_factor
                    .map(|l| format!("{}", l))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}
