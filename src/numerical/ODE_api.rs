///  Example#1
/// ```
///  use RustedNumMethods::numerical::ODE_api::{Method, ODEsolver};
///  // y'(t) = t^2 + 0.1 y, y(-1.5) = 0
///  let rhs = Box::new(|t: f64, y: f64| t * t + 0.1 * y);
///  let mut solver = ODEsolver::new(rhs, Method::RK4, -1.5, 0.0, 1.5, 50);
///  solver.solve();
///  let (t_result, y_result) = solver.get_result();
///  assert_eq!(t_result.len(), 51);
///  assert_eq!(y_result.len(), 51);
/// ```
use crate::Utils::logger::save_columns_to_csv;
use crate::numerical::plots::plot_ivp_result;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::error::Error;
use std::io;

/// right hand side of the differential equation y'(t) = f(t, y)
pub type RhsFunction = Box<dyn Fn(f64, f64) -> f64>;

/// Coefficients of an explicit s-stage Runge-Kutta method: stage matrix `a`
/// (strictly lower triangular), weights `b` and nodes `c`.
pub struct ButcherTableau {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub c: DVector<f64>,
}

impl ButcherTableau {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: DVector<f64>) -> Self {
        assert!(a.is_square(), "stage matrix must be square");
        let s = a.nrows();
        assert!(s > 0, "tableau must have at least one stage");
        assert_eq!(b.len(), s, "weights must match the number of stages");
        assert_eq!(c.len(), s, "nodes must match the number of stages");
        for i in 0..s {
            for j in i..s {
                assert_eq!(
                    a[(i, j)],
                    0.0,
                    "stage matrix must be strictly lower triangular for an explicit method"
                );
            }
        }
        ButcherTableau { a, b, c }
    }

    /// The classical 4th-order Runge-Kutta tableau.
    pub fn classical_rk4() -> Self {
        ButcherTableau::new(
            DMatrix::from_row_slice(
                4,
                4,
                &[
                    0.0, 0.0, 0.0, 0.0, //
                    0.5, 0.0, 0.0, 0.0, //
                    0.0, 0.5, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0,
                ],
            ),
            DVector::from_vec(vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0]),
            DVector::from_vec(vec![0.0, 0.5, 0.5, 1.0]),
        )
    }

    pub fn stages(&self) -> usize {
        self.b.len()
    }
}

/// One-step integration methods for non-stiff problems.
pub enum Method {
    /// classical explicit Euler
    Euler,
    /// predictor-corrector Euler (Heun)
    ModifiedEuler,
    /// explicit midpoint rule
    Midpoint,
    /// classical 4th-order Runge-Kutta
    RK4,
    /// explicit s-stage Runge-Kutta with a user-supplied tableau
    SStage(ButcherTableau),
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::ModifiedEuler => "modified Euler",
            Method::Midpoint => "midpoint",
            Method::RK4 => "Runge-Kutta 4",
            Method::SStage(_) => "s-stage Runge-Kutta",
        }
    }
}

/// Solver of the scalar initial value problem y'(t) = f(t, y), y(t0) = y0
/// on [t0, t_bound] with a fixed step.
pub struct ODEsolver {
    pub rhs: RhsFunction,
    pub method: Method,
    pub t0: f64,
    pub y0: f64,
    pub t_bound: f64,
    pub n_steps: usize,

    pub t_result: DVector<f64>,
    pub y_result: DVector<f64>,
}

impl ODEsolver {
    pub fn new(
        rhs: RhsFunction,
        method: Method,
        t0: f64,
        y0: f64,
        t_bound: f64,
        n_steps: usize,
    ) -> Self {
        assert!(n_steps > 0, "Number of steps should be a positive number.");
        assert!(t_bound > t0, "t_bound must lie to the right of t0.");
        ODEsolver {
            rhs,
            method,
            t0,
            y0,
            t_bound,
            n_steps,
            t_result: DVector::zeros(0),
            y_result: DVector::zeros(0),
        }
    }

    fn step(&self, t: f64, y: f64, h: f64) -> f64 {
        let f = &self.rhs;
        match &self.method {
            Method::Euler => y + h * f(t, y),
            Method::ModifiedEuler => {
                let y_predict = y + h * f(t, y);
                y + (h / 2.0) * (f(t, y) + f(t + h, y_predict))
            }
            Method::Midpoint => {
                let t_mid = t + h / 2.0;
                let y_mid = y + (h / 2.0) * f(t, y);
                y + h * f(t_mid, y_mid)
            }
            Method::RK4 => {
                let k1 = h * f(t, y);
                let k2 = h * f(t + h / 2.0, y + k1 / 2.0);
                let k3 = h * f(t + h / 2.0, y + k2 / 2.0);
                let k4 = h * f(t + h, y + k3);
                y + (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
            }
            Method::SStage(tableau) => {
                let s = tableau.stages();
                let mut k = vec![0.0; s];
                for j in 0..s {
                    let t_stage = t + tableau.c[j] * h;
                    let mut y_stage = y;
                    for l in 0..j {
                        y_stage += h * tableau.a[(j, l)] * k[l];
                    }
                    k[j] = f(t_stage, y_stage);
                }
                let increment: f64 = (0..s).map(|j| tableau.b[j] * k[j]).sum();
                y + h * increment
            }
        }
    }

    /// Integrates over the whole interval with n_steps uniform steps.
    pub fn solve(&mut self) {
        let n = self.n_steps;
        let h = (self.t_bound - self.t0) / n as f64;
        let mut t_values = DVector::zeros(n + 1);
        let mut y_values = DVector::zeros(n + 1);
        t_values[0] = self.t0;
        y_values[0] = self.y0;
        for i in 0..n {
            y_values[i + 1] = self.step(t_values[i], y_values[i], h);
            t_values[i + 1] = self.t0 + (i + 1) as f64 * h;
        }
        info!(
            "{} method: {} steps with h = {} on [{}, {}]",
            self.method.name(),
            n,
            h,
            self.t0,
            self.t_bound
        );
        self.t_result = t_values;
        self.y_result = y_values;
    }

    pub fn get_result(&self) -> (DVector<f64>, DVector<f64>) {
        (self.t_result.clone(), self.y_result.clone())
    }

    /// Saves the integrated solution as a png chart, optionally with the
    /// exact solution overlaid.
    pub fn plot_result(
        &self,
        filename: &str,
        exact: Option<&dyn Fn(f64) -> f64>,
    ) -> Result<(), Box<dyn Error>> {
        plot_ivp_result(
            filename,
            self.method.name(),
            "t",
            &self.t_result,
            &self.y_result,
            exact,
        )
    }

    /// Saves the integrated solution as a csv table.
    pub fn save_result(&self, filename: &str) -> io::Result<()> {
        save_columns_to_csv(
            filename,
            "t",
            &["y".to_string()],
            &self.t_result,
            &[self.y_result.clone()],
        )
    }
}
