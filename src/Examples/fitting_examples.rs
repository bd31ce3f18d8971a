use crate::numerical::optimization::gauss_newton::GaussNewton;
use crate::numerical::optimization::problem::{AnalyticModel, FitModel, ModelFunction, ModelJacobian};
use crate::numerical::plots::plot_fit_result;
use nalgebra::{DMatrix, DVector};

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

/// Fits f(x) = a exp(b x) to decaying measurement data, once with full
/// Gauss-Newton steps and once with the damped variant.
pub fn exponential_fit_example() {
    let x_data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let y_data = vec![3.0, 1.0, 0.5, 0.2, 0.05];
    let initial_parameters = vec![1.0, -1.5];

    let mut fitting = GaussNewton::new(AnalyticModel::new(exponential_func(), exponential_jac()));
    fitting.set_fitting(x_data.clone(), y_data.clone(), initial_parameters.clone());
    match fitting.solve() {
        Ok((params, report)) => {
            println!("--------- result (undamped) ---------");
            println!(
                "a = {:.6},  b = {:.6},  steps = {}",
                params[0],
                params[1],
                report.iterations
            );
        }
        Err(e) => println!("{}", e),
    }

    let mut damped = GaussNewton::new(AnalyticModel::new(exponential_func(), exponential_jac()));
    damped.set_fitting(x_data, y_data, initial_parameters);
    match damped.solve_damped() {
        Ok((params, report)) => {
            println!("--------- result (damped) -----------");
            println!(
                "a = {:.6},  b = {:.6},  steps = {}",
                params[0],
                params[1],
                report.iterations
            );
            println!("R^2 = {:.6}", damped.r_squared().unwrap());
        }
        Err(e) => println!("{}", e),
    }
}

/// Same fit, with the fitted curve plotted against the data points.
pub fn exponential_fit_plot_example() {
    let x_data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let y_data = vec![3.0, 1.0, 0.5, 0.2, 0.05];
    let mut fitting = GaussNewton::new(AnalyticModel::new(exponential_func(), exponential_jac()));
    fitting.set_fitting(x_data.clone(), y_data.clone(), vec![1.0, -1.5]);
    let (params, _) = match fitting.fit() {
        Ok(result) => result,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    let x_curve = DVector::from_iterator(81, (0..81).map(|i| i as f64 * 0.05));
    let y_curve = fitting.model.evaluate(&params, &x_curve);
    if let Err(e) = plot_fit_result(
        "exponential_fit.png",
        "a * exp(b * x)",
        &DVector::from_vec(x_data),
        &DVector::from_vec(y_data),
        &x_curve,
        &y_curve,
    ) {
        println!("plotting failed: {}", e);
    }
}
