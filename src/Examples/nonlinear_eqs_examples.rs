use crate::numerical::Nonlinear_systems::NR::{JacobianFunction, NR, VectorFunction};
use nalgebra::{DMatrix, DVector};

fn benchmark_fun() -> VectorFunction {
    Box::new(|x: &DVector<f64>| {
        DVector::from_vec(vec![
            2.0 * x[0] + 4.0 * x[1],
            4.0 * x[0] + 8.0 * x[1].powi(3),
        ])
    })
}

fn benchmark_jac() -> JacobianFunction {
    Box::new(|x: &DVector<f64>| DMatrix::from_row_slice(2, 2, &[2.0, 4.0, 4.0, 24.0 * x[1] * x[1]]))
}

/// Newton-Raphson on f(x) = [2 x0 + 4 x1, 4 x0 + 8 x1^3] from [4, 2].
pub fn newton_benchmark_example() {
    let mut solver = NR::new();
    solver.set_system(benchmark_fun(), Some(benchmark_jac()), vec![4.0, 2.0], 1e-6, 100);
    match solver.solve() {
        Ok((solution, report)) => {
            println!("Solution found:");
            println!("{}", solution);
            println!("Number of iterations: {}", report.iterations);
        }
        Err(e) => println!("{}", e),
    }
}

/// The same system without an analytic jacobian: central differences.
pub fn newton_numeric_jacobian_example() {
    let mut solver = NR::new();
    solver.set_system(benchmark_fun(), None, vec![4.0, 2.0], 1e-6, 100);
    match solver.solve() {
        Ok((solution, _report)) => println!("solution with numeric jacobian = {}", solution),
        Err(e) => println!("{}", e),
    }
}

/// Damped Newton on arctan(x) = 0: the full step from x0 = 3 overshoots,
/// the line search halves it until the residual decreases.
pub fn damped_newton_example() {
    let fun: VectorFunction = Box::new(|x: &DVector<f64>| DVector::from_vec(vec![x[0].atan()]));
    let jac: JacobianFunction =
        Box::new(|x: &DVector<f64>| DMatrix::from_row_slice(1, 1, &[1.0 / (1.0 + x[0] * x[0])]));
    let mut solver = NR::new();
    solver.set_system(fun, Some(jac), vec![3.0], 1e-8, 50);
    match solver.solve_damped() {
        Ok((solution, report)) => {
            println!("status: {}", report.status);
            println!("solution = {}", solution);
            println!("{}", report.history_table());
        }
        Err(e) => println!("{}", e),
    }
}
