use crate::numerical::ODE_api::{Method, ODEsolver, RhsFunction};

fn reference_rhs() -> RhsFunction {
    Box::new(|t: f64, y: f64| t * t + 0.1 * y)
}

// y(t) = -10 t^2 - 200 t - 2000 + 1722.5 e^(0.05 (2 t + 3))
fn exact_solution(t: f64) -> f64 {
    -10.0 * t * t - 200.0 * t - 2000.0 + 1722.5 * (0.05 * (2.0 * t + 3.0)).exp()
}

/// Integrates y' = t^2 + 0.1 y with every one-step method and prints the
/// error against the exact solution at the right boundary.
pub fn method_comparison_example() {
    println!(
        "{:>16} {:>20} {:>20} {:>20}",
        "method", "y(1.5) numerical", "y(1.5) exact", "error"
    );
    for method in [
        Method::Euler,
        Method::ModifiedEuler,
        Method::Midpoint,
        Method::RK4,
    ] {
        let name = method.name();
        let mut solver = ODEsolver::new(reference_rhs(), method, -1.5, 0.0, 1.5, 5);
        solver.solve();
        let (t_result, y_result) = solver.get_result();
        let y_end = y_result[y_result.len() - 1];
        let y_exact = exact_solution(t_result[t_result.len() - 1]);
        println!(
            "{:>16} {:>20.5} {:>20.5} {:>20.5e}",
            name,
            y_end,
            y_exact,
            (y_exact - y_end).abs()
        );
    }
}

/// Runge-Kutta solution plotted together with the exact curve and saved
/// both as a chart and as a csv table.
pub fn runge_kutta_example() {
    let mut solver = ODEsolver::new(reference_rhs(), Method::RK4, -1.5, 0.0, 1.5, 50);
    solver.solve();
    if let Err(e) = solver.plot_result("runge_kutta.png", Some(&exact_solution)) {
        println!("plotting failed: {}", e);
    }
    if let Err(e) = solver.save_result("runge_kutta.csv") {
        println!("saving failed: {}", e);
    }
    let (t_result, y_result) = solver.get_result();
    println!("y({}) = {}", t_result[50], y_result[50]);
}
