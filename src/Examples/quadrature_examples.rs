use crate::numerical::Romberg::{format_romberg_table, romberg_table};
use crate::numerical::quadrature::{
    gauss_legendre, gauss_rule, rectangle_rule_with_error, simpson_rule_with_error,
    trapezoid_rule_with_error,
};

/// Integrates 1/x over [2, 4] (exact value ln 2) with every rule and prints
/// the a-priori error bounds next to the actual errors.
pub fn quadrature_rules_example() {
    let f = |x: f64| 1.0 / x;
    let exact = std::f64::consts::LN_2;
    // derivative maxima of 1/x on [2, 4] for the error formulas
    let max_f2 = 0.25;
    let max_f4 = 0.75;
    let (a, b, n) = (2.0, 4.0, 4);

    let (rectangle_result, rectangle_bound) = rectangle_rule_with_error(f, a, b, n, max_f2);
    println!(
        "rectangle (midpoint): {:.5}, error bound: {:.5e}, actual error: {:.5e}",
        rectangle_result,
        rectangle_bound,
        (exact - rectangle_result).abs()
    );

    let (trapezoid_result, trapezoid_bound) = trapezoid_rule_with_error(f, a, b, n, max_f2);
    println!(
        "trapezoid: {:.5}, error bound: {:.5e}, actual error: {:.5e}",
        trapezoid_result,
        trapezoid_bound,
        (exact - trapezoid_result).abs()
    );

    let (simpson_result, simpson_bound) = simpson_rule_with_error(f, a, b, n, max_f4);
    println!(
        "Simpson: {:.5}, error bound: {:.5e}, actual error: {:.5e}",
        simpson_result,
        simpson_bound,
        (exact - simpson_result).abs()
    );

    for points in 1..=3 {
        println!(
            "Gauss quadrature (n={}): {:.6}",
            points,
            gauss_rule(f, a, b, points)
        );
    }
    match gauss_legendre(f, a, b, 16) {
        Ok(result) => println!("Gauss-Legendre (n=16): {:.12}", result),
        Err(e) => println!("{}", e),
    }
}

/// Builds a 5-level Romberg table for the same integral and prints it.
pub fn romberg_example() {
    let f = |x: f64| 1.0 / x;
    let exact = std::f64::consts::LN_2;
    let levels = 5;
    let table = romberg_table(f, 2.0, 4.0, levels);
    println!("Romberg extrapolation table:");
    println!("{}", format_romberg_table(&table));
    let final_result = table[(levels - 1, levels - 1)];
    println!(
        "final result (level {}): {:.10}",
        levels, final_result
    );
    println!("exact value of the integral: {:.10}", exact);
    println!("absolute error: {:.10e}", (final_result - exact).abs());
}
