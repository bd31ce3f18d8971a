#![allow(non_snake_case)]
use RustedNumMethods::Examples::fitting_examples::{
    exponential_fit_example, exponential_fit_plot_example,
};
use RustedNumMethods::Examples::interpolation_examples::{lagrange_example, spline_example};
use RustedNumMethods::Examples::ivp_examples::{method_comparison_example, runge_kutta_example};
use RustedNumMethods::Examples::nonlinear_eqs_examples::{
    damped_newton_example, newton_benchmark_example, newton_numeric_jacobian_example,
};
use RustedNumMethods::Examples::quadrature_examples::{quadrature_rules_example, romberg_example};

fn main() {
    let example = 0;
    match example {
        0 => newton_benchmark_example(),
        1 => newton_numeric_jacobian_example(),
        2 => damped_newton_example(),
        3 => exponential_fit_example(),
        4 => exponential_fit_plot_example(),
        5 => method_comparison_example(),
        6 => runge_kutta_example(),
        7 => quadrature_rules_example(),
        8 => romberg_example(),
        9 => lagrange_example(),
        10 => spline_example(),
        _ => println!("there is no example with number {}", example),
    }
}
