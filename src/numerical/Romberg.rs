use nalgebra::DMatrix;
use tabled::{builder::Builder, settings::Style};

/// Romberg extrapolation table for the integral of f over [a, b].
///
/// Column 0 holds the trapezoid results with 2^j subintervals; column k is
/// the Richardson extrapolation `(4^k T[j][k-1] - T[j-1][k-1]) / (4^k - 1)`.
/// Entries above the diagonal stay zero.
pub fn romberg_table<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, levels: usize) -> DMatrix<f64> {
    assert!(levels > 0, "Number of levels should be a positive number.");
    let mut table = DMatrix::zeros(levels, levels);

    // trapezoid results for every level
    for j in 0..levels {
        let n = 1usize << j;
        let h = (b - a) / n as f64;
        let mut sum_midpoints = 0.0;
        for i in 1..n {
            sum_midpoints += f(a + i as f64 * h);
        }
        table[(j, 0)] = h * (0.5 * (f(a) + f(b)) + sum_midpoints);
    }

    // extrapolation column by column
    for k in 1..levels {
        for j in k..levels {
            let factor = 4.0f64.powi(k as i32);
            table[(j, k)] = (factor * table[(j, k - 1)] - table[(j - 1, k - 1)]) / (factor - 1.0);
        }
    }

    table
}

/// Most extrapolated value of the Romberg table (its bottom-right entry).
pub fn romberg<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, levels: usize) -> f64 {
    let table = romberg_table(f, a, b, levels);
    table[(levels - 1, levels - 1)]
}

/// Renders the lower-triangular part of a Romberg table for display.
pub fn format_romberg_table(table: &DMatrix<f64>) -> String {
    let mut builder = Builder::default();
    for i in 0..table.nrows() {
        let row: Vec<String> = (0..=i).map(|k| format!("{:.10}", table[(i, k)])).collect();
        builder.push_record(row);
    }
    let mut rendered = builder.build();
    rendered.with(Style::modern_rounded());
    rendered.to_string()
}
