use crate::numerical::interpolation::{CubicSpline, lagrange_interpolation};

/// Estimates the temperature at 11 o'clock from four measurements with the
/// Lagrange interpolation formula.
pub fn lagrange_example() {
    let t_points = [8.0, 10.0, 12.0, 14.0]; // time in hours
    let y_points = [11.2, 13.4, 15.3, 19.5]; // temperature in degrees C
    let t = 11.0;
    let estimated_temp = lagrange_interpolation(&t_points, &y_points, t);
    println!(
        "The estimated temperature at {} o'clock is {:.2} degrees C.",
        t, estimated_temp
    );
}

/// Estimates a population between census years with a natural cubic spline.
pub fn spline_example() {
    let t = [
        1900.0, 1910.0, 1920.0, 1930.0, 1940.0, 1950.0, 1960.0, 1970.0, 1980.0, 1990.0, 2000.0,
    ];
    let p = [
        75.995, 91.972, 105.711, 123.203, 131.669, 150.697, 179.323, 203.212, 226.506, 249.683,
        281.422,
    ];
    let spline = match CubicSpline::construct(&t, &p) {
        Ok(spline) => spline,
        Err(e) => {
            println!("spline construction failed: {}", e);
            return;
        }
    };
    let year = 1955.0;
    match spline.evaluate(year) {
        Ok(population) => println!(
            "The estimated population in {} is {:.3} million.",
            year, population
        ),
        Err(e) => println!("{}", e),
    }
}
