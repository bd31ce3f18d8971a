use gauss_quad::GaussLegendre;

/// Composite midpoint-rectangle rule with n subintervals.
pub fn rectangle_rule<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    assert!(n > 0, "Number of intervals should be a positive number.");
    let h = (b - a) / n as f64;
    let mut integral = 0.0;
    for i in 0..n {
        let midpoint = a + h * (i as f64 + 0.5);
        integral += f(midpoint);
    }
    h * integral
}

/// Midpoint-rectangle rule together with its a-priori error bound
/// `h^2 / 24 (b - a) max|f''|`.
pub fn rectangle_rule_with_error<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    n: usize,
    max_f2: f64,
) -> (f64, f64) {
    let h = (b - a) / n as f64;
    let error_boundary = h * h / 24.0 * (b - a) * max_f2;
    (rectangle_rule(f, a, b, n), error_boundary)
}

/// Composite trapezoid rule with n subintervals.
pub fn trapezoid_rule<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    assert!(n > 0, "Number of intervals should be a positive number.");
    let h = (b - a) / n as f64;
    let mut integral = 0.5 * (f(a) + f(b));
    for i in 1..n {
        let x_i = a + i as f64 * h;
        integral += f(x_i);
    }
    h * integral
}

/// Trapezoid rule together with its a-priori error bound
/// `h^2 / 12 (b - a) max|f''|`.
pub fn trapezoid_rule_with_error<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    n: usize,
    max_f2: f64,
) -> (f64, f64) {
    let h = (b - a) / n as f64;
    let error_boundary = h * h / 12.0 * (b - a) * max_f2;
    (trapezoid_rule(f, a, b, n), error_boundary)
}

/// Composite Simpson rule; n must be even.
pub fn simpson_rule<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    assert!(n > 0, "Number of intervals should be a positive number.");
    assert!(
        n % 2 == 0,
        "Number of intervals must be even for the Simpson rule."
    );
    let h = (b - a) / n as f64;
    let mut integral = f(a) + f(b);
    for i in 1..n {
        let x_i = a + i as f64 * h;
        if i % 2 == 0 {
            integral += 2.0 * f(x_i);
        } else {
            integral += 4.0 * f(x_i);
        }
    }
    (h / 3.0) * integral
}

/// Simpson rule together with its a-priori error bound
/// `h^4 / 180 (b - a) max|f''''|`, h being the subinterval width.
pub fn simpson_rule_with_error<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    n: usize,
    max_f4: f64,
) -> (f64, f64) {
    let h = (b - a) / n as f64;
    let error_boundary = h.powi(4) / 180.0 * (b - a) * max_f4;
    (simpson_rule(f, a, b, n), error_boundary)
}

/// Textbook Gauss-Legendre quadrature with the closed-form nodes and weights
/// for 1, 2 or 3 points, transformed from [-1, 1] to [a, b].
pub fn gauss_rule<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let (points, weights): (Vec<f64>, Vec<f64>) = match n {
        // one point: the midpoint rule on [-1, 1]
        1 => (vec![0.0], vec![2.0]),
        // two points: roots of P2(x) = (3 x^2 - 1) / 2
        2 => (
            vec![-1.0 / 3.0f64.sqrt(), 1.0 / 3.0f64.sqrt()],
            vec![1.0, 1.0],
        ),
        // three points: roots of P3(x) = (5 x^3 - 3 x) / 2
        3 => (
            vec![-0.774596669241483, 0.0, 0.774596669241483],
            vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0],
        ),
        _ => panic!("closed-form nodes are only tabulated for n = 1, 2 or 3"),
    };
    let transform = |x: f64| (b - a) / 2.0 * x + (b + a) / 2.0;
    let mut integral = 0.0;
    for i in 0..n {
        integral += weights[i] * f(transform(points[i]));
    }
    integral * (b - a) / 2.0
}

/// Gauss-Legendre quadrature with an arbitrary number of points.
pub fn gauss_legendre<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    n_points: usize,
) -> Result<f64, String> {
    let quad = GaussLegendre::new(n_points)
        .map_err(|e| format!("Failed to create Gauss-Legendre quadrature: {:?}", e))?;
    Ok(quad.integrate(a, b, f))
}
