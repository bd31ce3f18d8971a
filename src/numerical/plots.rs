use nalgebra::DVector;
use plotters::prelude::*;
use std::error::Error;

/// Plots a computed IVP solution, optionally together with a reference curve.
pub fn plot_ivp_result(
    filename: &str,
    title: &str,
    arg: &str,
    t_result: &DVector<f64>,
    y_result: &DVector<f64>,
    exact: Option<&dyn Fn(f64) -> f64>,
) -> Result<(), Box<dyn Error>> {
    assert_eq!(
        t_result.len(),
        y_result.len(),
        "time and solution vectors must have the same length"
    );
    assert!(t_result.len() > 1, "nothing to plot");
    let x_min = t_result[0];
    let x_max = t_result[t_result.len() - 1];
    let exact_values: Option<Vec<(f64, f64)>> =
        exact.map(|f| t_result.iter().map(|&t| (t, f(t))).collect());
    let mut y_min = y_result.min();
    let mut y_max = y_result.max();
    if let Some(values) = &exact_values {
        for &(_, y) in values {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(arg).y_desc("y").draw()?;

    let series: Vec<(f64, f64)> = t_result
        .iter()
        .zip(y_result.iter())
        .map(|(&t, &y)| (t, y))
        .collect();
    chart
        .draw_series(LineSeries::new(series, &Palette99::pick(0)))?
        .label("numerical")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(0)));

    if let Some(values) = exact_values {
        chart
            .draw_series(LineSeries::new(values, &Palette99::pick(1)))?
            .label("exact")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(1))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}

/// Plots measurement points together with a fitted model curve.
pub fn plot_fit_result(
    filename: &str,
    title: &str,
    x_data: &DVector<f64>,
    y_data: &DVector<f64>,
    x_curve: &DVector<f64>,
    y_curve: &DVector<f64>,
) -> Result<(), Box<dyn Error>> {
    assert_eq!(
        x_data.len(),
        y_data.len(),
        "data vectors must have the same length"
    );
    assert_eq!(
        x_curve.len(),
        y_curve.len(),
        "curve vectors must have the same length"
    );
    let x_min = x_curve.min().min(x_data.min());
    let x_max = x_curve.max().max(x_data.max());
    let mut y_min = y_curve.min().min(y_data.min());
    let mut y_max = y_curve.max().max(y_data.max());
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, ("sans-serif", 50))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

    chart
        .draw_series(
            x_data
                .iter()
                .zip(y_data.iter())
                .map(|(&x, &y)| Circle::new((x, y), 4, Palette99::pick(1).filled())),
        )?
        .label("data");

    let curve: Vec<(f64, f64)> = x_curve
        .iter()
        .zip(y_curve.iter())
        .map(|(&x, &y)| (x, y))
        .collect();
    chart
        .draw_series(LineSeries::new(curve, &Palette99::pick(0)))?
        .label("fit")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &Palette99::pick(0)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root_area.present()?;
    Ok(())
}
