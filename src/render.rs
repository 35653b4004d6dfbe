//! Plot rendering: forecast overlay and component decomposition views.
//!
//! Presentation outputs only; nothing downstream consumes these files.
//! Timestamps are drawn on a unix-seconds axis.

use crate::core::{ForecastFrame, Series};
use crate::error::{PipelineError, Result};
use plotters::prelude::*;
use std::path::Path;

fn render_err<E: std::fmt::Display>(e: E) -> PipelineError {
    PipelineError::Render(e.to_string())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = 0.05 * (max - min).max(1.0);
    (min - pad, max + pad)
}

/// Render the overlay plot: historical points, the forecast line, and the
/// shaded uncertainty band.
pub fn plot_forecast(
    series: &Series,
    frame: &ForecastFrame,
    path: impl AsRef<Path>,
) -> Result<()> {
    if frame.is_empty() {
        return Err(PipelineError::EmptyData);
    }

    let xs: Vec<i64> = frame.timestamps().iter().map(|t| t.timestamp()).collect();
    let x_range = xs[0]..xs[xs.len() - 1];
    let (y_min, y_max) = padded_range(
        series
            .values()
            .iter()
            .copied()
            .chain(frame.yhat_lower().iter().copied())
            .chain(frame.yhat_upper().iter().copied()),
    );

    let root = BitMapBackend::new(path.as_ref(), (1024, 576)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Forecast", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(render_err)?;

    chart.configure_mesh().draw().map_err(render_err)?;

    // Uncertainty band: upper bound forward, lower bound back.
    let band: Vec<(i64, f64)> = xs
        .iter()
        .zip(frame.yhat_upper().iter())
        .map(|(x, y)| (*x, *y))
        .chain(
            xs.iter()
                .rev()
                .zip(frame.yhat_lower().iter().rev())
                .map(|(x, y)| (*x, *y)),
        )
        .collect();
    chart
        .draw_series(std::iter::once(Polygon::new(band, BLUE.mix(0.15))))
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            xs.iter().zip(frame.yhat().iter()).map(|(x, y)| (*x, *y)),
            &BLUE,
        ))
        .map_err(render_err)?
        .label("forecast")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLUE));

    chart
        .draw_series(
            series
                .iter()
                .map(|(t, v)| Circle::new((t.timestamp(), v), 2, BLACK.filled())),
        )
        .map_err(render_err)?
        .label("observed")
        .legend(|(x, y)| Circle::new((x + 6, y), 2, BLACK.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Render the decomposition view: trend, each seasonal component, and the
/// calendar-event effect in stacked subplots.
pub fn plot_components(frame: &ForecastFrame, path: impl AsRef<Path>) -> Result<()> {
    if frame.is_empty() {
        return Err(PipelineError::EmptyData);
    }

    let mut panels: Vec<(&str, &[f64])> = vec![("trend", frame.trend())];
    panels.extend(frame.seasonal_components());
    if let Some(events) = frame.event_effect() {
        panels.push(("events", events));
    }

    let xs: Vec<i64> = frame.timestamps().iter().map(|t| t.timestamp()).collect();
    let x_range = xs[0]..xs[xs.len() - 1];

    let height = 220 * panels.len() as u32;
    let root = BitMapBackend::new(path.as_ref(), (1024, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let areas = root.split_evenly((panels.len(), 1));
    for ((name, column), area) in panels.iter().zip(areas.iter()) {
        let (y_min, y_max) = padded_range(column.iter().copied());

        let mut chart = ChartBuilder::on(area)
            .caption(*name, ("sans-serif", 18))
            .margin(8)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_min..y_max)
            .map_err(render_err)?;

        chart.configure_mesh().draw().map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                xs.iter().zip(column.iter()).map(|(x, y)| (*x, *y)),
                &BLUE,
            ))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}
