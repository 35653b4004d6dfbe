//! Design-matrix construction and the least-squares solver behind the
//! additive model.
//!
//! Columns are anchored to timestamps (fractional days since the training
//! origin), so the same construction evaluates cleanly at historical and
//! future timestamps alike.

use crate::calendar::{CalendarEventTable, Seasonality};
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use std::ops::Range;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A column-major design matrix with named column groups.
pub(crate) struct Design {
    /// Columns, intercept first.
    pub columns: Vec<Vec<f64>>,
    /// Intercept and linear-trend columns.
    pub trend: Range<usize>,
    /// Fourier column range per seasonal component, in registration order.
    pub seasonal: Vec<(String, Range<usize>)>,
    /// Indicator column range for calendar events, when configured.
    pub events: Option<Range<usize>>,
}

impl Design {
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Fractional days between `timestamp` and `origin`.
pub(crate) fn days_since(timestamp: &DateTime<Utc>, origin: &DateTime<Utc>) -> f64 {
    (*timestamp - *origin).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Build the additive design matrix at the given timestamps.
///
/// Column order is fixed: intercept, trend, then `2 * fourier_order`
/// cos/sin columns per seasonal component, then one indicator column per
/// distinct event name. Coefficients from `least_squares` line up with this
/// order, which is all the bookkeeping the decomposition needs.
pub(crate) fn build_design(
    timestamps: &[DateTime<Utc>],
    origin: &DateTime<Utc>,
    components: &[Seasonality],
    events: Option<&CalendarEventTable>,
) -> Design {
    let n = timestamps.len();
    let days: Vec<f64> = timestamps.iter().map(|t| days_since(t, origin)).collect();

    let mut columns: Vec<Vec<f64>> = Vec::new();
    columns.push(vec![1.0; n]);
    columns.push(days.clone());
    let trend = 0..2;

    let mut seasonal = Vec::with_capacity(components.len());
    for component in components {
        let start = columns.len();
        for k in 1..=component.fourier_order() {
            let freq = 2.0 * std::f64::consts::PI * k as f64 / component.period_days();
            columns.push(days.iter().map(|d| (freq * d).cos()).collect());
            columns.push(days.iter().map(|d| (freq * d).sin()).collect());
        }
        seasonal.push((component.name().to_string(), start..columns.len()));
    }

    let events = events.filter(|table| !table.is_empty()).map(|table| {
        let start = columns.len();
        for name in table.names() {
            columns.push(
                timestamps
                    .iter()
                    .map(|t| if table.is_active(name, t) { 1.0 } else { 0.0 })
                    .collect(),
            );
        }
        start..columns.len()
    });

    Design {
        columns,
        trend,
        seasonal,
        events,
    }
}

/// Solve the least-squares problem `y ~ columns` via the normal equations.
///
/// A small ridge term keeps the system positive definite when indicator
/// columns are sparse or harmonics are nearly collinear.
pub(crate) fn least_squares(columns: &[Vec<f64>], y: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    let k = columns.len();
    if n == 0 || k == 0 {
        return Err(PipelineError::EmptyData);
    }
    for column in columns {
        if column.len() != n {
            return Err(PipelineError::DimensionMismatch {
                expected: n,
                got: column.len(),
            });
        }
    }

    let mut xtx = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..=i {
            let dot: f64 = columns[i]
                .iter()
                .zip(columns[j].iter())
                .map(|(a, b)| a * b)
                .sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
    }
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += 1e-8;
    }

    let xty: Vec<f64> = columns
        .iter()
        .map(|column| column.iter().zip(y.iter()).map(|(a, b)| a * b).sum())
        .collect();

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        PipelineError::Computation("least squares failed: matrix not positive definite".into())
    })
}

/// Evaluate the fitted surface over a subset of columns.
pub(crate) fn linear_combination(
    columns: &[Vec<f64>],
    coefficients: &[f64],
    range: Range<usize>,
) -> Vec<f64> {
    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut out = vec![0.0; n];
    for idx in range {
        let coefficient = coefficients[idx];
        for (row, value) in columns[idx].iter().enumerate() {
            out[row] += coefficient * value;
        }
    }
    out
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
