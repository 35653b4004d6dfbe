//! Scenario comparison: percentage difference between two forecasts.

use crate::core::ForecastFrame;
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};

/// Per-row and aggregate percentage difference between two forecasts
/// produced under different model configurations.
///
/// The per-row figure is `100 * (a - b) / b`, so `b` is the baseline.
/// Swapping the arguments changes the denominator; the result is not the
/// negation of the original. Rows where the baseline is exactly zero are
/// excluded from the mean and counted in `zero_baseline_rows` (division is
/// undefined there and the pipeline refuses to propagate a silent NaN).
#[derive(Debug, Clone)]
pub struct Comparison {
    timestamps: Vec<DateTime<Utc>>,
    pct_diff: Vec<f64>,
    mean_pct_diff: f64,
    zero_baseline_rows: usize,
}

impl Comparison {
    /// Timestamps the two forecasts share.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Per-row percentage difference, zero-baseline rows excluded.
    pub fn pct_diff(&self) -> &[f64] {
        &self.pct_diff
    }

    /// Mean percentage difference across the comparison window.
    pub fn mean_pct_diff(&self) -> f64 {
        self.mean_pct_diff
    }

    /// Joined rows dropped because the baseline was zero.
    pub fn zero_baseline_rows(&self) -> usize {
        self.zero_baseline_rows
    }
}

/// Compare forecast `a` against baseline forecast `b` on their shared
/// timestamps.
///
/// Fails with an alignment error when the frames share no timestamps, and
/// with a computation error when every shared row has a zero baseline.
pub fn compare(a: &ForecastFrame, b: &ForecastFrame) -> Result<Comparison> {
    let mut joined = 0usize;
    let mut zero_baseline_rows = 0usize;
    let mut timestamps = Vec::new();
    let mut pct_diff = Vec::new();

    for (i, ts) in a.timestamps().iter().enumerate() {
        let Some(baseline) = b.yhat_at(ts) else {
            continue;
        };
        joined += 1;
        if baseline == 0.0 {
            zero_baseline_rows += 1;
            continue;
        }
        timestamps.push(*ts);
        pct_diff.push(100.0 * (a.yhat()[i] - baseline) / baseline);
    }

    if joined == 0 {
        return Err(PipelineError::NoOverlap);
    }
    if pct_diff.is_empty() {
        return Err(PipelineError::Computation(
            "all shared rows have a zero baseline forecast".to_string(),
        ));
    }

    let mean_pct_diff = pct_diff.iter().sum::<f64>() / pct_diff.len() as f64;

    Ok(Comparison {
        timestamps,
        pct_diff,
        mean_pct_diff,
        zero_baseline_rows,
    })
}
