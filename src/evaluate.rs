//! Forecast evaluation against held-out actuals.
//!
//! The evaluation frame is the inner join of a forecast frame and the
//! original series on the timestamp key; rows without a finite actual are
//! dropped (pure-future rows have no ground truth). Metrics are
//! reporting-only outputs; the pipeline enforces no pass/fail threshold.

use crate::core::{ForecastFrame, Series};
use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};

/// Joined (actual, predicted) rows with known ground truth.
#[derive(Debug, Clone)]
pub struct EvaluationFrame {
    timestamps: Vec<DateTime<Utc>>,
    actual: Vec<f64>,
    predicted: Vec<f64>,
}

impl EvaluationFrame {
    /// Number of joined rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps with ground truth.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Observed values.
    pub fn actual(&self) -> &[f64] {
        &self.actual
    }

    /// Forecast point estimates at the same timestamps.
    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }
}

/// Accuracy metrics over an evaluation frame.
#[derive(Debug, Clone)]
pub struct AccuracyMetrics {
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
    /// Mean absolute percentage error (None if any actual is zero).
    pub mape: Option<f64>,
}

/// An evaluation frame together with its metrics.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub frame: EvaluationFrame,
    pub metrics: AccuracyMetrics,
}

/// Inner-join a forecast frame to the original series on timestamp.
///
/// Rows whose actual value is not finite are dropped. Zero overlap is an
/// explicit alignment error, never a degenerate metric.
pub fn align(frame: &ForecastFrame, series: &Series) -> Result<EvaluationFrame> {
    let mut timestamps = Vec::new();
    let mut actual = Vec::new();
    let mut predicted = Vec::new();

    // Both timelines are sorted, so a single merge pass joins them.
    let mut series_iter = series.iter().peekable();
    for (i, ts) in frame.timestamps().iter().enumerate() {
        while let Some((s_ts, _)) = series_iter.peek() {
            if s_ts < ts {
                series_iter.next();
            } else {
                break;
            }
        }
        if let Some(&(s_ts, value)) = series_iter.peek() {
            if s_ts == *ts && value.is_finite() {
                timestamps.push(*ts);
                actual.push(value);
                predicted.push(frame.yhat()[i]);
            }
        }
    }

    if timestamps.is_empty() {
        return Err(PipelineError::NoOverlap);
    }

    Ok(EvaluationFrame {
        timestamps,
        actual,
        predicted,
    })
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(PipelineError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    let rmse = mse.sqrt();

    let mape = if actual.contains(&0.0) {
        None
    } else {
        let sum: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| ((a - p) / a).abs())
            .sum();
        Some(100.0 * sum / n)
    };

    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(AccuracyMetrics {
        r_squared,
        mse,
        rmse,
        mae,
        mape,
    })
}

/// Join and score a forecast against the observed series.
pub fn evaluate(frame: &ForecastFrame, series: &Series) -> Result<Evaluation> {
    let frame = align(frame, series)?;
    let metrics = calculate_metrics(frame.actual(), frame.predicted())?;
    Ok(Evaluation { frame, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn daily_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| day(2020, 1, 1) + chrono::Duration::days(i as i64))
            .collect()
    }

    fn frame_over(timestamps: Vec<DateTime<Utc>>, yhat: Vec<f64>) -> ForecastFrame {
        let n = timestamps.len();
        ForecastFrame::new(
            timestamps,
            yhat.clone(),
            yhat.iter().map(|v| v - 1.0).collect(),
            yhat.iter().map(|v| v + 1.0).collect(),
            vec![0.0; n],
            vec![],
            None,
        )
        .unwrap()
    }

    #[test]
    fn align_drops_pure_future_rows() {
        // 10 observed points, frame extends 24 rows past them.
        let history = daily_timestamps(10);
        let series = Series::new(history.clone(), (0..10).map(|i| i as f64).collect()).unwrap();

        let extended = daily_timestamps(34);
        let frame = frame_over(extended, (0..34).map(|i| i as f64 + 0.5).collect());

        let joined = align(&frame, &series).unwrap();

        assert_eq!(joined.len(), series.len());
        assert_eq!(joined.actual(), series.values());
        assert_relative_eq!(joined.predicted()[3], 3.5);
    }

    #[test]
    fn align_skips_non_finite_actuals() {
        let history = daily_timestamps(4);
        let series =
            Series::new(history.clone(), vec![1.0, f64::NAN, 3.0, 4.0]).unwrap();
        let frame = frame_over(history, vec![1.0, 2.0, 3.0, 4.0]);

        let joined = align(&frame, &series).unwrap();

        assert_eq!(joined.len(), 3);
        assert_eq!(joined.actual(), &[1.0, 3.0, 4.0]);
    }

    #[test]
    fn align_with_zero_overlap_is_an_error() {
        let series = Series::new(daily_timestamps(5), vec![1.0; 5]).unwrap();

        // Frame entirely in the future of the observed range.
        let future: Vec<_> = (100..110)
            .map(|i| day(2020, 1, 1) + chrono::Duration::days(i))
            .collect();
        let frame = frame_over(future, vec![2.0; 10]);

        assert!(matches!(
            align(&frame, &series),
            Err(PipelineError::NoOverlap)
        ));
    }

    #[test]
    fn metrics_on_perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();

        assert_relative_eq!(metrics.mae, 0.0);
        assert_relative_eq!(metrics.mse, 0.0);
        assert_relative_eq!(metrics.rmse, 0.0);
        assert_relative_eq!(metrics.r_squared, 1.0);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0);
    }

    #[test]
    fn metrics_on_known_errors() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = vec![1.5, 2.5, 2.5, 4.5, 4.5];

        let metrics = calculate_metrics(&actual, &predicted).unwrap();

        assert_relative_eq!(metrics.mae, 0.5, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 0.25, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn mape_is_undefined_when_actuals_contain_zero() {
        let actual = vec![0.0, 1.0, 2.0];
        let predicted = vec![0.1, 1.1, 2.1];

        let metrics = calculate_metrics(&actual, &predicted).unwrap();
        assert!(metrics.mape.is_none());
    }

    #[test]
    fn r_squared_negative_for_poor_model() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = vec![5.0, 4.0, 3.0, 2.0, 1.0];

        let metrics = calculate_metrics(&actual, &predicted).unwrap();
        assert!(metrics.r_squared < 0.0);
    }

    #[test]
    fn metrics_validate_input() {
        assert!(matches!(
            calculate_metrics(&[], &[]),
            Err(PipelineError::EmptyData)
        ));
        assert!(matches!(
            calculate_metrics(&[1.0, 2.0], &[1.0]),
            Err(PipelineError::DimensionMismatch { .. })
        ));
    }
}
