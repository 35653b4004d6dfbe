//! Forecast frame: predictions with uncertainty bounds and decomposition.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};

/// A forecast over an extended timeline.
///
/// Each row carries the point estimate (`yhat`), lower/upper uncertainty
/// bounds, and the decomposition the additive model produced: the trend
/// component, one column per seasonal component, and the calendar-event
/// effect when an event table was configured.
#[derive(Debug, Clone)]
pub struct ForecastFrame {
    timestamps: Vec<DateTime<Utc>>,
    yhat: Vec<f64>,
    yhat_lower: Vec<f64>,
    yhat_upper: Vec<f64>,
    trend: Vec<f64>,
    seasonal: Vec<(String, Vec<f64>)>,
    events: Option<Vec<f64>>,
}

impl ForecastFrame {
    /// Assemble a frame, validating that every column matches the timeline.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        yhat: Vec<f64>,
        yhat_lower: Vec<f64>,
        yhat_upper: Vec<f64>,
        trend: Vec<f64>,
        seasonal: Vec<(String, Vec<f64>)>,
        events: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = timestamps.len();
        let check = |len: usize| -> Result<()> {
            if len != n {
                return Err(PipelineError::DimensionMismatch {
                    expected: n,
                    got: len,
                });
            }
            Ok(())
        };
        check(yhat.len())?;
        check(yhat_lower.len())?;
        check(yhat_upper.len())?;
        check(trend.len())?;
        for (_, column) in &seasonal {
            check(column.len())?;
        }
        if let Some(column) = &events {
            check(column.len())?;
        }
        Ok(Self {
            timestamps,
            yhat,
            yhat_lower,
            yhat_upper,
            trend,
            seasonal,
            events,
        })
    }

    /// Number of rows (historical plus future horizon).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get the timeline.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point estimates.
    pub fn yhat(&self) -> &[f64] {
        &self.yhat
    }

    /// Lower uncertainty bounds.
    pub fn yhat_lower(&self) -> &[f64] {
        &self.yhat_lower
    }

    /// Upper uncertainty bounds.
    pub fn yhat_upper(&self) -> &[f64] {
        &self.yhat_upper
    }

    /// Trend component (includes the fitted base level).
    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    /// Named seasonal components, in registration order.
    pub fn seasonal_components(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.seasonal
            .iter()
            .map(|(name, column)| (name.as_str(), column.as_slice()))
    }

    /// Look up one seasonal component by name.
    pub fn seasonal_component(&self, name: &str) -> Option<&[f64]> {
        self.seasonal
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column.as_slice())
    }

    /// Calendar-event effect, when an event table was configured.
    pub fn event_effect(&self) -> Option<&[f64]> {
        self.events.as_deref()
    }

    /// Point estimate at an exact timestamp.
    pub fn yhat_at(&self, timestamp: &DateTime<Utc>) -> Option<f64> {
        self.timestamps
            .binary_search(timestamp)
            .ok()
            .map(|i| self.yhat[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| {
                Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64)
            })
            .collect()
    }

    fn make_frame(n: usize) -> ForecastFrame {
        ForecastFrame::new(
            make_timestamps(n),
            vec![1.0; n],
            vec![0.5; n],
            vec![1.5; n],
            vec![1.0; n],
            vec![("yearly".to_string(), vec![0.0; n])],
            Some(vec![0.0; n]),
        )
        .unwrap()
    }

    #[test]
    fn frame_exposes_columns() {
        let frame = make_frame(5);

        assert_eq!(frame.len(), 5);
        assert!(!frame.is_empty());
        assert_eq!(frame.yhat(), &[1.0; 5]);
        assert_eq!(frame.yhat_lower(), &[0.5; 5]);
        assert_eq!(frame.yhat_upper(), &[1.5; 5]);
        assert_eq!(frame.trend(), &[1.0; 5]);
        assert_eq!(frame.seasonal_component("yearly"), Some([0.0; 5].as_slice()));
        assert!(frame.seasonal_component("weekly").is_none());
        assert!(frame.event_effect().is_some());
    }

    #[test]
    fn frame_rejects_ragged_columns() {
        let result = ForecastFrame::new(
            make_timestamps(3),
            vec![1.0; 3],
            vec![0.5; 2], // short
            vec![1.5; 3],
            vec![1.0; 3],
            vec![],
            None,
        );
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn frame_point_lookup_by_timestamp() {
        let frame = make_frame(4);
        let timestamps = make_timestamps(4);

        assert_eq!(frame.yhat_at(&timestamps[2]), Some(1.0));

        let missing = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(frame.yhat_at(&missing), None);
    }
}
