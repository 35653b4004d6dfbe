//! Series data structure for the raw time-indexed dataset.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};

/// An ordered sequence of (timestamp, value) observations.
///
/// Timestamps are strictly increasing; the ordering is a time axis, not an
/// arbitrary collection. Values are finite once the series has passed
/// ingest, but the type itself only enforces the timestamp invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl Series {
    /// Create a new series, validating the timestamp invariant.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        for pair in timestamps.windows(2) {
            if pair[1] <= pair[0] {
                return Err(PipelineError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last (most recent) timestamp, if any.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Look up the observed value at an exact timestamp.
    pub fn value_at(&self, timestamp: &DateTime<Utc>) -> Option<f64> {
        self.timestamps
            .binary_search(timestamp)
            .ok()
            .map(|i| self.values[i])
    }

    /// Iterate over (timestamp, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Extract a sub-range of the series.
    pub fn slice(&self, start: usize, end: usize) -> Result<Series> {
        if start > end || end > self.len() {
            return Err(PipelineError::Config(format!(
                "invalid slice range {}..{} for series of length {}",
                start,
                end,
                self.len()
            )));
        }
        Ok(Series {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| {
                Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64)
            })
            .collect()
    }

    #[test]
    fn series_constructs_and_exposes_observations() {
        let timestamps = make_timestamps(4);
        let values = vec![10.0, 11.0, 12.0, 13.0];

        let series = Series::new(timestamps.clone(), values.clone()).unwrap();

        assert_eq!(series.len(), 4);
        assert!(!series.is_empty());
        assert_eq!(series.timestamps(), &timestamps);
        assert_eq!(series.values(), &values);
        assert_eq!(series.last_timestamp(), Some(timestamps[3]));
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let timestamps = make_timestamps(3);
        let result = Series::new(timestamps, vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn series_rejects_non_increasing_timestamps() {
        let mut timestamps = make_timestamps(3);
        timestamps[2] = timestamps[1]; // duplicate
        let result = Series::new(timestamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(PipelineError::Timestamp(_))));

        let mut timestamps = make_timestamps(3);
        timestamps.swap(1, 2); // goes backward
        let result = Series::new(timestamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(PipelineError::Timestamp(_))));
    }

    #[test]
    fn series_value_lookup_by_timestamp() {
        let timestamps = make_timestamps(3);
        let series = Series::new(timestamps.clone(), vec![5.0, 6.0, 7.0]).unwrap();

        assert_eq!(series.value_at(&timestamps[1]), Some(6.0));

        let missing = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(series.value_at(&missing), None);
    }

    #[test]
    fn series_slice_bounds_are_checked() {
        let series = Series::new(make_timestamps(5), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let sliced = series.slice(1, 4).unwrap();
        assert_eq!(sliced.len(), 3);
        assert_eq!(sliced.values(), &[2.0, 3.0, 4.0]);

        assert!(series.slice(4, 2).is_err());
        assert!(series.slice(0, 6).is_err());
    }
}
