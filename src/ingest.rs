//! Data loader: delimited files to a canonical `Series`.
//!
//! Input files carry domain-specific column names (a date label and a value
//! label); the loader renames them to the canonical (timestamp, value) pair
//! by selecting columns from the header row. A known data-quality defect is
//! repaired on the way in: a value field equal to a configured sentinel
//! token (a placeholder for a missing reading) is replaced with the
//! previous row's value before any numeric casting. The repair walks every
//! row, so no sentinel can survive ingest; a sentinel with no preceding
//! observation is a fatal error, as is any value that still fails to parse.

use crate::core::Series;
use crate::error::{PipelineError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Accepted date-only formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Configuration for loading one delimited file into a `Series`.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    timestamp_column: String,
    value_column: String,
    sentinel: Option<String>,
}

impl CsvSource {
    /// Describe a file whose `timestamp_column` and `value_column` map to
    /// the canonical schema.
    pub fn new(
        path: impl Into<PathBuf>,
        timestamp_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp_column: timestamp_column.into(),
            value_column: value_column.into(),
            sentinel: None,
        }
    }

    /// Register a sentinel token to repair via last observation carried
    /// forward.
    pub fn with_sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel = Some(token.into());
        self
    }

    /// File path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file into a `Series`.
    pub fn load(&self) -> Result<Series> {
        let file = File::open(&self.path)?;
        self.read_from(file)
    }

    /// Read a `Series` from any reader (the file body, without the path).
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Series> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let ts_idx = column_index(&headers, &self.timestamp_column)?;
        let value_idx = column_index(&headers, &self.value_column)?;

        let mut timestamps = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = i + 1;

            let raw_ts = record.get(ts_idx).unwrap_or("");
            let timestamp =
                parse_timestamp(raw_ts).ok_or_else(|| PipelineError::TimestampParse {
                    row,
                    value: raw_ts.to_string(),
                })?;

            let raw_value = record.get(value_idx).unwrap_or("");
            let value = match &self.sentinel {
                Some(token) if raw_value == token => {
                    // Last observation carried forward, applied before the
                    // numeric cast. The previous value is already repaired,
                    // so consecutive sentinels resolve to the last real one.
                    *values
                        .last()
                        .ok_or_else(|| PipelineError::LeadingSentinel {
                            row,
                            token: token.clone(),
                        })?
                }
                _ => raw_value
                    .parse::<f64>()
                    .map_err(|_| PipelineError::NonNumericValue {
                        row,
                        value: raw_value.to_string(),
                    })?,
            };

            timestamps.push(timestamp);
            values.push(value);
        }

        if timestamps.is_empty() {
            return Err(PipelineError::EmptyData);
        }

        Series::new(timestamps, values)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PipelineError::MissingColumn {
            name: name.to_string(),
        })
}

/// Parse a timestamp field into UTC.
///
/// Accepts a date-time (`%Y-%m-%d %H:%M:%S`), the common date layouts, and
/// month-precision labels (`%Y-%m`, anchored to the first of the month).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return midnight(date);
        }
    }
    // Month precision: anchor to the first day.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return midnight(date);
    }
    None
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}
