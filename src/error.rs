//! Error types for the retailcast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur during ingest, fitting, extension or evaluation.
///
/// Every failure is terminal for the scenario it occurs in; there is no
/// retry logic anywhere in the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Underlying I/O failure while reading an input file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("missing column '{name}' in header")]
    MissingColumn { name: String },

    /// A timestamp field could not be parsed into a known format.
    #[error("row {row}: cannot parse timestamp '{value}'")]
    TimestampParse { row: usize, value: String },

    /// A value field is still non-numeric after sentinel repair.
    #[error("row {row}: non-numeric value '{value}'")]
    NonNumericValue { row: usize, value: String },

    /// A sentinel token appeared before any real observation existed to
    /// carry forward.
    #[error("row {row}: sentinel '{token}' has no preceding observation")]
    LeadingSentinel { row: usize, token: String },

    /// Timestamp ordering or arithmetic error.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid model or event-table configuration, surfaced at fit time.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No overlapping timestamps between forecast and actuals.
    #[error("no overlapping timestamps between forecast and actuals")]
    NoOverlap,

    /// Numerical failure (e.g. a singular design matrix).
    #[error("computation error: {0}")]
    Computation(String),

    /// Plot rendering failure.
    #[error("render error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = PipelineError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = PipelineError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(err.to_string(), "insufficient data: need at least 10, got 5");

        let err = PipelineError::MissingColumn {
            name: "sales".to_string(),
        };
        assert_eq!(err.to_string(), "missing column 'sales' in header");

        let err = PipelineError::LeadingSentinel {
            row: 1,
            token: ".".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "row 1: sentinel '.' has no preceding observation"
        );

        let err = PipelineError::NoOverlap;
        assert_eq!(
            err.to_string(),
            "no overlapping timestamps between forecast and actuals"
        );
    }
}
