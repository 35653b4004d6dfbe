//! # retailcast
//!
//! An additive time series forecasting pipeline: load a univariate series
//! from a delimited file, fit a trend + seasonality + calendar-event model,
//! extend the timeline into the future, and evaluate the forecast against
//! held-out actuals.
//!
//! The pipeline is a linear sequence of pure transformations; each stage
//! consumes the previous stage's output and scenarios (alternative model
//! configurations) are fully independent of one another.

pub mod calendar;
pub mod compare;
pub mod core;
pub mod error;
pub mod evaluate;
pub mod extend;
pub mod ingest;
pub mod model;
pub mod render;
pub mod scenario;

pub use error::{PipelineError, Result};

pub mod prelude {
    pub use crate::calendar::{CalendarEvent, CalendarEventTable, Seasonality};
    pub use crate::compare::{compare, Comparison};
    pub use crate::core::{ForecastFrame, Series};
    pub use crate::error::{PipelineError, Result};
    pub use crate::evaluate::{evaluate, AccuracyMetrics, Evaluation, EvaluationFrame};
    pub use crate::extend::{extend_timestamps, Frequency};
    pub use crate::ingest::CsvSource;
    pub use crate::model::{AdditiveModel, FittedModel};
    pub use crate::scenario::{Scenario, ScenarioOutcome};
}
