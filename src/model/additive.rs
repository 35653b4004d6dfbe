//! Additive forecasting model: trend + seasonality + calendar effects.
//!
//! `AdditiveModel` is a plain configuration value; `fit` consumes a series
//! by reference and returns an immutable [`FittedModel`]. Re-fitting builds
//! a new fitted value, never mutates an old one. The decomposition is
//! ordinary least squares over a timestamp-anchored design matrix, so the
//! pipeline only ever talks to it through `fit` and `predict`.

use crate::calendar::{CalendarEventTable, Seasonality};
use crate::core::{ForecastFrame, Series};
use crate::error::{PipelineError, Result};
use crate::extend::{extend_timestamps, Frequency};
use crate::model::design::{build_design, least_squares, linear_combination};
use chrono::{DateTime, Utc};
use statrs::distribution::{ContinuousCDF, Normal};

/// Configuration for one fitting scenario.
///
/// Defaults mirror common practice for business series: yearly and weekly
/// components enabled at orders 10 and 3, an 80% uncertainty interval, no
/// calendar events. Disable a built-in component when the sampling cadence
/// cannot support it (e.g. weekly patterns in monthly data).
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    yearly: bool,
    weekly: bool,
    extra_seasonalities: Vec<Seasonality>,
    events: Option<CalendarEventTable>,
    interval_level: f64,
}

impl Default for AdditiveModel {
    fn default() -> Self {
        Self {
            yearly: true,
            weekly: true,
            extra_seasonalities: Vec::new(),
            events: None,
            interval_level: 0.80,
        }
    }
}

impl AdditiveModel {
    /// Create a model with default components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the built-in yearly component.
    pub fn yearly_seasonality(mut self, enabled: bool) -> Self {
        self.yearly = enabled;
        self
    }

    /// Toggle the built-in weekly component.
    pub fn weekly_seasonality(mut self, enabled: bool) -> Self {
        self.weekly = enabled;
        self
    }

    /// Register an additional named periodic component.
    pub fn with_seasonality(mut self, seasonality: Seasonality) -> Self {
        self.extra_seasonalities.push(seasonality);
        self
    }

    /// Register a calendar event table for this scenario.
    pub fn with_events(mut self, events: CalendarEventTable) -> Self {
        self.events = Some(events);
        self
    }

    /// Set the uncertainty interval level (e.g. 0.80 or 0.95).
    pub fn with_interval_level(mut self, level: f64) -> Self {
        self.interval_level = level;
        self
    }

    /// Resolve built-in and extra components, rejecting duplicates.
    fn resolved_components(&self) -> Result<Vec<Seasonality>> {
        let mut components = Vec::new();
        if self.yearly {
            components.push(Seasonality::yearly());
        }
        if self.weekly {
            components.push(Seasonality::weekly());
        }
        components.extend(self.extra_seasonalities.iter().cloned());

        for component in &components {
            component.validate()?;
        }
        for (i, a) in components.iter().enumerate() {
            if components[..i].iter().any(|b| b.name() == a.name()) {
                return Err(PipelineError::Config(format!(
                    "duplicate seasonality name '{}'",
                    a.name()
                )));
            }
        }
        Ok(components)
    }

    /// Fit the model over a series, returning immutable fitted state.
    pub fn fit(&self, series: &Series) -> Result<FittedModel> {
        if series.is_empty() {
            return Err(PipelineError::EmptyData);
        }
        if !(self.interval_level > 0.0 && self.interval_level < 1.0) {
            return Err(PipelineError::Config(format!(
                "interval level must be in (0, 1), got {}",
                self.interval_level
            )));
        }

        let components = self.resolved_components()?;
        if let Some(table) = &self.events {
            table.validate()?;
        }

        let origin = series.timestamps()[0];
        let design = build_design(
            series.timestamps(),
            &origin,
            &components,
            self.events.as_ref(),
        );

        let n = series.len();
        let k = design.num_columns();
        if n < k {
            return Err(PipelineError::InsufficientData { needed: k, got: n });
        }

        let coefficients = least_squares(&design.columns, series.values())?;
        let fitted = linear_combination(&design.columns, &coefficients, 0..k);
        let residuals: Vec<f64> = series
            .values()
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect();

        let dof = (n - k).max(1) as f64;
        let sigma = (residuals.iter().map(|r| r * r).sum::<f64>() / dof).sqrt();

        Ok(FittedModel {
            components,
            events: self.events.clone(),
            interval_level: self.interval_level,
            origin,
            coefficients,
            sigma,
            fitted,
            residuals,
            train_timestamps: series.timestamps().to_vec(),
        })
    }
}

/// Immutable fitted state: resolved components, learned coefficients and
/// the residual spread behind the uncertainty band.
#[derive(Debug, Clone)]
pub struct FittedModel {
    components: Vec<Seasonality>,
    events: Option<CalendarEventTable>,
    interval_level: f64,
    origin: DateTime<Utc>,
    coefficients: Vec<f64>,
    sigma: f64,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    train_timestamps: Vec<DateTime<Utc>>,
}

impl FittedModel {
    /// In-sample fitted values.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// In-sample residuals (actual - fitted).
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Residual standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Timestamps the model was trained on.
    pub fn train_timestamps(&self) -> &[DateTime<Utc>] {
        &self.train_timestamps
    }

    /// Names of the seasonal components in the decomposition.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Historical timestamps plus `horizon` future periods at `frequency`.
    pub fn make_future_timestamps(
        &self,
        horizon: usize,
        frequency: Frequency,
    ) -> Result<Vec<DateTime<Utc>>> {
        extend_timestamps(&self.train_timestamps, horizon, frequency)
    }

    /// Predict over an arbitrary timeline, emitting point estimates,
    /// uncertainty bounds and the component decomposition.
    pub fn predict(&self, timestamps: &[DateTime<Utc>]) -> Result<ForecastFrame> {
        if timestamps.is_empty() {
            return Err(PipelineError::EmptyData);
        }

        let design = build_design(
            timestamps,
            &self.origin,
            &self.components,
            self.events.as_ref(),
        );
        if design.num_columns() != self.coefficients.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: design.num_columns(),
            });
        }

        let yhat = linear_combination(&design.columns, &self.coefficients, 0..design.num_columns());
        let trend = linear_combination(&design.columns, &self.coefficients, design.trend.clone());
        let seasonal: Vec<(String, Vec<f64>)> = design
            .seasonal
            .iter()
            .map(|(name, range)| {
                (
                    name.clone(),
                    linear_combination(&design.columns, &self.coefficients, range.clone()),
                )
            })
            .collect();
        let events = design
            .events
            .as_ref()
            .map(|range| linear_combination(&design.columns, &self.coefficients, range.clone()));

        let z = normal_quantile(0.5 + self.interval_level / 2.0)?;
        let margin = z * self.sigma;
        let yhat_lower: Vec<f64> = yhat.iter().map(|v| v - margin).collect();
        let yhat_upper: Vec<f64> = yhat.iter().map(|v| v + margin).collect();

        ForecastFrame::new(
            timestamps.to_vec(),
            yhat,
            yhat_lower,
            yhat_upper,
            trend,
            seasonal,
            events,
        )
    }
}

fn normal_quantile(p: f64) -> Result<f64> {
    let standard_normal = Normal::new(0.0, 1.0)
        .map_err(|e| PipelineError::Computation(format!("normal distribution: {e}")))?;
    Ok(standard_normal.inverse_cdf(p))
}
