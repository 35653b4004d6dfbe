//! Scenario runner: one model configuration through the whole pipeline.
//!
//! A scenario couples a name with an `AdditiveModel` configuration and runs
//! fit, timeline extension, prediction and evaluation in sequence.
//! Scenarios are independent; a failure in one is terminal for that
//! scenario only, and callers may run different scenarios concurrently
//! since nothing here shares mutable state.

use crate::core::{ForecastFrame, Series};
use crate::error::Result;
use crate::evaluate::{evaluate, Evaluation};
use crate::extend::Frequency;
use crate::model::{AdditiveModel, FittedModel};

/// A named model configuration.
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    model: AdditiveModel,
}

/// Everything one scenario produced: the fitted state, the forecast over
/// the extended timeline, and in-sample accuracy against the actuals.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub fitted: FittedModel,
    pub forecast: ForecastFrame,
    pub evaluation: Evaluation,
}

impl Scenario {
    /// Couple a name with a model configuration.
    pub fn new(name: impl Into<String>, model: AdditiveModel) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model configuration this scenario fits.
    pub fn model(&self) -> &AdditiveModel {
        &self.model
    }

    /// Run the pipeline: fit, extend `horizon` periods at `frequency`,
    /// predict, and evaluate against the historical overlap.
    pub fn run(
        &self,
        series: &Series,
        horizon: usize,
        frequency: Frequency,
    ) -> Result<ScenarioOutcome> {
        let fitted = self.model.fit(series)?;
        let timeline = fitted.make_future_timestamps(horizon, frequency)?;
        let forecast = fitted.predict(&timeline)?;
        let evaluation = evaluate(&forecast, series)?;

        Ok(ScenarioOutcome {
            name: self.name.clone(),
            fitted,
            forecast,
            evaluation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Seasonality;
    use chrono::{Months, TimeZone, Utc};

    /// Two years of monthly data with a yearly swing.
    fn monthly_series() -> Series {
        let start = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..48)
            .map(|i| start.checked_add_months(Months::new(i)).unwrap())
            .collect();
        let values: Vec<f64> = (0..48)
            .map(|i| {
                200.0
                    + 2.0 * i as f64
                    + 15.0 * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin()
            })
            .collect();
        Series::new(timestamps, values).unwrap()
    }

    #[test]
    fn scenario_produces_forecast_and_evaluation() {
        let scenario = Scenario::new(
            "baseline",
            AdditiveModel::new().weekly_seasonality(false),
        );
        let series = monthly_series();

        let outcome = scenario.run(&series, 24, Frequency::Monthly).unwrap();

        assert_eq!(outcome.name, "baseline");
        assert_eq!(outcome.forecast.len(), 48 + 24);
        // Evaluation joins only rows with ground truth.
        assert_eq!(outcome.evaluation.frame.len(), 48);
        assert!(outcome.evaluation.metrics.r_squared > 0.9);
    }

    #[test]
    fn failing_scenario_does_not_poison_others() {
        let series = monthly_series();

        // Duplicate component name makes this configuration invalid.
        let broken = Scenario::new(
            "broken",
            AdditiveModel::new()
                .weekly_seasonality(false)
                .with_seasonality(Seasonality::new("yearly", 365.25, 4)),
        );
        assert!(broken.run(&series, 12, Frequency::Monthly).is_err());

        let healthy = Scenario::new(
            "healthy",
            AdditiveModel::new().weekly_seasonality(false),
        );
        assert!(healthy.run(&series, 12, Frequency::Monthly).is_ok());
    }
}
