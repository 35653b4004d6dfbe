//! Calendar-event tables and seasonal component declarations.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Duration, Utc};

/// A dated event with a window of influence, measured in day offsets.
///
/// The model attributes a distinct, non-seasonal effect to every date in
/// `[date + lower_window, date + upper_window]` instead of folding the
/// anomaly into the learned trend or seasonality.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    name: String,
    date: DateTime<Utc>,
    lower_window: i64,
    upper_window: i64,
}

impl CalendarEvent {
    /// Create an event with explicit day-offset windows.
    pub fn new(
        name: impl Into<String>,
        date: DateTime<Utc>,
        lower_window: i64,
        upper_window: i64,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            lower_window,
            upper_window,
        }
    }

    /// Create an event whose effect applies to the listed date only.
    pub fn on_date(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(name, date, 0, 0)
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event date.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Whether the window of this event covers `timestamp` (day precision).
    pub fn covers(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        let start = (self.date + Duration::days(self.lower_window)).date_naive();
        let end = (self.date + Duration::days(self.upper_window)).date_naive();
        day >= start && day <= end
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::Config(
                "calendar event has an empty name".to_string(),
            ));
        }
        if self.lower_window > self.upper_window {
            return Err(PipelineError::Config(format!(
                "event '{}': lower window {} exceeds upper window {}",
                self.name, self.lower_window, self.upper_window
            )));
        }
        Ok(())
    }
}

/// An immutable set of calendar events, built once per scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEventTable {
    events: Vec<CalendarEvent>,
}

impl CalendarEventTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event, builder style.
    pub fn with_event(mut self, event: CalendarEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Build a table from a list of events.
    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    /// All events.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Check if the table holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct event names, in first-appearance order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for event in &self.events {
            if !names.contains(&event.name.as_str()) {
                names.push(event.name.as_str());
            }
        }
        names
    }

    /// Whether any event with `name` covers `timestamp`.
    pub fn is_active(&self, name: &str, timestamp: &DateTime<Utc>) -> bool {
        self.events
            .iter()
            .any(|e| e.name == name && e.covers(timestamp))
    }

    /// Validate every event; surfaced at fit time.
    pub fn validate(&self) -> Result<()> {
        for event in &self.events {
            event.validate()?;
        }
        Ok(())
    }
}

/// A named periodic component: period length in days and the harmonic
/// order controlling decomposition smoothness.
#[derive(Debug, Clone, PartialEq)]
pub struct Seasonality {
    name: String,
    period_days: f64,
    fourier_order: usize,
}

impl Seasonality {
    /// Declare a periodic component.
    pub fn new(name: impl Into<String>, period_days: f64, fourier_order: usize) -> Self {
        Self {
            name: name.into(),
            period_days,
            fourier_order,
        }
    }

    /// The default yearly component.
    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    /// The default weekly component.
    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    /// A monthly component suitable for month-cadence retail data.
    pub fn monthly() -> Self {
        Self::new("monthly", 30.5, 5)
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Period length in days.
    pub fn period_days(&self) -> f64 {
        self.period_days
    }

    /// Number of Fourier harmonics.
    pub fn fourier_order(&self) -> usize {
        self.fourier_order
    }

    /// Validate the declaration; surfaced at fit time.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::Config(
                "seasonality has an empty name".to_string(),
            ));
        }
        if !self.period_days.is_finite() || self.period_days <= 0.0 {
            return Err(PipelineError::Config(format!(
                "seasonality '{}': period must be positive, got {}",
                self.name, self.period_days
            )));
        }
        if self.fourier_order == 0 {
            return Err(PipelineError::Config(format!(
                "seasonality '{}': fourier order must be at least 1",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn event_window_covers_day_range() {
        let event = CalendarEvent::new("promo", day(2020, 6, 15), -1, 2);

        assert!(!event.covers(&day(2020, 6, 13)));
        assert!(event.covers(&day(2020, 6, 14)));
        assert!(event.covers(&day(2020, 6, 15)));
        assert!(event.covers(&day(2020, 6, 17)));
        assert!(!event.covers(&day(2020, 6, 18)));
    }

    #[test]
    fn zero_window_event_covers_only_its_date() {
        let event = CalendarEvent::on_date("outage", day(2020, 3, 1));

        assert!(event.covers(&day(2020, 3, 1)));
        assert!(!event.covers(&day(2020, 2, 29)));
        assert!(!event.covers(&day(2020, 3, 2)));
    }

    #[test]
    fn table_collects_distinct_names_in_order() {
        let table = CalendarEventTable::new()
            .with_event(CalendarEvent::on_date("promo", day(2020, 1, 1)))
            .with_event(CalendarEvent::on_date("outage", day(2020, 2, 1)))
            .with_event(CalendarEvent::on_date("promo", day(2020, 3, 1)));

        assert_eq!(table.names(), vec!["promo", "outage"]);
        assert!(table.is_active("promo", &day(2020, 3, 1)));
        assert!(!table.is_active("outage", &day(2020, 3, 1)));
    }

    #[test]
    fn table_validation_rejects_bad_events() {
        let inverted = CalendarEventTable::new()
            .with_event(CalendarEvent::new("promo", day(2020, 1, 1), 1, -1));
        assert!(matches!(inverted.validate(), Err(PipelineError::Config(_))));

        let unnamed =
            CalendarEventTable::new().with_event(CalendarEvent::on_date("  ", day(2020, 1, 1)));
        assert!(matches!(unnamed.validate(), Err(PipelineError::Config(_))));

        let ok = CalendarEventTable::new()
            .with_event(CalendarEvent::on_date("promo", day(2020, 1, 1)));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn seasonality_validation() {
        assert!(Seasonality::yearly().validate().is_ok());
        assert!(Seasonality::weekly().validate().is_ok());
        assert!(Seasonality::monthly().validate().is_ok());

        let zero_period = Seasonality::new("bad", 0.0, 3);
        assert!(matches!(
            zero_period.validate(),
            Err(PipelineError::Config(_))
        ));

        let zero_order = Seasonality::new("bad", 12.0, 0);
        assert!(matches!(
            zero_order.validate(),
            Err(PipelineError::Config(_))
        ));
    }
}
