//! Forecast extender: historical timestamps plus a future horizon.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Duration, Months, Utc};

/// Spacing of appended future timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The timestamp `steps` periods after `origin`.
    ///
    /// Month and year steps use calendar arithmetic anchored at `origin`
    /// rather than repeated fixed durations, so a month-end origin does not
    /// drift toward shorter months as the horizon grows.
    fn advance(&self, origin: DateTime<Utc>, steps: u32) -> Result<DateTime<Utc>> {
        let stepped = match self {
            Frequency::Daily => origin.checked_add_signed(Duration::days(steps as i64)),
            Frequency::Weekly => origin.checked_add_signed(Duration::days(7 * steps as i64)),
            Frequency::Monthly => origin.checked_add_months(Months::new(steps)),
            Frequency::Yearly => origin.checked_add_months(Months::new(12 * steps)),
        };
        stepped.ok_or_else(|| {
            PipelineError::Timestamp(format!(
                "timestamp overflow stepping {steps} {self:?} periods from {origin}"
            ))
        })
    }
}

/// `horizon` future timestamps at `frequency`, starting one period after
/// `last`.
pub fn future_timestamps(
    last: DateTime<Utc>,
    horizon: usize,
    frequency: Frequency,
) -> Result<Vec<DateTime<Utc>>> {
    let mut future = Vec::with_capacity(horizon);
    for step in 1..=horizon {
        future.push(frequency.advance(last, step as u32)?);
    }
    Ok(future)
}

/// The union of `history` and `horizon` appended future timestamps.
///
/// Output length is `history.len() + horizon`; the first appended timestamp
/// is strictly later than the last historical one, and no historical
/// timestamp is duplicated.
pub fn extend_timestamps(
    history: &[DateTime<Utc>],
    horizon: usize,
    frequency: Frequency,
) -> Result<Vec<DateTime<Utc>>> {
    let last = *history.last().ok_or(PipelineError::EmptyData)?;

    let mut extended = history.to_vec();
    extended.extend(future_timestamps(last, horizon, frequency)?);
    Ok(extended)
}
