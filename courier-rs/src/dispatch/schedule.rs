//! Periodic drain schedule
//!
//! Cron expression format (seconds first):
//! ```text
//! sec   min   hour   day_of_month   month   day_of_week   [year]
//! */10  *     *      *              *       *
//! ```
//! Classic five-field expressions (`min hour dom month dow`) are accepted
//! too and fire at second 0.

use crate::error::{CourierError, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Fallback used when the configured expression is invalid: every 10 seconds
pub const DEFAULT_SCHEDULE: &str = "*/10 * * * * *";

/// Validated cron schedule for the periodic drain
#[derive(Debug, Clone)]
pub struct DrainSchedule {
    expression: String,
    schedule: Schedule,
}

impl DrainSchedule {
    /// Parse and validate an expression
    ///
    /// # Errors
    /// [`CourierError::InvalidSchedule`] when the expression does not parse
    /// or never fires.
    pub fn parse(expression: &str) -> Result<Self> {
        let normalized = normalize(expression);
        let schedule = Schedule::from_str(&normalized)
            .map_err(|e| CourierError::InvalidSchedule(format!("'{}': {}", expression, e)))?;

        if schedule.upcoming(Utc).next().is_none() {
            return Err(CourierError::InvalidSchedule(format!(
                "'{}' will never fire",
                expression
            )));
        }

        Ok(Self {
            expression: normalized,
            schedule,
        })
    }

    /// Parse `expression`, falling back to [`DEFAULT_SCHEDULE`] when invalid
    pub fn parse_or_default(expression: &str) -> Self {
        Self::parse(expression).unwrap_or_else(|e| {
            warn!("{}; falling back to '{}'", e, DEFAULT_SCHEDULE);
            Self::default()
        })
    }

    /// The expression as scheduled, five-field input gains its seconds column
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First firing strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Time to wait from `now` until the next firing
    pub fn delay_until_next(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_after(now)
            .map(|next| (next - now).to_std().unwrap_or(Duration::ZERO))
    }
}

impl Default for DrainSchedule {
    fn default() -> Self {
        Self {
            expression: DEFAULT_SCHEDULE.to_string(),
            schedule: Schedule::from_str(DEFAULT_SCHEDULE).expect("default schedule is valid"),
        }
    }
}

fn normalize(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() == 5 {
        format!("0 {}", fields.join(" "))
    } else {
        fields.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(DrainSchedule::parse(DEFAULT_SCHEDULE).is_ok());
        assert_eq!(DrainSchedule::default().expression(), DEFAULT_SCHEDULE);
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(DrainSchedule::parse("").is_err());
        assert!(DrainSchedule::parse("every ten seconds").is_err());
        assert!(DrainSchedule::parse("61 * * * * *").is_err());
        assert!(matches!(
            DrainSchedule::parse("* *"),
            Err(CourierError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_never_firing_schedule_is_invalid() {
        assert!(DrainSchedule::parse("0 0 0 1 1 * 2001").is_err());
    }

    #[test]
    fn test_invalid_falls_back_to_default() {
        let schedule = DrainSchedule::parse_or_default("not a cron");
        assert_eq!(schedule.expression(), DEFAULT_SCHEDULE);
    }

    #[test]
    fn test_valid_expression_is_kept() {
        let schedule = DrainSchedule::parse_or_default(" */30 * * * * * ");
        assert_eq!(schedule.expression(), "*/30 * * * * *");
    }

    #[test]
    fn test_five_field_expression() {
        let schedule = DrainSchedule::parse("*/5 * * * *").unwrap();
        assert_eq!(schedule.expression(), "0 */5 * * * *");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 1, 30).unwrap();

        assert_eq!(
            schedule.next_after(now),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap())
        );
    }

    #[test]
    fn test_delay_until_next() {
        let schedule = DrainSchedule::default();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 3).unwrap();

        assert_eq!(schedule.delay_until_next(now), Some(Duration::from_secs(7)));
    }
}
