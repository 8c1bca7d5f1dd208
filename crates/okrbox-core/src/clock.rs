//! Source of the evaluation instant.
//!
//! Every scoring function takes `now` explicitly; callers obtain it from a
//! [`Clock`] so tests can pin it with [`FixedClock`].

use chrono::{DateTime, TimeZone, Utc};

use crate::error::ValidationError;

/// Provides the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Pin the clock to an epoch-millisecond timestamp.
    pub fn from_millis(ms: i64) -> Result<Self, ValidationError> {
        Utc.timestamp_millis_opt(ms)
            .single()
            .map(Self)
            .ok_or(ValidationError::TimestampOutOfRange(ms))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse an instant given either as RFC 3339 or as epoch milliseconds.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = input.trim();
    if let Ok(ms) = trimmed.parse::<i64>() {
        return FixedClock::from_millis(ms).map(|c| c.0);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidInstant(input.to_string()))
}
