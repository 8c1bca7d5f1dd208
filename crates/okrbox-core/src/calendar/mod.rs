//! Calendar-day arithmetic in a configurable time zone.
//!
//! All date-only comparisons in okrbox go through [`Calendar::day_stamp`]:
//! an epoch-millisecond timestamp is mapped to the epoch-millisecond value of
//! local midnight on the same calendar day. Two instants on the same local day
//! always produce the same stamp, so time of day never leaks into scoring.

mod window;

pub use window::{plan_week_label, ReportWindow};

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

use crate::error::ValidationError;

/// Milliseconds in one civil day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Whole days elapsed from `since_ms` to `at`, floored.
///
/// This is an absolute-time difference, not a calendar-day difference.
pub fn whole_days_since(since_ms: i64, at: DateTime<Utc>) -> i64 {
    (at.timestamp_millis() - since_ms).div_euclid(DAY_MS)
}

/// Largest offset accepted by [`Calendar::fixed_offset_minutes`].
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Time zone a [`Calendar`] resolves local days in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The ambient system time zone.
    Local,
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

/// Day and window boundaries in one time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    zone: Zone,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::local()
    }
}

impl Calendar {
    /// Calendar in the ambient local time zone.
    pub fn local() -> Self {
        Self { zone: Zone::Local }
    }

    /// Calendar in UTC.
    pub fn utc() -> Self {
        Self {
            zone: Zone::Fixed(Utc.fix()),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(offset),
        }
    }

    /// Calendar at a fixed offset east of UTC, in minutes.
    pub fn fixed_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidOffset { minutes });
        }
        FixedOffset::east_opt(minutes * 60)
            .map(Self::with_offset)
            .ok_or(ValidationError::InvalidOffset { minutes })
    }

    /// Build from an optional configured offset; `None` means local time.
    pub fn from_offset_setting(minutes: Option<i32>) -> Result<Self, ValidationError> {
        match minutes {
            Some(m) => Self::fixed_offset_minutes(m),
            None => Ok(Self::local()),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Calendar date of `at` in this zone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        match self.zone {
            Zone::Local => at.with_timezone(&Local).date_naive(),
            Zone::Fixed(offset) => at.with_timezone(&offset).date_naive(),
        }
    }

    /// Local midnight of the day containing `ts_ms`.
    ///
    /// Returns `None` only when `ts_ms` lies outside chrono's representable
    /// range.
    pub fn day_stamp(&self, ts_ms: i64) -> Option<i64> {
        let at = Utc.timestamp_millis_opt(ts_ms).single()?;
        Some(self.day_stamp_of(at))
    }

    /// Local midnight of the day containing `at`.
    pub fn day_stamp_of(&self, at: DateTime<Utc>) -> i64 {
        self.midnight(self.local_date(at))
    }

    /// Local midnight of the Monday on or before `at`.
    pub fn week_start(&self, at: DateTime<Utc>) -> i64 {
        let date = self.local_date(at);
        let back = u64::from(date.weekday().num_days_from_monday());
        self.midnight(date.checked_sub_days(Days::new(back)).unwrap_or(date))
    }

    /// Local midnight of the first day of `at`'s month.
    pub fn month_start(&self, at: DateTime<Utc>) -> i64 {
        let date = self.local_date(at);
        self.midnight(date.with_day(1).unwrap_or(date))
    }

    /// Local midnight of the first day of `at`'s quarter (Jan, Apr, Jul, Oct).
    pub fn quarter_start(&self, at: DateTime<Utc>) -> i64 {
        let date = self.local_date(at);
        let first_month = (date.month0() / 3) * 3 + 1;
        let first = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
        self.midnight(first)
    }

    /// Start of the reporting window containing `at`.
    pub fn window_start(&self, window: ReportWindow, at: DateTime<Utc>) -> i64 {
        match window {
            ReportWindow::Week => self.week_start(at),
            ReportWindow::Month => self.month_start(at),
            ReportWindow::Quarter => self.quarter_start(at),
        }
    }

    /// `第NN周` label for the local day containing `ts_ms`.
    pub fn plan_week_label(&self, ts_ms: i64) -> Option<String> {
        let at = Utc.timestamp_millis_opt(ts_ms).single()?;
        Some(plan_week_label(self.local_date(at)))
    }

    fn resolve(&self, naive: &NaiveDateTime) -> Option<i64> {
        match self.zone {
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.timestamp_millis()),
            Zone::Fixed(offset) => offset
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    fn midnight(&self, date: NaiveDate) -> i64 {
        let naive = date.and_time(NaiveTime::MIN);
        // A DST transition can skip local midnight; use the first valid hour.
        (0..24i64)
            .find_map(|hour| self.resolve(&(naive + Duration::hours(hour))))
            .unwrap_or_else(|| naive.and_utc().timestamp_millis())
    }
}
