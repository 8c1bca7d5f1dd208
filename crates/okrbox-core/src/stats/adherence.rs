//! Schedule adherence scoring for a single task.
//!
//! A task's plan window says how far along it should be at any given day
//! (time progress). Its self-reported completion says how far along it is
//! (actual progress). The adherence score compares the two:
//! - **On pace or ahead** (`actual >= expected`): flat 100
//! - **Behind**: `100 * (1 + delta)`, rounded, floored at 0, so a task a full
//!   window behind scores 0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::plan::ScoredTask;

/// Adherence of one task as of the evaluation instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceScore {
    /// 0 to 100, 100 meaning on pace or ahead
    pub score: u32,
    /// Fraction of the plan window elapsed (0.0 to 1.0)
    pub time_progress: f64,
    /// Normalized completion; may exceed 1.0 for malformed input
    pub actual_progress: f64,
    /// `actual_progress - time_progress`; negative means behind
    pub delta: f64,
}

impl AdherenceScore {
    /// Build a score from the two progress fractions.
    pub fn from_progress(time_progress: f64, actual_progress: f64) -> Self {
        let delta = actual_progress - time_progress;
        let score = if delta >= 0.0 {
            100
        } else {
            round_half_up(100.0 * (1.0 + delta)).clamp(0.0, 100.0) as u32
        };
        Self {
            score,
            time_progress,
            actual_progress,
            delta,
        }
    }

    pub fn is_behind(&self) -> bool {
        self.delta < 0.0
    }

    /// Lag behind the expected pace in whole percentage points.
    pub fn lag_percent(&self) -> i64 {
        percent(self.delta.abs())
    }

    pub fn time_percent(&self) -> i64 {
        percent(self.time_progress)
    }

    pub fn actual_percent(&self) -> i64 {
        percent(self.actual_progress)
    }
}

/// Scores tasks against their plan windows in one calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdherenceCalculator {
    calendar: Calendar,
}

impl AdherenceCalculator {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Score `task` as of `now`.
    ///
    /// # Returns
    /// * `None` if the task has no plan bound, its window is inverted, or a
    ///   bound is outside the representable range
    /// * otherwise the adherence score; a missing bound collapses onto the
    ///   present one, giving a same-day window
    pub fn score(&self, task: &ScoredTask, now: DateTime<Utc>) -> Option<AdherenceScore> {
        let (start, end) = self.plan_days(task)?;
        let duration = end - start;
        let today = self.calendar.day_stamp_of(now);

        let time_progress = if duration == 0 {
            1.0
        } else {
            ((today - start) as f64 / duration as f64).clamp(0.0, 1.0)
        };

        Some(AdherenceScore::from_progress(
            time_progress,
            task.actual_progress(),
        ))
    }

    /// Day stamps of the task's plan window, or `None` if unscoreable.
    pub fn plan_days(&self, task: &ScoredTask) -> Option<(i64, i64)> {
        let (raw_start, raw_end) = task.plan_bounds()?;
        let start = self.calendar.day_stamp(raw_start)?;
        let end = self.calendar.day_stamp(raw_end)?;
        (end >= start).then_some((start, end))
    }
}

/// Score a single task; shorthand for [`AdherenceCalculator::score`].
pub fn score_task(
    task: &ScoredTask,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> Option<AdherenceScore> {
    AdherenceCalculator::new(*calendar).score(task, now)
}

/// Round half toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn percent(fraction: f64) -> i64 {
    round_half_up(fraction * 100.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DAY_MS;
    use chrono::TimeZone;

    fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap()
    }

    fn days_after_day0(days: i64) -> i64 {
        day0().timestamp_millis() + days * DAY_MS
    }

    fn now_at(days: i64, hour: u32) -> DateTime<Utc> {
        day0() + chrono::Duration::days(days) + chrono::Duration::hours(hour as i64)
    }

    fn ten_day_task(progress: f64) -> ScoredTask {
        ScoredTask::new("A")
            .with_plan(Some(days_after_day0(0)), Some(days_after_day0(10)))
            .with_progress(progress)
    }

    fn calculator() -> AdherenceCalculator {
        AdherenceCalculator::new(Calendar::utc())
    }

    #[test]
    fn on_pace_at_midpoint_scores_100() {
        let result = calculator().score(&ten_day_task(0.5), now_at(5, 0)).unwrap();
        assert!((result.time_progress - 0.5).abs() < 1e-9);
        assert!(result.delta.abs() < 1e-9);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn behind_at_day_eight_scores_70() {
        let result = calculator().score(&ten_day_task(0.5), now_at(8, 0)).unwrap();
        assert!((result.time_progress - 0.8).abs() < 1e-9);
        assert_eq!(result.actual_progress, 0.5);
        assert!((result.delta + 0.3).abs() < 1e-9);
        assert_eq!(result.score, 70);
        assert_eq!(result.lag_percent(), 30);
        assert_eq!(result.time_percent(), 80);
        assert_eq!(result.actual_percent(), 50);
    }

    #[test]
    fn time_of_day_is_ignored() {
        let morning = calculator().score(&ten_day_task(0.5), now_at(8, 1)).unwrap();
        let evening = calculator().score(&ten_day_task(0.5), now_at(8, 23)).unwrap();
        assert_eq!(morning, evening);
    }

    #[test]
    fn percentage_and_fraction_encodings_agree() {
        let pct = calculator().score(&ten_day_task(90.0), now_at(6, 0)).unwrap();
        let frac = calculator().score(&ten_day_task(0.9), now_at(6, 0)).unwrap();
        assert_eq!(pct.score, frac.score);
        assert_eq!(pct.delta, frac.delta);
    }

    #[test]
    fn missing_both_bounds_is_unscoreable() {
        let task = ScoredTask::new("A").with_progress(0.5);
        assert_eq!(calculator().score(&task, now_at(1, 0)), None);
    }

    #[test]
    fn inverted_window_is_unscoreable() {
        let task = ScoredTask::new("A")
            .with_plan(Some(days_after_day0(5)), Some(days_after_day0(2)))
            .with_progress(1.0);
        assert_eq!(calculator().score(&task, now_at(6, 0)), None);
    }

    #[test]
    fn same_day_window_is_fully_elapsed() {
        let task = ScoredTask::new("A")
            .with_plan(Some(days_after_day0(3)), Some(days_after_day0(3) + 3_600_000))
            .with_progress(0.25);
        let result = calculator().score(&task, now_at(3, 12)).unwrap();
        assert_eq!(result.time_progress, 1.0);
        assert_eq!(result.score, 25);
    }

    #[test]
    fn single_bound_collapses_to_same_day_window() {
        let start_only = ScoredTask::new("A").with_plan(Some(days_after_day0(2)), None);
        let result = calculator().score(&start_only, now_at(4, 0)).unwrap();
        assert_eq!(result.time_progress, 1.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn before_start_time_progress_is_zero() {
        let result = calculator().score(&ten_day_task(0.0), now_at(-3, 0)).unwrap();
        assert_eq!(result.time_progress, 0.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn after_end_time_progress_is_clamped_to_one() {
        let result = calculator().score(&ten_day_task(0.2), now_at(40, 0)).unwrap();
        assert_eq!(result.time_progress, 1.0);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn absent_progress_counts_as_zero() {
        let task = ScoredTask::new("A").with_plan(Some(days_after_day0(0)), Some(days_after_day0(10)));
        let result = calculator().score(&task, now_at(10, 0)).unwrap();
        assert_eq!(result.actual_progress, 0.0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn oversized_progress_is_not_clamped() {
        // 250 reads as 2.5; the score is still a flat 100 but the raw
        // actual progress and delta are exposed as-is.
        let result = calculator().score(&ten_day_task(250.0), now_at(5, 0)).unwrap();
        assert_eq!(result.actual_progress, 2.5);
        assert!(result.delta > 1.0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn negative_score_floors_at_zero() {
        let score = AdherenceScore::from_progress(1.0, -0.5);
        assert_eq!(score.score, 0);
    }

    #[test]
    fn score_task_matches_calculator() {
        let cal = Calendar::utc();
        assert_eq!(
            score_task(&ten_day_task(0.5), now_at(8, 0), &cal),
            calculator().score(&ten_day_task(0.5), now_at(8, 0))
        );
    }

    #[test]
    fn score_respects_zone_for_day_boundaries() {
        // At UTC+8, 17:00 UTC on day 7 is already day 8 locally.
        let cal = Calendar::fixed_offset_minutes(8 * 60).unwrap();
        let task = ScoredTask::new("A")
            .with_plan(Some(days_after_day0(0)), Some(days_after_day0(10)))
            .with_progress(0.5);
        let local = AdherenceCalculator::new(cal).score(&task, now_at(7, 17)).unwrap();
        assert!((local.time_progress - 0.8).abs() < 1e-9);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(AdherenceScore::from_progress(0.8, 0.5)).unwrap();
        assert_eq!(json["score"], 70);
        assert!(json.get("timeProgress").is_some());
        assert!(json.get("actualProgress").is_some());
    }

    #[test]
    fn hair_behind_rounds_to_100_but_stays_behind() {
        let score = AdherenceScore::from_progress(0.504, 0.5);
        assert_eq!(score.score, 100);
        assert!(score.is_behind());
        assert_eq!(score.lag_percent(), 0);
    }
}
