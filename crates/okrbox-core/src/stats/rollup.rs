//! Rollup of adherence scores over reporting windows.
//!
//! A window summary averages the scores of every task whose plan window
//! overlaps `[window_start, today]` and lists the worst offenders as
//! human-readable reasons. The lagging diagnostic ignores windows entirely and
//! lists every started task that is behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::adherence::{round_half_up, AdherenceCalculator, AdherenceScore};
use crate::calendar::{Calendar, ReportWindow};
use crate::plan::ScoredTask;

/// Reason reported when no task overlaps the window.
pub const NO_STARTED_TASKS_REASON: &str = "no started tasks; default to 100";
/// Reason reported when tasks overlap the window but none is behind.
pub const NO_DEDUCTIONS_REASON: &str = "no deductions; every task is on pace";

pub const DEFAULT_REASON_LIMIT: usize = 5;
pub const DEFAULT_LAGGING_LIMIT: usize = 10;

/// A task that is behind schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deduction {
    pub title: String,
    pub adherence: AdherenceScore,
}

impl fmt::Display for Deduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "《{}》落后 {}%（时间 {}%，实际 {}%）",
            self.title,
            self.adherence.lag_percent(),
            self.adherence.time_percent(),
            self.adherence.actual_percent()
        )
    }
}

/// Aggregate adherence for one reporting window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Rounded mean of per-task scores (0 to 100)
    pub score: u32,
    /// Worst offenders, most behind first, or a single placeholder
    pub reasons: Vec<String>,
}

impl WindowSummary {
    /// Summary of a window with no in-flight work.
    pub fn no_started_tasks() -> Self {
        Self {
            score: 100,
            reasons: vec![NO_STARTED_TASKS_REASON.to_string()],
        }
    }
}

/// Summary of one window together with where it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRollup {
    pub window: ReportWindow,
    /// Local midnight the window starts at, epoch ms
    pub window_start: i64,
    #[serde(flatten)]
    pub summary: WindowSummary,
}

/// Week, month and quarter rollups plus the lagging list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupReport {
    pub evaluated_at: DateTime<Utc>,
    pub week: WindowRollup,
    pub month: WindowRollup,
    pub quarter: WindowRollup,
    pub lagging: Vec<String>,
}

/// Aggregates task adherence over reporting windows.
#[derive(Debug, Clone)]
pub struct RollupAnalyzer {
    calculator: AdherenceCalculator,
    /// Max reasons in a window summary
    pub reason_limit: usize,
    /// Max entries in the lagging list
    pub lagging_limit: usize,
}

impl Default for RollupAnalyzer {
    fn default() -> Self {
        Self::new(Calendar::default())
    }
}

impl RollupAnalyzer {
    /// Create an analyzer with default limits
    pub fn new(calendar: Calendar) -> Self {
        Self::with_limits(calendar, DEFAULT_REASON_LIMIT, DEFAULT_LAGGING_LIMIT)
    }

    /// Create an analyzer with custom limits
    pub fn with_limits(calendar: Calendar, reason_limit: usize, lagging_limit: usize) -> Self {
        Self {
            calculator: AdherenceCalculator::new(calendar),
            reason_limit,
            lagging_limit,
        }
    }

    pub fn calculator(&self) -> &AdherenceCalculator {
        &self.calculator
    }

    /// Per-task scores in input order; `None` for unscoreable tasks.
    pub fn score_all(&self, tasks: &[ScoredTask], now: DateTime<Utc>) -> Vec<Option<AdherenceScore>> {
        tasks.iter().map(|task| self.calculator.score(task, now)).collect()
    }

    /// Summarize the tasks overlapping `[window_start, today]`.
    ///
    /// # Arguments
    /// * `tasks` - scorer input, in any order
    /// * `window_start` - day stamp the window begins at
    /// * `now` - evaluation instant
    pub fn summarize(&self, tasks: &[ScoredTask], window_start: i64, now: DateTime<Utc>) -> WindowSummary {
        let today = self.calculator.calendar().day_stamp_of(now);

        let scored: Vec<(&ScoredTask, AdherenceScore)> = tasks
            .iter()
            .filter_map(|task| {
                let Some((start, end)) = self.calculator.plan_days(task) else {
                    debug!(title = %task.title, "task is unscoreable; excluded from rollup");
                    return None;
                };
                if end < window_start || start > today {
                    debug!(title = %task.title, window_start, "task does not overlap window");
                    return None;
                }
                self.calculator.score(task, now).map(|score| (task, score))
            })
            .collect();

        if scored.is_empty() {
            return WindowSummary::no_started_tasks();
        }

        let total: f64 = scored.iter().map(|(_, s)| f64::from(s.score)).sum();
        let mean = total / scored.len() as f64;
        let score = round_half_up(mean).clamp(0.0, 100.0) as u32;

        let reasons: Vec<String> = worst_offenders(scored, self.reason_limit)
            .iter()
            .map(Deduction::to_string)
            .collect();

        WindowSummary {
            score,
            reasons: if reasons.is_empty() {
                vec![NO_DEDUCTIONS_REASON.to_string()]
            } else {
                reasons
            },
        }
    }

    /// Summarize the week, month or quarter containing `now`.
    pub fn summarize_window(&self, tasks: &[ScoredTask], window: ReportWindow, now: DateTime<Utc>) -> WindowRollup {
        let window_start = self.calculator.calendar().window_start(window, now);
        WindowRollup {
            window,
            window_start,
            summary: self.summarize(tasks, window_start, now),
        }
    }

    /// Started tasks that are behind, most behind first.
    pub fn lagging_deductions(&self, tasks: &[ScoredTask], now: DateTime<Utc>) -> Vec<Deduction> {
        let today = self.calculator.calendar().day_stamp_of(now);

        let started = tasks.iter().filter_map(|task| {
            let (start, _) = self.calculator.plan_days(task)?;
            if start > today {
                return None;
            }
            self.calculator.score(task, now).map(|score| (task, score))
        });

        worst_offenders(started, self.lagging_limit)
    }

    /// Lagging diagnostic as display strings.
    pub fn lagging_actions(&self, tasks: &[ScoredTask], now: DateTime<Utc>) -> Vec<String> {
        self.lagging_deductions(tasks, now)
            .iter()
            .map(Deduction::to_string)
            .collect()
    }

    /// Full rollup for the week, month and quarter containing `now`.
    pub fn report(&self, tasks: &[ScoredTask], now: DateTime<Utc>) -> RollupReport {
        RollupReport {
            evaluated_at: now,
            week: self.summarize_window(tasks, ReportWindow::Week, now),
            month: self.summarize_window(tasks, ReportWindow::Month, now),
            quarter: self.summarize_window(tasks, ReportWindow::Quarter, now),
            lagging: self.lagging_actions(tasks, now),
        }
    }
}

/// Behind-schedule tasks sorted by ascending delta, truncated to `limit`.
///
/// The sort is stable, so tasks with equal delta keep their input order.
fn worst_offenders<'a, I>(scored: I, limit: usize) -> Vec<Deduction>
where
    I: IntoIterator<Item = (&'a ScoredTask, AdherenceScore)>,
{
    let mut behind: Vec<(&ScoredTask, AdherenceScore)> =
        scored.into_iter().filter(|(_, s)| s.is_behind()).collect();
    behind.sort_by(|a, b| a.1.delta.total_cmp(&b.1.delta));

    behind
        .into_iter()
        .take(limit)
        .map(|(task, adherence)| Deduction {
            title: task.title.clone(),
            adherence,
        })
        .collect()
}
