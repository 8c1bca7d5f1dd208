use serde::{Deserialize, Serialize};

use super::lenient;

/// A unit of planned work as seen by the adherence scorer.
///
/// Recomputed from the host rows on every refresh; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTask {
    /// Display label
    #[serde(default)]
    pub title: String,
    /// Planned start, epoch ms
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub plan_start: Option<i64>,
    /// Planned end, epoch ms
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub plan_end: Option<i64>,
    /// Completion as a fraction in [0, 1] or a percentage in (1, 100]
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl ScoredTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_plan(mut self, plan_start: Option<i64>, plan_end: Option<i64>) -> Self {
        self.plan_start = plan_start;
        self.plan_end = plan_end;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Whether at least one plan bound is set.
    pub fn has_plan(&self) -> bool {
        self.plan_start.is_some() || self.plan_end.is_some()
    }

    /// Plan window with a missing bound collapsed onto the present one.
    pub fn plan_bounds(&self) -> Option<(i64, i64)> {
        match (self.plan_start, self.plan_end) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(start), None) => Some((start, start)),
            (None, Some(end)) => Some((end, end)),
            (None, None) => None,
        }
    }

    /// Normalized completion fraction, see [`normalize_progress`].
    pub fn actual_progress(&self) -> f64 {
        normalize_progress(self.progress)
    }
}

/// Map a raw progress value onto a fraction.
///
/// Values above 1 are read as percentages. Absent or non-finite input is 0.
/// Values above 100 are passed through unclamped.
pub fn normalize_progress(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() => {
            if v <= 1.0 {
                v
            } else {
                v / 100.0
            }
        }
        _ => 0.0,
    }
}
