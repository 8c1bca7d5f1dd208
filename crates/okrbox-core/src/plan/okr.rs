use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;
use super::task::ScoredTask;
use crate::calendar::Calendar;

/// Objective row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Planning cycle label, e.g. "2026 Q1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<String>,
}

/// Key result row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub due: Option<i64>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub objective_ids: Vec<String>,
}

impl KeyResult {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "未命名 KR"
        } else {
            &self.title
        }
    }
}

/// Workflow state of an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStatus {
    #[default]
    Backlog,
    Today,
    Doing,
    Done,
    Blocked,
    /// Option label this version does not know about
    Other(String),
}

impl ActionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ActionStatus::Backlog => "Backlog",
            ActionStatus::Today => "Today",
            ActionStatus::Doing => "Doing",
            ActionStatus::Done => "Done",
            ActionStatus::Blocked => "Blocked",
            ActionStatus::Other(label) => label,
        }
    }
}

impl From<String> for ActionStatus {
    fn from(label: String) -> Self {
        match label.trim() {
            "Backlog" | "backlog" => ActionStatus::Backlog,
            "Today" | "today" => ActionStatus::Today,
            "Doing" | "doing" => ActionStatus::Doing,
            "Done" | "done" => ActionStatus::Done,
            "Blocked" | "blocked" => ActionStatus::Blocked,
            _ => ActionStatus::Other(label),
        }
    }
}

impl From<ActionStatus> for String {
    fn from(status: ActionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action row: the schedulable unit of work under a key result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub status: ActionStatus,
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub est_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub plan_date: Option<i64>,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub plan_start: Option<i64>,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub plan_end: Option<i64>,
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub key_result_ids: Vec<String>,
}

impl Action {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "未命名 Action"
        } else {
            &self.title
        }
    }

    /// First linked key result, if any.
    pub fn key_result_id(&self) -> Option<&str> {
        self.key_result_ids.first().map(String::as_str)
    }

    pub fn is_aligned(&self) -> bool {
        !self.key_result_ids.is_empty()
    }

    /// View of this action for the adherence scorer.
    pub fn to_scored_task(&self) -> ScoredTask {
        ScoredTask {
            title: self.display_title().to_string(),
            plan_start: self.plan_start,
            plan_end: self.plan_end,
            progress: self.progress,
        }
    }

    /// `第NN周` label from the plan end, plan start, or plan date, in that order.
    pub fn plan_week_label(&self, calendar: &Calendar) -> Option<String> {
        self.plan_end
            .or(self.plan_start)
            .or(self.plan_date)
            .and_then(|ts| calendar.plan_week_label(ts))
    }
}

/// Evidence row: a dated artifact proving progress on a key result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub key_result_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub action_ids: Vec<String>,
}

impl Evidence {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "未命名证据"
        } else {
            &self.title
        }
    }
}

/// Status given to newly parked ideas.
pub const PARKING_STATUS: &str = "Parking";

/// Parked idea not yet promoted to an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub est_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub key_result_ids: Vec<String>,
}

impl Idea {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "未命名想法"
        } else {
            &self.title
        }
    }

    pub fn key_result_id(&self) -> Option<&str> {
        self.key_result_ids.first().map(String::as_str)
    }
}

/// Weekly plan row: the week's deliverable, its main risk and a time budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::millis_opt", skip_serializing_if = "Option::is_none")]
    pub week_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliverable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    /// Minutes available for the week's actions
    #[serde(default, deserialize_with = "lenient::f64_opt", skip_serializing_if = "Option::is_none")]
    pub time_budget_minutes: Option<f64>,
    #[serde(default, deserialize_with = "lenient::ids", skip_serializing_if = "Vec::is_empty")]
    pub key_result_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn status_round_trips_known_and_unknown_labels() {
        let status: ActionStatus = serde_json::from_str("\"Today\"").unwrap();
        assert_eq!(status, ActionStatus::Today);
        let status: ActionStatus = serde_json::from_str("\"Parking\"").unwrap();
        assert_eq!(status, ActionStatus::Other("Parking".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Parking\"");
    }

    #[test]
    fn action_link_fields_accept_several_shapes() {
        let action: Action = serde_json::from_str(
            r#"{"id":"a1","title":"T","keyResultIds":[{"id":"kr1"},"kr2",""]}"#,
        )
        .unwrap();
        assert_eq!(action.key_result_ids, vec!["kr1", "kr2"]);
        assert_eq!(action.key_result_id(), Some("kr1"));

        let single: Action = serde_json::from_str(r#"{"id":"a2","keyResultIds":"kr9"}"#).unwrap();
        assert_eq!(single.key_result_ids, vec!["kr9"]);
        assert_eq!(single.status, ActionStatus::Backlog);
    }

    #[test]
    fn malformed_status_cells_read_as_backlog() {
        let actions: Vec<Action> = serde_json::from_str(
            r#"[{"id":"a1","status":null},{"id":"a2","status":3},{"id":"a3","status":" "},
                {"id":"a4","status":{"text":"Today"}},{"id":"a5","status":"Done"}]"#,
        )
        .unwrap();
        let statuses: Vec<_> = actions.into_iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                ActionStatus::Backlog,
                ActionStatus::Backlog,
                ActionStatus::Backlog,
                ActionStatus::Today,
                ActionStatus::Done,
            ]
        );
    }

    #[test]
    fn empty_titles_get_placeholders() {
        assert_eq!(Idea::default().display_title(), "未命名想法");
        assert_eq!(Action::default().display_title(), "未命名 Action");
        assert_eq!(KeyResult::default().display_title(), "未命名 KR");
        assert_eq!(Evidence::default().display_title(), "未命名证据");
    }

    #[test]
    fn scored_task_carries_plan_and_progress() {
        let action = Action {
            id: "a1".into(),
            title: "Ship".into(),
            plan_start: Some(1),
            plan_end: Some(2),
            progress: Some(40.0),
            ..Default::default()
        };
        let task = action.to_scored_task();
        assert_eq!(task.title, "Ship");
        assert_eq!(task.plan_bounds(), Some((1, 2)));
        assert_eq!(task.actual_progress(), 0.4);
    }

    #[test]
    fn plan_week_prefers_plan_end() {
        let cal = Calendar::utc();
        let ms = |m, d| Utc.with_ymd_and_hms(2026, m, d, 12, 0, 0).unwrap().timestamp_millis();
        let action = Action {
            plan_date: Some(ms(1, 1)),
            plan_start: Some(ms(1, 5)),
            plan_end: Some(ms(3, 2)),
            ..Default::default()
        };
        assert_eq!(action.plan_week_label(&cal).as_deref(), Some("第10周"));

        let dated_only = Action {
            plan_date: Some(ms(1, 1)),
            ..Default::default()
        };
        assert_eq!(dated_only.plan_week_label(&cal).as_deref(), Some("第01周"));
        assert_eq!(Action::default().plan_week_label(&cal), None);
    }
}
