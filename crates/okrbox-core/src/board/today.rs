//! Today list and action bank.
//!
//! Both views list actions by status, each joined with its first linked key
//! result. The today list also totals estimated minutes so the user can see
//! whether the day is overbooked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::Calendar;
use crate::plan::{Action, ActionStatus, PlanSnapshot};

/// One action row as shown on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_date: Option<i64>,
    /// `第NN周` label of the plan window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kr_id: Option<String>,
    /// Title of `kr_id`, if it resolves to a key result with a title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kr_title: Option<String>,
}

/// Short backlog entry used for "add to today" pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogItem {
    pub id: String,
    pub title: String,
}

/// Today list plus the backlog it is picked from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummary {
    pub today: Vec<BoardItem>,
    /// Sum of estimated minutes over `today`; missing estimates count as 0
    pub total_minutes: f64,
    pub backlog: Vec<BacklogItem>,
}

/// Builds board views over a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Board {
    calendar: Calendar,
}

impl Board {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    /// Actions marked `Today`, and the `Backlog` they are picked from.
    pub fn today(&self, snapshot: &PlanSnapshot) -> TodaySummary {
        let titles = titled_key_results(snapshot);

        let today: Vec<BoardItem> = snapshot
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Today)
            .map(|a| self.item(a, &titles))
            .collect();
        let total_minutes = today.iter().filter_map(|item| item.minutes).sum();

        let backlog = snapshot
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Backlog)
            .map(|a| BacklogItem {
                id: a.id.clone(),
                title: a.display_title().to_string(),
            })
            .collect();

        TodaySummary {
            today,
            total_minutes,
            backlog,
        }
    }

    /// Backlog actions with full detail, optionally only those under `kr_id`.
    pub fn bank(&self, snapshot: &PlanSnapshot, kr_id: Option<&str>) -> Vec<BoardItem> {
        let titles = titled_key_results(snapshot);
        snapshot
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Backlog)
            .filter(|a| kr_id.map_or(true, |kr| a.key_result_id() == Some(kr)))
            .map(|a| self.item(a, &titles))
            .collect()
    }

    fn item(&self, action: &Action, titles: &HashMap<&str, &str>) -> BoardItem {
        let kr_id = action.key_result_id();
        BoardItem {
            id: action.id.clone(),
            title: action.display_title().to_string(),
            minutes: action.est_minutes,
            plan_date: action.plan_date,
            plan_week: action.plan_week_label(&self.calendar),
            kr_id: kr_id.map(str::to_string),
            kr_title: kr_id
                .and_then(|id| titles.get(id))
                .map(|title| title.to_string()),
        }
    }
}

/// Key result titles, skipping untitled rows so no placeholder leaks into joins.
pub(crate) fn titled_key_results(snapshot: &PlanSnapshot) -> HashMap<&str, &str> {
    snapshot
        .key_results
        .iter()
        .filter(|kr| !kr.title.trim().is_empty())
        .map(|kr| (kr.id.as_str(), kr.title.as_str()))
        .collect()
}
