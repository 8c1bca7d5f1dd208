use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::okr::{Action, Evidence, Idea, KeyResult, Objective, WeeklyPlan};
use super::task::ScoredTask;

/// Every row fetched from the host in one refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub ideas: Vec<Idea>,
    #[serde(default)]
    pub weekly_plans: Vec<WeeklyPlan>,
    /// Free-standing scored tasks, for exports that carry no action rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<ScoredTask>,
}

impl PlanSnapshot {
    /// Snapshot holding only scored tasks.
    pub fn from_tasks(tasks: Vec<ScoredTask>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Parse either a full snapshot object or a bare array of tasks.
    ///
    /// The shape is picked from the first token, so errors name the field
    /// and position that failed.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim_start().starts_with('[') {
            Ok(Self::from_tasks(serde_json::from_str(json)?))
        } else {
            serde_json::from_str(json)
        }
    }

    /// Free-standing tasks followed by every action, as scorer input.
    pub fn scored_tasks(&self) -> Vec<ScoredTask> {
        self.tasks
            .iter()
            .cloned()
            .chain(self.actions.iter().map(Action::to_scored_task))
            .collect()
    }

    /// Key result id to display title.
    pub fn key_result_titles(&self) -> HashMap<&str, &str> {
        self.key_results
            .iter()
            .map(|kr| (kr.id.as_str(), kr.display_title()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
            && self.key_results.is_empty()
            && self.actions.is_empty()
            && self.evidence.is_empty()
            && self.ideas.is_empty()
            && self.weekly_plans.is_empty()
            && self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_task_array() {
        let snapshot = PlanSnapshot::from_json_str(
            r#"[{"title":"A","planStart":0,"planEnd":864000000,"progress":0.5},{"title":"B"}]"#,
        )
        .unwrap();
        assert_eq!(snapshot.tasks.len(), 2);
        assert!(snapshot.actions.is_empty());
    }

    #[test]
    fn parses_full_snapshot_with_missing_sections() {
        let snapshot = PlanSnapshot::from_json_str(
            r#"{"keyResults":[{"id":"kr1","title":"Grow"}],"actions":[{"id":"a1","title":"Do","keyResultIds":["kr1"]}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.key_results.len(), 1);
        assert_eq!(snapshot.actions.len(), 1);
        assert!(snapshot.evidence.is_empty());
        assert_eq!(snapshot.key_result_titles().get("kr1"), Some(&"Grow"));
    }

    #[test]
    fn scored_tasks_include_actions_after_tasks() {
        let mut snapshot = PlanSnapshot::from_tasks(vec![ScoredTask::new("free")]);
        snapshot.actions.push(Action {
            id: "a1".into(),
            title: "linked".into(),
            ..Default::default()
        });
        let titles: Vec<_> = snapshot.scored_tasks().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["free", "linked"]);
    }

    #[test]
    fn empty_object_is_empty_snapshot() {
        let snapshot = PlanSnapshot::from_json_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn rejects_non_snapshot_json() {
        assert!(PlanSnapshot::from_json_str("42").is_err());
    }

    #[test]
    fn null_status_keeps_the_snapshot_loadable() {
        let snapshot =
            PlanSnapshot::from_json_str(r#"{"actions":[{"id":"a1","title":"Do","status":null}]}"#).unwrap();
        assert_eq!(snapshot.actions[0].status, crate::plan::ActionStatus::Backlog);
    }

    #[test]
    fn parse_errors_name_the_failing_field() {
        let err = PlanSnapshot::from_json_str(r#"{"actions":[{"title":"no id"}]}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `id`"), "{err}");

        let err = PlanSnapshot::from_json_str(r#"[{"title": 7}]"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{err}");
        assert!(!err.to_string().contains("untagged"));
    }
}
