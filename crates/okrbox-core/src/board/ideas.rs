//! Parking lot: ideas waiting to be promoted to actions.

use serde::{Deserialize, Serialize};

use super::today::titled_key_results;
use super::Board;
use crate::plan::PlanSnapshot;

/// One parked idea as listed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaItem {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kr_title: Option<String>,
}

impl Board {
    /// Every idea in snapshot order, joined with its first key result.
    pub fn ideas(&self, snapshot: &PlanSnapshot) -> Vec<IdeaItem> {
        let titles = titled_key_results(snapshot);
        snapshot
            .ideas
            .iter()
            .map(|idea| IdeaItem {
                id: idea.id.clone(),
                title: idea.display_title().to_string(),
                minutes: idea.est_minutes,
                status: idea.status.clone().filter(|s| !s.trim().is_empty()),
                kr_title: idea
                    .key_result_id()
                    .and_then(|id| titles.get(id))
                    .map(|title| title.to_string()),
            })
            .collect()
    }
}
