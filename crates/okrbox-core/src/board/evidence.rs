use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::today::titled_key_results;
use crate::plan::PlanSnapshot;

/// Number of records in the evidence feed.
pub const FEED_LIMIT: usize = 10;

/// Evidence row joined with what it proves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceFeedItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kr_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_title: Option<String>,
}

/// Most recent evidence first; undated records sort last.
pub fn evidence_feed(snapshot: &PlanSnapshot) -> Vec<EvidenceFeedItem> {
    let kr_titles = titled_key_results(snapshot);
    let action_titles: HashMap<&str, &str> = snapshot
        .actions
        .iter()
        .map(|a| (a.id.as_str(), a.display_title()))
        .collect();

    let mut feed: Vec<EvidenceFeedItem> = snapshot
        .evidence
        .iter()
        .map(|ev| EvidenceFeedItem {
            id: ev.id.clone(),
            title: ev.display_title().to_string(),
            kind: ev.kind.clone(),
            link: ev.link.clone(),
            date: ev.date,
            kr_title: ev
                .key_result_ids
                .first()
                .and_then(|id| kr_titles.get(id.as_str()))
                .map(|t| t.to_string()),
            action_title: ev
                .action_ids
                .first()
                .and_then(|id| action_titles.get(id.as_str()))
                .map(|t| t.to_string()),
        })
        .collect();

    // None < Some, so reversing the key puts undated records last
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(FEED_LIMIT);
    feed
}
