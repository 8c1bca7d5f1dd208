//! Key result drift detection.
//!
//! A key result drifts when nobody has logged evidence against it recently.
//! Drifting KRs are ranked with the longest-silent first; KRs that never had
//! any evidence rank above all of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::calendar::whole_days_since;
use crate::plan::{normalize_progress, Evidence, KeyResult, PlanSnapshot};

pub const DEFAULT_STALE_AFTER_DAYS: i64 = 2;
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Evidence freshness of one key result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KrDrift {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<i64>,
    /// Latest evidence date, epoch ms
    pub last_evidence: Option<i64>,
    /// Whole days since the latest evidence; `None` if there is none
    pub days_since_evidence: Option<i64>,
    pub drifting: bool,
}

/// Complete drift report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    pub evaluated_at: DateTime<Utc>,
    /// Drifting KRs, most stale first
    pub drifting: Vec<KrDrift>,
    pub drift_count: usize,
    /// Head of the ranking over all KRs, drifting or not
    pub top: Vec<KrDrift>,
    /// Actions linked to no key result
    pub unaligned_actions: usize,
}

/// Analyzer for evidence freshness
#[derive(Debug, Clone)]
pub struct DriftAnalyzer {
    /// Days without evidence before a KR counts as drifting
    pub stale_after_days: i64,
    /// Length of the top list
    pub top_limit: usize,
}

impl Default for DriftAnalyzer {
    fn default() -> Self {
        Self {
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }
}

impl DriftAnalyzer {
    /// Create a new analyzer with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new analyzer with custom thresholds
    pub fn with_thresholds(stale_after_days: i64, top_limit: usize) -> Self {
        Self {
            stale_after_days,
            top_limit,
        }
    }

    /// Latest evidence date per linked key result id.
    ///
    /// Dates at or before the epoch do not count.
    pub fn latest_evidence<'a>(&self, evidence: &'a [Evidence]) -> HashMap<&'a str, i64> {
        let mut latest: HashMap<&str, i64> = HashMap::new();
        for record in evidence {
            let Some(date) = record.date.filter(|&date| date > 0) else { continue };
            for kr_id in &record.key_result_ids {
                latest
                    .entry(kr_id.as_str())
                    .and_modify(|prev| *prev = (*prev).max(date))
                    .or_insert(date);
            }
        }
        latest
    }

    /// Analyze a snapshot as of `now`.
    pub fn analyze(&self, snapshot: &PlanSnapshot, now: DateTime<Utc>) -> DriftReport {
        let latest = self.latest_evidence(&snapshot.evidence);

        let known: HashSet<&str> = snapshot.key_results.iter().map(|kr| kr.id.as_str()).collect();
        let orphaned = latest.keys().filter(|id| !known.contains(*id)).count();
        if orphaned > 0 {
            warn!(orphaned, "evidence links to key results missing from the snapshot");
        }

        let mut ranked: Vec<KrDrift> = snapshot
            .key_results
            .iter()
            .map(|kr| self.assess(kr, latest.get(kr.id.as_str()).copied(), now))
            .collect();
        ranked.sort_by(compare_staleness);

        let drifting: Vec<KrDrift> = ranked.iter().filter(|kr| kr.drifting).cloned().collect();
        let unaligned_actions = snapshot.actions.iter().filter(|a| !a.is_aligned()).count();

        DriftReport {
            evaluated_at: now,
            drift_count: drifting.len(),
            drifting,
            top: ranked.into_iter().take(self.top_limit).collect(),
            unaligned_actions,
        }
    }

    fn assess(&self, kr: &KeyResult, last_evidence: Option<i64>, now: DateTime<Utc>) -> KrDrift {
        let days_since_evidence = last_evidence.map(|last| whole_days_since(last, now));
        let drifting = days_since_evidence.map_or(true, |days| days >= self.stale_after_days);

        KrDrift {
            id: kr.id.clone(),
            title: kr.display_title().to_string(),
            progress: kr.progress,
            confidence: kr.confidence,
            due: kr.due,
            last_evidence,
            days_since_evidence,
            drifting,
        }
    }
}

/// Never-evidenced first, then most days silent, then least progress.
fn compare_staleness(a: &KrDrift, b: &KrDrift) -> Ordering {
    let silence = |kr: &KrDrift| kr.days_since_evidence.unwrap_or(i64::MAX);
    silence(b).cmp(&silence(a)).then_with(|| {
        normalize_progress(a.progress).total_cmp(&normalize_progress(b.progress))
    })
}
