//! Action workflow: creating and moving actions, logging evidence, and
//! parking ideas.
//!
//! These mutate a [`PlanSnapshot`] in place. The caller persists the result.
//!
//! New actions pass a guardrail: anything estimated over
//! [`GUARDRAIL_MINUTES`] must be linked to a key result, otherwise it belongs
//! in the parking lot as an idea.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::plan::{Action, ActionStatus, Evidence, Idea, PlanSnapshot, PARKING_STATUS};

/// Evidence kind used when none is given.
pub const DEFAULT_EVIDENCE_KIND: &str = "Note";

/// Largest estimate an action may carry without a key result.
pub const GUARDRAIL_MINUTES: f64 = 30.0;

/// Action to create in the backlog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAction {
    pub title: String,
    pub est_minutes: f64,
    pub key_result_id: Option<String>,
}

/// Idea to park
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIdea {
    pub title: String,
    pub est_minutes: f64,
    pub key_result_id: Option<String>,
    pub notes: Option<String>,
}

/// Evidence to append to a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvidence {
    pub title: String,
    pub kind: Option<String>,
    pub link: Option<String>,
    pub action_id: Option<String>,
    /// Defaults to the action's first key result
    pub key_result_id: Option<String>,
}

/// How an action was closed out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Finished, with proof
    Evidence {
        title: String,
        kind: Option<String>,
        link: Option<String>,
    },
    /// Abandoned; the reason is logged as evidence
    Failure(String),
}

fn find_action<'a>(snapshot: &'a mut PlanSnapshot, id: &str) -> Result<&'a mut Action, ValidationError> {
    snapshot
        .actions
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| ValidationError::UnknownRecord {
            kind: "action",
            id: id.to_string(),
        })
}

fn required_title<'a>(field: &str, title: &'a str) -> Result<&'a str, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: "title must not be empty".into(),
        });
    }
    Ok(title)
}

fn required_minutes(minutes: f64) -> Result<f64, ValidationError> {
    if !minutes.is_finite() || minutes < 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "minutes".into(),
            message: format!("estimate must be at least 1 minute, got {minutes}"),
        });
    }
    Ok(minutes)
}

/// An optional key result link, which must name a key result in the snapshot.
fn known_key_result(snapshot: &PlanSnapshot, id: Option<String>) -> Result<Option<String>, ValidationError> {
    match id.filter(|id| !id.trim().is_empty()) {
        Some(id) if !snapshot.key_results.iter().any(|kr| kr.id == id) => {
            Err(ValidationError::UnknownRecord { kind: "key result", id })
        }
        other => Ok(other),
    }
}

/// Create a backlog action and return it.
///
/// # Errors
/// * `InvalidValue` for an empty title or an estimate under one minute
/// * `UnknownRecord` when the key result is not in the snapshot
/// * `NeedsParking` when the estimate exceeds [`GUARDRAIL_MINUTES`] and no
///   key result is linked
pub fn create_action(snapshot: &mut PlanSnapshot, action: NewAction) -> Result<&Action, ValidationError> {
    let title = required_title("title", &action.title)?;
    let minutes = required_minutes(action.est_minutes)?;
    let key_result_id = known_key_result(snapshot, action.key_result_id)?;

    if minutes > GUARDRAIL_MINUTES && key_result_id.is_none() {
        debug!(title, minutes, "unaligned action sent to parking");
        return Err(ValidationError::NeedsParking {
            title: title.to_string(),
            minutes,
            limit: GUARDRAIL_MINUTES,
        });
    }

    let index = snapshot.actions.len();
    snapshot.actions.push(Action {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        status: ActionStatus::Backlog,
        est_minutes: Some(minutes),
        key_result_ids: key_result_id.into_iter().collect(),
        ..Default::default()
    });
    Ok(&snapshot.actions[index])
}

/// Park an idea with status `Parking` and return it.
pub fn record_idea(snapshot: &mut PlanSnapshot, idea: NewIdea) -> Result<&Idea, ValidationError> {
    let title = required_title("title", &idea.title)?;
    let minutes = required_minutes(idea.est_minutes)?;
    let key_result_id = known_key_result(snapshot, idea.key_result_id)?;

    let index = snapshot.ideas.len();
    snapshot.ideas.push(Idea {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        est_minutes: Some(minutes),
        status: Some(PARKING_STATUS.to_string()),
        notes: idea.notes.filter(|n| !n.trim().is_empty()),
        key_result_ids: key_result_id.into_iter().collect(),
    });
    Ok(&snapshot.ideas[index])
}

/// Set the status of action `id`.
pub fn move_action(snapshot: &mut PlanSnapshot, id: &str, status: ActionStatus) -> Result<(), ValidationError> {
    let action = find_action(snapshot, id)?;
    debug!(id, from = %action.status, to = %status, "moving action");
    action.status = status;
    Ok(())
}

/// Append an evidence row dated `now` and return it.
pub fn record_evidence(
    snapshot: &mut PlanSnapshot,
    evidence: NewEvidence,
    now: DateTime<Utc>,
) -> Result<&Evidence, ValidationError> {
    let title = required_title("title", &evidence.title)?;

    let mut key_result_id = evidence.key_result_id.filter(|id| !id.is_empty());
    let action_id = evidence.action_id.filter(|id| !id.is_empty());
    if let Some(id) = &action_id {
        let action = find_action(snapshot, id)?;
        if key_result_id.is_none() {
            key_result_id = action.key_result_id().map(str::to_string);
        }
    }

    let index = snapshot.evidence.len();
    snapshot.evidence.push(Evidence {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        kind: Some(
            evidence
                .kind
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EVIDENCE_KIND.to_string()),
        ),
        link: evidence.link.filter(|l| !l.trim().is_empty()),
        date: Some(now.timestamp_millis()),
        key_result_ids: key_result_id.into_iter().collect(),
        action_ids: action_id.into_iter().collect(),
    });

    Ok(&snapshot.evidence[index])
}

/// Log the outcome of action `id` as evidence and mark it `Done`.
pub fn complete_action(
    snapshot: &mut PlanSnapshot,
    id: &str,
    completion: Completion,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    let evidence = match completion {
        Completion::Evidence { title, kind, link } => NewEvidence {
            title,
            kind,
            link,
            ..Default::default()
        },
        Completion::Failure(reason) if !reason.trim().is_empty() => NewEvidence {
            title: format!("失败原因：{}", reason.trim()),
            kind: Some(DEFAULT_EVIDENCE_KIND.to_string()),
            ..Default::default()
        },
        Completion::Failure(_) => NewEvidence::default(),
    };
    if evidence.title.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "completion".into(),
            message: "an evidence title or a failure reason is required".into(),
        });
    }

    record_evidence(
        snapshot,
        NewEvidence {
            action_id: Some(id.to_string()),
            ..evidence
        },
        now,
    )?;
    move_action(snapshot, id, ActionStatus::Done)
}
