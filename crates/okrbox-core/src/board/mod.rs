//! Board views over a plan snapshot.
//!
//! - [`Board::today`]: the today list, its minute total, and the backlog
//! - [`Board::bank`]: the action bank, optionally filtered by key result
//! - [`Board::ideas`]: the parking lot
//! - [`evidence_feed`]: the most recent evidence
//! - [`workflow`]: creating and moving actions, logging evidence, parking ideas

mod evidence;
mod ideas;
mod today;
pub mod workflow;

pub use evidence::{evidence_feed, EvidenceFeedItem, FEED_LIMIT};
pub use ideas::IdeaItem;
pub use today::{BacklogItem, Board, BoardItem, TodaySummary};
pub use workflow::{
    complete_action, create_action, move_action, record_evidence, record_idea, Completion, NewAction, NewEvidence,
    NewIdea, GUARDRAIL_MINUTES,
};
