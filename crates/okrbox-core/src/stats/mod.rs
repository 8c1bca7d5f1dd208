//! Statistics module for okrbox
//!
//! This module scores actions against their plan windows, rolls those scores
//! up into week/month/quarter summaries, and flags key results whose
//! evidence has gone stale.

mod adherence;
mod drift;
mod rollup;

pub use adherence::{score_task, AdherenceCalculator, AdherenceScore};

pub use rollup::{
    Deduction, RollupAnalyzer, RollupReport, WindowRollup, WindowSummary, DEFAULT_LAGGING_LIMIT,
    DEFAULT_REASON_LIMIT, NO_DEDUCTIONS_REASON, NO_STARTED_TASKS_REASON,
};

pub use drift::{DriftAnalyzer, DriftReport, KrDrift, DEFAULT_STALE_AFTER_DAYS, DEFAULT_TOP_LIMIT};
