//! # okrbox Core Library
//!
//! This library provides the business logic behind the okrbox OKR toolbox.
//! Plans are exported from the host table as JSON snapshots; everything here
//! is computed from a snapshot and an explicit evaluation instant, so results
//! are reproducible and the `okrbox` CLI is a thin layer over the same calls.
//!
//! ## Architecture
//!
//! - **Calendar**: local-day stamps and week/month/quarter boundaries
//! - **Stats**: schedule adherence per action, window rollups, KR drift
//! - **Board**: today list, action bank, evidence feed, action workflow
//! - **Storage**: TOML configuration and snapshot files
//!
//! ## Key Components
//!
//! - [`AdherenceCalculator`]: expected-vs-actual progress score for one task
//! - [`RollupAnalyzer`]: window summaries and the lagging list
//! - [`DriftAnalyzer`]: key results without recent evidence
//! - [`Config`]: application configuration management

pub mod board;
pub mod calendar;
pub mod clock;
pub mod demo;
pub mod error;
pub mod plan;
pub mod refresh;
pub mod stats;
pub mod storage;

pub use board::{Board, BoardItem, EvidenceFeedItem, TodaySummary};
pub use calendar::{Calendar, ReportWindow};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, SnapshotError, ValidationError};
pub use plan::{Action, ActionStatus, Evidence, Idea, KeyResult, Objective, PlanSnapshot, ScoredTask};
pub use refresh::{RefreshSlot, RefreshTicket};
pub use stats::{AdherenceCalculator, AdherenceScore, DriftAnalyzer, DriftReport, RollupAnalyzer, RollupReport, WindowSummary};
pub use storage::Config;
