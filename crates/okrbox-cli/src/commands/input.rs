//! Arguments shared by every command that reads a snapshot.

use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use okrbox_core::clock::{parse_instant, Clock, SystemClock};
use okrbox_core::storage::{load_snapshot, save_snapshot};
use okrbox_core::{Calendar, Config, PlanSnapshot};

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Exported plan snapshot (JSON object or array of tasks)
    #[arg(long, short)]
    pub file: PathBuf,
    /// Evaluation instant (RFC 3339 or epoch ms); defaults to now
    #[arg(long)]
    pub now: Option<String>,
}

impl SnapshotArgs {
    pub fn load(&self) -> Result<PlanSnapshot, Box<dyn std::error::Error>> {
        Ok(load_snapshot(&self.file)?)
    }

    pub fn save(&self, snapshot: &PlanSnapshot) -> Result<(), Box<dyn std::error::Error>> {
        Ok(save_snapshot(&self.file, snapshot)?)
    }

    pub fn now(&self) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
        resolve_now(self.now.as_deref())
    }
}

/// Parse `--now`, falling back to the system clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match now {
        Some(raw) => Ok(parse_instant(raw)?),
        None => Ok(SystemClock.now()),
    }
}

/// Loaded configuration and the calendar it selects.
pub fn settings() -> Result<(Config, Calendar), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let calendar = config.calendar()?;
    debug!(zone = ?calendar.zone(), "resolved calendar");
    Ok((config, calendar))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
