//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Scoring limits (reasons per window summary, lagging list length)
//! - Drift thresholds
//! - Calendar time zone override
//! - Default log level
//!
//! Configuration is stored at `~/.config/okrbox/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::Calendar;
use crate::error::{ConfigError, ValidationError};
use crate::stats::{
    DriftAnalyzer, RollupAnalyzer, DEFAULT_LAGGING_LIMIT, DEFAULT_REASON_LIMIT, DEFAULT_STALE_AFTER_DAYS,
    DEFAULT_TOP_LIMIT,
};

/// Largest configurable UTC offset, in minutes.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_reason_limit")]
    pub reason_limit: usize,
    #[serde(default = "default_lagging_limit")]
    pub lagging_limit: usize,
}

/// Drift detection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftConfig {
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: i64,
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

/// Calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Fixed offset east of UTC; the system time zone when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/okrbox/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// Default functions
fn default_reason_limit() -> usize {
    DEFAULT_REASON_LIMIT
}
fn default_lagging_limit() -> usize {
    DEFAULT_LAGGING_LIMIT
}
fn default_stale_after_days() -> i64 {
    DEFAULT_STALE_AFTER_DAYS
}
fn default_top_limit() -> usize {
    DEFAULT_TOP_LIMIT
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reason_limit: default_reason_limit(),
            lagging_limit: default_lagging_limit(),
        }
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            stale_after_days: default_stale_after_days(),
            top_limit: default_top_limit(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = if is_unset(value) {
                    serde_json::Value::Null
                } else {
                    match existing {
                        serde_json::Value::Bool(_) => serde_json::Value::Bool(
                            value
                                .parse::<bool>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                        ),
                        serde_json::Value::Number(_) | serde_json::Value::Null => parse_number(value)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                        serde_json::Value::Object(_) => return Err(unknown()),
                        _ => serde_json::Value::String(value.into()),
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Unset optional values read as `"none"`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config fails validation. `self` is left unchanged on
    /// error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Every leaf key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        const KEYS: [&str; 6] = [
            "scoring.reason_limit",
            "scoring.lagging_limit",
            "drift.stale_after_days",
            "drift.top_limit",
            "calendar.utc_offset_minutes",
            "log.level",
        ];
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Reject values the analyzers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let at_least_one = |key: &str, value: i64| {
            if value < 1 {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be at least 1, got {value}"),
                })
            } else {
                Ok(())
            }
        };
        at_least_one("scoring.reason_limit", self.scoring.reason_limit as i64)?;
        at_least_one("scoring.lagging_limit", self.scoring.lagging_limit as i64)?;
        at_least_one("drift.stale_after_days", self.drift.stale_after_days)?;
        at_least_one("drift.top_limit", self.drift.top_limit as i64)?;

        if let Some(minutes) = self.calendar.utc_offset_minutes {
            if minutes.abs() > MAX_OFFSET_MINUTES {
                return Err(ConfigError::InvalidValue {
                    key: "calendar.utc_offset_minutes".into(),
                    message: format!("must lie within +-{MAX_OFFSET_MINUTES} minutes, got {minutes}"),
                });
            }
        }
        Ok(())
    }

    /// Calendar in the configured zone.
    pub fn calendar(&self) -> Result<Calendar, ValidationError> {
        Calendar::from_offset_setting(self.calendar.utc_offset_minutes)
    }

    pub fn rollup_analyzer(&self, calendar: Calendar) -> RollupAnalyzer {
        RollupAnalyzer::with_limits(calendar, self.scoring.reason_limit, self.scoring.lagging_limit)
    }

    pub fn drift_analyzer(&self) -> DriftAnalyzer {
        DriftAnalyzer::with_thresholds(self.drift.stale_after_days, self.drift.top_limit)
    }
}

fn is_unset(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "none" | "null")
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(serde_json::Value::Number(n.into()));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}
