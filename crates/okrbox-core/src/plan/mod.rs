//! Plan data model.
//!
//! Rows arrive from the host table as loosely typed JSON. Everything here is
//! deserialized leniently: a number field holding garbage reads as absent
//! rather than failing the whole snapshot.

mod okr;
mod snapshot;
mod task;

pub use okr::{Action, ActionStatus, Evidence, Idea, KeyResult, Objective, WeeklyPlan, PARKING_STATUS};
pub use snapshot::PlanSnapshot;
pub use task::{normalize_progress, ScoredTask};

pub(crate) mod lenient {
    //! `deserialize_with` helpers that map malformed values to `None` or a default.

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number_from(value: Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number_from(Value::deserialize(deserializer)?))
    }

    /// Single-select cells: a label string, or an option object carrying
    /// `text` or `name`. Anything else reads as the default option.
    pub fn label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String> + Default,
    {
        let label = match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Object(obj) => obj
                .get("text")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        Ok(label
            .filter(|s| !s.trim().is_empty())
            .map(T::from)
            .unwrap_or_default())
    }

    /// Epoch-millisecond timestamps; fractional values are truncated.
    pub fn millis_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number_from(Value::deserialize(deserializer)?)
            .filter(|v| v.abs() < i64::MAX as f64)
            .map(|v| v as i64))
    }

    /// Link fields: a list of record ids, a single id, or nothing.
    pub fn ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = match Value::deserialize(deserializer)? {
            Value::String(s) if !s.is_empty() => vec![s],
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.is_empty() => Some(s),
                    Value::Object(obj) => obj
                        .get("id")
                        .or_else(|| obj.get("recordId"))
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(ids)
    }
}
