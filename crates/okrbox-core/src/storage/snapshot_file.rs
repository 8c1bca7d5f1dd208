//! Plan snapshot files exported from the host table.

use std::path::Path;
use tracing::debug;

use crate::error::SnapshotError;
use crate::plan::PlanSnapshot;

/// Read a snapshot: a full snapshot object or a bare array of tasks.
pub fn load_snapshot(path: &Path) -> Result<PlanSnapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = PlanSnapshot::from_json_str(&content).map_err(|source| SnapshotError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        actions = snapshot.actions.len(),
        tasks = snapshot.tasks.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Write a snapshot as pretty-printed JSON, replacing the file.
pub fn save_snapshot(path: &Path, snapshot: &PlanSnapshot) -> Result<(), SnapshotError> {
    let mut content = serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::EncodeFailed {
        path: path.to_path_buf(),
        source,
    })?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| SnapshotError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
