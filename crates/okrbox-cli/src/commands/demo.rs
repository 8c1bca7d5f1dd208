use std::path::PathBuf;

use okrbox_core::demo;
use okrbox_core::storage::save_snapshot;

use super::input::{print_json, resolve_now, settings};

pub fn run(out: Option<PathBuf>, now: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, calendar) = settings()?;
    let snapshot = demo::seed(resolve_now(now.as_deref())?, &calendar);
    match out {
        Some(path) => {
            save_snapshot(&path, &snapshot)?;
            println!("demo snapshot written to {}", path.display());
        }
        None => print_json(&snapshot)?,
    }
    Ok(())
}
