use okrbox_core::Board;

use super::input::{print_json, settings, SnapshotArgs};

pub fn today(input: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (_, calendar) = settings()?;
    let snapshot = input.load()?;
    print_json(&Board::new(calendar).today(&snapshot))
}

pub fn bank(input: SnapshotArgs, kr: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, calendar) = settings()?;
    let snapshot = input.load()?;
    print_json(&Board::new(calendar).bank(&snapshot, kr.as_deref()))
}
