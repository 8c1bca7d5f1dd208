use super::input::{print_json, settings, SnapshotArgs};

pub fn run(input: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _) = settings()?;
    let snapshot = input.load()?;
    let report = config.drift_analyzer().analyze(&snapshot, input.now()?);
    print_json(&report)
}
