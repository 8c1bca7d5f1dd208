use clap::Subcommand;
use okrbox_core::ReportWindow;

use super::input::{print_json, settings, SnapshotArgs};

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Per-task adherence scores (null for unscoreable tasks)
    Task {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Summary for the week, month or quarter containing now
    Window {
        /// week, month or quarter
        window: ReportWindow,
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Week, month and quarter summaries plus lagging actions
    Report {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Started tasks that are behind, most behind first
    Lagging {
        #[command(flatten)]
        input: SnapshotArgs,
    },
}

pub fn run(action: ScoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, calendar) = settings()?;
    let analyzer = config.rollup_analyzer(calendar);

    match action {
        ScoreAction::Task { input } => {
            let tasks = input.load()?.scored_tasks();
            let scores = analyzer.score_all(&tasks, input.now()?);
            print_json(&scores)?;
        }
        ScoreAction::Window { window, input } => {
            let tasks = input.load()?.scored_tasks();
            let rollup = analyzer.summarize_window(&tasks, window, input.now()?);
            print_json(&rollup)?;
        }
        ScoreAction::Report { input } => {
            let tasks = input.load()?.scored_tasks();
            print_json(&analyzer.report(&tasks, input.now()?))?;
        }
        ScoreAction::Lagging { input } => {
            let tasks = input.load()?.scored_tasks();
            print_json(&analyzer.lagging_actions(&tasks, input.now()?))?;
        }
    }
    Ok(())
}
