use clap::Subcommand;
use okrbox_core::board::{record_idea, NewIdea};
use okrbox_core::Board;

use super::input::{print_json, settings, SnapshotArgs};

#[derive(Subcommand)]
pub enum IdeaAction {
    /// Parked ideas with their key result
    List {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Park an idea and rewrite the snapshot
    Add {
        /// Idea title
        #[arg(long)]
        title: String,
        /// Estimated minutes
        #[arg(long)]
        minutes: f64,
        /// Key result the idea would serve
        #[arg(long)]
        kr: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        input: SnapshotArgs,
    },
}

pub fn run(action: IdeaAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        IdeaAction::List { input } => {
            let (_, calendar) = settings()?;
            let snapshot = input.load()?;
            print_json(&Board::new(calendar).ideas(&snapshot))?;
        }
        IdeaAction::Add {
            title,
            minutes,
            kr,
            notes,
            input,
        } => {
            let mut snapshot = input.load()?;
            let parked = record_idea(
                &mut snapshot,
                NewIdea {
                    title,
                    est_minutes: minutes,
                    key_result_id: kr,
                    notes,
                },
            )?
            .clone();
            input.save(&snapshot)?;
            print_json(&parked)?;
        }
    }
    Ok(())
}
