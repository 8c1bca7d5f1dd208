use clap::{ArgGroup, Subcommand};
use okrbox_core::board::{complete_action, create_action, move_action, Completion, NewAction};
use okrbox_core::ActionStatus;

use super::input::{print_json, SnapshotArgs};

#[derive(Subcommand)]
pub enum ActionAction {
    /// Add a backlog action; over 30 minutes it needs a key result
    Create {
        /// Action title
        #[arg(long)]
        title: String,
        /// Estimated minutes
        #[arg(long)]
        minutes: f64,
        /// Key result the action advances
        #[arg(long)]
        kr: Option<String>,
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Set an action's status and rewrite the snapshot
    Move {
        /// Action id
        id: String,
        /// New status (Backlog, Today, Doing, Done, Blocked)
        status: String,
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Log evidence for an action and mark it Done
    #[command(group(ArgGroup::new("outcome").required(true).args(["evidence", "failure"])))]
    Complete {
        /// Action id
        id: String,
        /// Evidence title
        #[arg(long)]
        evidence: Option<String>,
        /// Evidence type
        #[arg(long)]
        kind: Option<String>,
        /// Evidence link
        #[arg(long)]
        link: Option<String>,
        /// Why the action was abandoned
        #[arg(long)]
        failure: Option<String>,
        #[command(flatten)]
        input: SnapshotArgs,
    },
}

pub fn run(action: ActionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ActionAction::Create {
            title,
            minutes,
            kr,
            input,
        } => {
            let mut snapshot = input.load()?;
            let created = create_action(
                &mut snapshot,
                NewAction {
                    title,
                    est_minutes: minutes,
                    key_result_id: kr,
                },
            )?
            .clone();
            input.save(&snapshot)?;
            print_json(&created)?;
        }
        ActionAction::Move { id, status, input } => {
            let mut snapshot = input.load()?;
            let status = ActionStatus::from(status);
            move_action(&mut snapshot, &id, status.clone())?;
            input.save(&snapshot)?;
            println!("{id} -> {status}");
        }
        ActionAction::Complete {
            id,
            evidence,
            kind,
            link,
            failure,
            input,
        } => {
            let now = input.now()?;
            let completion = match (evidence, failure) {
                (Some(title), _) => Completion::Evidence { title, kind, link },
                (None, Some(reason)) => Completion::Failure(reason),
                (None, None) => return Err("either --evidence or --failure is required".into()),
            };
            let mut snapshot = input.load()?;
            complete_action(&mut snapshot, &id, completion, now)?;
            input.save(&snapshot)?;
            println!("{id} -> {}", ActionStatus::Done);
        }
    }
    Ok(())
}
