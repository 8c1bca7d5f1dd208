use clap::Subcommand;
use okrbox_core::board::{evidence_feed, record_evidence, NewEvidence};

use super::input::{print_json, SnapshotArgs};

#[derive(Subcommand)]
pub enum EvidenceAction {
    /// Ten most recent evidence records
    List {
        #[command(flatten)]
        input: SnapshotArgs,
    },
    /// Log evidence for an action and rewrite the snapshot
    Add {
        /// Action the evidence belongs to
        #[arg(long)]
        action: String,
        /// Evidence title
        #[arg(long)]
        title: String,
        /// Evidence type (default Note)
        #[arg(long)]
        kind: Option<String>,
        /// Link to the artifact
        #[arg(long)]
        link: Option<String>,
        /// Key result; defaults to the action's first one
        #[arg(long)]
        kr: Option<String>,
        #[command(flatten)]
        input: SnapshotArgs,
    },
}

pub fn run(action: EvidenceAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EvidenceAction::List { input } => {
            let snapshot = input.load()?;
            print_json(&evidence_feed(&snapshot))?;
        }
        EvidenceAction::Add {
            action,
            title,
            kind,
            link,
            kr,
            input,
        } => {
            let now = input.now()?;
            let mut snapshot = input.load()?;
            let recorded = record_evidence(
                &mut snapshot,
                NewEvidence {
                    title,
                    kind,
                    link,
                    action_id: Some(action),
                    key_result_id: kr,
                },
                now,
            )?
            .clone();
            input.save(&snapshot)?;
            print_json(&recorded)?;
        }
    }
    Ok(())
}
