use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "okrbox", version, about = "okrbox CLI")]
pub(crate) struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule adherence scores
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Key results without recent evidence
    Drift {
        #[command(flatten)]
        input: commands::input::SnapshotArgs,
    },
    /// Today's actions and the backlog
    Today {
        #[command(flatten)]
        input: commands::input::SnapshotArgs,
    },
    /// Backlog actions, optionally for one key result
    Bank {
        #[command(flatten)]
        input: commands::input::SnapshotArgs,
        /// Only actions linked to this key result
        #[arg(long)]
        kr: Option<String>,
    },
    /// Create, move or complete actions
    Action {
        #[command(subcommand)]
        action: commands::action::ActionAction,
    },
    /// Evidence feed and logging
    Evidence {
        #[command(subcommand)]
        action: commands::evidence::EvidenceAction,
    },
    /// Parking lot of ideas
    Idea {
        #[command(subcommand)]
        action: commands::idea::IdeaAction,
    },
    /// Write a demo plan snapshot
    Demo {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<std::path::PathBuf>,
        /// Evaluation instant (RFC 3339 or epoch ms)
        #[arg(long)]
        now: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let mut config_error = None;
    let filter = if verbose {
        EnvFilter::new("okrbox=debug,okrbox_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = match okrbox_core::Config::load() {
                Ok(config) => config.log.level,
                Err(e) => {
                    config_error = Some(e);
                    okrbox_core::Config::default().log.level
                }
            };
            EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        warn!("using default log level: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Score { action } => commands::score::run(action),
        Commands::Drift { input } => commands::drift::run(input),
        Commands::Today { input } => commands::board::today(input),
        Commands::Bank { input, kr } => commands::board::bank(input, kr),
        Commands::Action { action } => commands::action::run(action),
        Commands::Evidence { action } => commands::evidence::run(action),
        Commands::Idea { action } => commands::idea::run(action),
        Commands::Demo { out, now } => commands::demo::run(out, now),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
