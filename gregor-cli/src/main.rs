//! # gregor-cli
//!
//! CLI tool for replaying gregor pushes through the router.
//!
//! ## Commands
//!
//! - `replay`: Feed a recorded event log through the router and print the
//!   intents it emits, one JSON object per line
//! - `normalize`: Normalize a single snapshot and report dropped records
//!
//! ## Example
//!
//! ```bash
//! # Replay a session log as alice
//! gregor-cli replay events.json --user alice
//!
//! # Keep the seen-message map between runs
//! gregor-cli replay events.json --user alice --seen seen.json
//!
//! # Inspect a snapshot
//! gregor-cli normalize state.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{normalize, replay};

/// CLI tool for replaying gregor pushes through the router.
#[derive(Parser, Debug)]
#[command(name = "gregor-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Router configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON event log through the router
    Replay {
        /// Event log: a JSON array of events
        events: PathBuf,

        /// Logged-in username (logged out if omitted)
        #[arg(long, short)]
        user: Option<String>,

        /// Seen-message file to load before and save after the replay
        #[arg(long)]
        seen: Option<PathBuf>,

        /// Reachability answered by the mock engine
        #[arg(long, default_value = "yes")]
        reachable: replay::ReachableArg,

        /// Clock for snapshot handling, epoch milliseconds (default: now)
        #[arg(long)]
        now_ms: Option<i64>,
    },

    /// Normalize a snapshot and report lost records
    Normalize {
        /// Snapshot file: a JSON object with an `items` array
        state: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            events,
            user,
            seen,
            reachable,
            now_ms,
        } => {
            let config = config::load(cli.config.as_deref())?;
            let options = replay::Options {
                events,
                user,
                seen,
                reachable,
                now_ms,
            };
            replay::run(config, options).await?;
        }
        Commands::Normalize { state } => {
            normalize::run(&state).await?;
        }
    }

    Ok(())
}
