//! Mirror Manager CLI
//!
//! The command-line interface for synchronizing a local mirror against a
//! remote repository feed.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Sync {
            feed,
            root,
            source,
            ledger,
            repo_id,
            json,
        }) => commands::run_sync(&feed, &root, source, ledger, &repo_id, json),
        Some(Commands::Status { root, ledger, json }) => {
            commands::run_status(&root, ledger, json)?;
            Ok(true)
        }
        Some(Commands::Check { root, ledger }) => commands::run_check(&root, ledger),
        None => {
            println!("{} Mirror Manager CLI", "mirror".green().bold());
            println!();
            println!("Run {} for available commands.", "mirror --help".cyan());
            Ok(true)
        }
    }
}
