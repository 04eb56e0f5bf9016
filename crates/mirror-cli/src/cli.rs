//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mirror Manager - Reconcile a remote repository feed against a local mirror
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Synchronize the mirror against a feed directory
    ///
    /// Loads packages.json and advisories.json from the feed, reconciles
    /// them against the inventory ledger, transfers what is new or
    /// missing, and removes what has been orphaned.
    Sync {
        /// Feed directory holding packages.json / advisories.json
        #[arg(long)]
        feed: PathBuf,

        /// Mirror root; artifacts are stored beneath it
        #[arg(long)]
        root: PathBuf,

        /// Directory artifacts are fetched from (defaults to <feed>/artifacts)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Inventory ledger path (defaults to <root>/.mirror/ledger.toml)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Repository identifier used for the mirror-link directory
        #[arg(long, default_value = "default")]
        repo_id: String,

        /// Output the full report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show inventory counts from the ledger
    Status {
        /// Mirror root
        #[arg(long)]
        root: PathBuf,

        /// Inventory ledger path (defaults to <root>/.mirror/ledger.toml)
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Verify that every inventory artifact still exists on disk
    Check {
        /// Mirror root
        #[arg(long)]
        root: PathBuf,

        /// Inventory ledger path (defaults to <root>/.mirror/ledger.toml)
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
}
