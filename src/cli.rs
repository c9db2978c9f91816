//! CLI definitions for FeedFill.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FeedFill CLI.
#[derive(Parser)]
#[command(name = "feedfill")]
#[command(about = "Fills feed comment boxes from a comment generator")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true, env = "FEEDFILL_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Load a feed fixture and run the auto-fill runtime on it
    Run {
        /// Feed fixture (JSON document spec)
        #[arg(long)]
        feed: PathBuf,

        /// Stop after this many seconds (default: run until Ctrl-C)
        #[arg(long)]
        duration_secs: Option<u64>,

        /// Write the final document snapshot to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Call the generator once and print the comment
    Generate {
        /// Post text
        #[arg(long)]
        text: String,

        /// Post author
        #[arg(long)]
        author: String,

        /// Refinement instruction
        #[arg(long, requires = "draft")]
        refinement: Option<String>,

        /// Current draft to refine
        #[arg(long, requires = "refinement")]
        draft: Option<String>,
    },

    /// Settings store commands
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Insert text into the post composer of a feed fixture
    Compose {
        /// Feed fixture (JSON document spec)
        #[arg(long)]
        feed: PathBuf,

        /// Text to insert
        #[arg(long)]
        text: String,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Print a value
    Get {
        key: String,
    },

    /// Store a value. Parsed as JSON, stored as a string otherwise.
    Set {
        key: String,
        value: String,
    },

    /// Remove a value
    Remove {
        key: String,
    },

    /// Print every stored value
    List,
}
