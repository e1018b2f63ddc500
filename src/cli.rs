//! Command-line interface definition for Reelscript
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for generation, length budgeting, the selection
//! catalog, history management and authentication.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelscript - narration script generator
///
/// Turns an idea, a source text or a link into a video narration script
/// sized to a target speaking duration.
#[derive(Parser, Debug, Clone)]
#[command(name = "reelscript")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Override the history database location
    #[arg(long, env = "REELSCRIPT_STORAGE_PATH")]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Reelscript
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a script and record it in history
    Generate {
        /// Idea, source text or link (reads --file or stdin when omitted)
        input: Option<String>,

        /// Read the input from a file
        #[arg(short, long, conflicts_with = "input")]
        file: Option<PathBuf>,

        /// How to interpret the input: idea, text or link
        #[arg(short, long, default_value = "idea")]
        mode: String,

        /// Template id (see `reelscript catalog`)
        #[arg(short, long)]
        template: Option<String>,

        /// Output language id
        #[arg(short, long)]
        language: Option<String>,

        /// Duration bucket id, or "custom" together with --minutes
        #[arg(short, long)]
        duration: Option<String>,

        /// Minutes for the custom duration bucket (1-120)
        #[arg(long)]
        minutes: Option<u32>,

        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Also write the script to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the character budget for a language and duration
    Stats {
        /// Output language id
        #[arg(short, long)]
        language: Option<String>,

        /// Duration bucket id
        #[arg(short, long)]
        duration: Option<String>,

        /// Minutes for the custom duration bucket
        #[arg(long)]
        minutes: Option<u32>,

        /// Print the budget as JSON
        #[arg(long)]
        json: bool,
    },

    /// List templates, languages and duration buckets
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage generated script history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Store provider credentials in the system keyring
    Auth {
        /// Provider to authenticate with (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored scripts, newest first
    List {
        /// Print the history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a stored script
    Show {
        /// Script id (full id or unique prefix)
        id: String,
    },

    /// Delete a stored script
    Delete {
        /// Script id (full id or unique prefix)
        id: String,
    },

    /// Delete all stored scripts
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            storage_path: None,
            command: Commands::Catalog { json: false },
        }
    }
}
