//! # Tierstate CLI Module
//!
//! This module implements the CLI interface for tierstate.
//!
//! ## Available Commands
//!
//! - `tiers` - Show the active tier table
//! - `classify` - Show the tier a score falls into
//! - `run` - Drive a context through a sequence of score deltas
//! - `validate` - Check a tier table configuration
//! - `inspect` - Decode a snapshot file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tierstate_core::TierError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tierstate - tiered score classification
///
/// Tracks a subject's score and keeps it classified in exactly one tier.
#[derive(Parser, Debug)]
#[command(name = "tierstate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Tier table configuration (TOML). Defaults to Low/Middle/High.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active tier table
    Tiers,

    /// Show the tier a score falls into
    Classify {
        /// Score to classify
        #[arg(short, long, allow_hyphen_values = true)]
        score: i64,
    },

    /// Apply score deltas to a subject and report transitions
    Run {
        /// Subject name
        #[arg(short, long, default_value = "subject")]
        name: String,

        /// Starting score
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        initial: i64,

        /// Score delta to apply (repeatable, applied in order)
        #[arg(short, long = "delta", allow_hyphen_values = true)]
        deltas: Vec<i64>,

        /// Resume from a snapshot instead of --name/--initial
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Write a snapshot after the last delta
        #[arg(short = 'o', long)]
        save: Option<PathBuf>,
    },

    /// Validate a tier table configuration
    Validate,

    /// Decode a snapshot file
    Inspect {
        /// Snapshot file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TierError> {
    let config = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Tiers) => cmd_tiers(config, json_mode),
        Some(Commands::Classify { score }) => cmd_classify(config, json_mode, score),
        Some(Commands::Run {
            name,
            initial,
            deltas,
            resume,
            save,
        }) => cmd_run(
            config,
            json_mode,
            RunOptions {
                name,
                initial,
                deltas,
                resume,
                save,
            },
        ),
        Some(Commands::Validate) => cmd_validate(config, json_mode),
        Some(Commands::Inspect { input }) => cmd_inspect(&input, json_mode),
        None => {
            // No subcommand - show the tier table by default
            cmd_tiers(config, json_mode)
        }
    }
}
