//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sigscan: check one file for one byte signature
#[derive(Parser, Debug)]
#[command(name = "sigscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Use this configuration file instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine processing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Scan a file for a signature (prompts for missing paths)
    Scan {
        /// Signature definition file
        #[arg(short, long)]
        signature: Option<PathBuf>,

        /// File to scan
        #[arg(short, long)]
        target: Option<PathBuf>,
    },

    /// Parse a signature definition and print it
    Inspect {
        /// Signature definition file
        signature: PathBuf,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Scan {
            signature: None,
            target: None,
        }
    }
}

/// Configuration subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print configuration file location
    Path,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
