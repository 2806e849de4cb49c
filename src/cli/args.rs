//! Command line argument parsing for the boolsearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Boolsearch - run boolean query plans against a pre-tokenized corpus
#[derive(Parser, Debug, Clone)]
#[command(name = "boolsearch")]
#[command(about = "Run must/should/must-not query plans against an in-memory index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BoolSearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug, 4=trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BoolSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a query plan and print the top hits
    Search(SearchArgs),

    /// Build the searcher tree of a plan and print its statistics
    Inspect(InspectArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Corpus file: a JSON array of pre-tokenized documents
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: PathBuf,

    /// Query plan file (JSON)
    #[arg(short = 'Q', long, value_name = "PLAN_FILE")]
    pub query: PathBuf,

    /// Search configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Include score explanations in results
    #[arg(long)]
    pub explain: bool,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Minimum score threshold for results
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Arguments for inspecting a plan
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Corpus file: a JSON array of pre-tokenized documents
    #[arg(short, long, value_name = "INDEX_FILE")]
    pub index: PathBuf,

    /// Query plan file (JSON)
    #[arg(short = 'Q', long, value_name = "PLAN_FILE")]
    pub query: PathBuf,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
