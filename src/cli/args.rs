//! Command line argument parsing for the caselex CLI using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// caselex - a disk-backed inverted index for legal case retrieval
#[derive(Parser, Debug, Clone)]
#[command(name = "caselex")]
#[command(about = "Build and query a zone-aware inverted index over legal cases")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct CaselexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CaselexArgs {
    /// Get the effective verbosity level.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from pre-tokenized documents
    Index(IndexArgs),

    /// Run parsed queries against an index
    Search(SearchArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Arguments for building an index.
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Input file: one JSON document record per line
    #[arg(short, long, value_name = "DOCS_FILE")]
    pub input: PathBuf,

    /// Directory to write the index into
    #[arg(short = 'd', long, value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// In-memory postings budget in bytes before spilling a block
    #[arg(long, value_name = "BYTES")]
    pub memory_limit: Option<usize>,
}

/// Arguments for searching an index.
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Directory containing the index
    #[arg(short = 'd', long, value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    /// Queries file: one JSON parsed-query object per line
    #[arg(short, long, value_name = "QUERIES_FILE")]
    pub queries: PathBuf,

    /// Results file (defaults to stdout)
    #[arg(short, long, value_name = "RESULTS_FILE")]
    pub output: Option<PathBuf>,

    /// Number of results per ranked query
    #[arg(short = 'k', long, value_name = "K")]
    pub top_k: Option<usize>,
}

/// Arguments for showing index statistics.
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Directory containing the index
    #[arg(short = 'd', long, value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,
}
