//! CLI definitions and entry point.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Issue tracker backend (`SQLite` + JSON-RPC)
#[derive(Parser, Debug)]
#[command(name = "tl", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (auto-discover .tracklet/*.db if not set)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Actor name attached to RPC calls
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a tracklet workspace
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Populate the database with demo data
    Seed,

    /// Serve the RPC surface on stdin/stdout
    Serve,

    /// Invoke a single RPC method
    Call {
        /// Method name, e.g. issues.updateStatus
        method: String,

        /// Params as a JSON object
        params: Option<String>,
    },

    /// Print JSON Schemas for every RPC method's params
    Schema,
}
