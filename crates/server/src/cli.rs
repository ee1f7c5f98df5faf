//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "jobfeed-server", version, about = "Job listing ingestion and API server")]
pub struct Cli {
    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP API and the refresh scheduler.
    Serve,
    /// Run one ingestion pass and print the report.
    Ingest {
        /// Read the payload from a saved JSON file instead of the external API.
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Apply database migrations and exit.
    Migrate,
}
