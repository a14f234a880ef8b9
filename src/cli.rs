use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fmsuit")]
#[command(version)]
#[command(about = "Frontend Mentor challenges in your terminal", long_about = None)]
pub struct Cli {
    /// Override the data directory (session, catalog and config files)
    #[arg(long, env = "FMSUIT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the startup sequence and print the challenge catalog
    List,
    /// Synchronize the catalog (cache-aware unless --force)
    Sync {
        /// Ignore the snapshot TTL and re-scrape unconditionally
        #[arg(long)]
        force: bool,
    },
    /// Update the progress status of one challenge
    SetStatus {
        id: u64,
        /// One of: pending, started, completed, new_start
        status: String,
    },
    /// Download the starter archive for a challenge into the configured path
    Download { id: u64 },
    /// Print the resolved data file locations
    Paths,
}
