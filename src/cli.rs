use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollbook")]
#[command(author, version, about = "Create the student roll database schema")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Store location (file path or sqlite:// URL), overrides the config file
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    // None runs `bootstrap`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create any missing tables in the store (the default)
    Bootstrap,

    /// Print the table definitions without touching the store
    Schema {
        /// Output the descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the tables and columns of an existing store
    Inspect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}
