use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tenantimport", about = "Bulk customer import for the PG admin backend", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate a file without importing it
    Check {
        /// Spreadsheet or CSV file to check
        file: PathBuf,

        /// JSON file with the block list to validate against
        #[arg(long, conflicts_with = "fetch_blocks")]
        blocks: Option<PathBuf>,

        /// Load the block list from the configured backend
        #[arg(long)]
        fetch_blocks: bool,

        /// Write invalid rows and their errors to this CSV file
        #[arg(long)]
        errors_out: Option<PathBuf>,
    },

    /// Validate a file and import its valid rows
    Import {
        /// Spreadsheet or CSV file to import
        file: PathBuf,

        /// Stop after the preview
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the backend settings to the config file
    Init {
        /// Backend base URL
        #[arg(long)]
        base_url: String,

        /// Tenant the customers belong to
        #[arg(long)]
        tenant_id: String,

        /// Admin performing the import
        #[arg(long)]
        admin_id: String,

        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Write an empty import template
    Template {
        /// Output path
        out: PathBuf,
    },

    /// Launch the desktop application
    #[cfg(feature = "desktop")]
    Gui,
}
