//! CLI argument definitions for n8ncli.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Version string including the git commit and build timestamp from build.rs.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("N8NCLI_GIT_COMMIT"),
    ", built ",
    env!("N8NCLI_BUILD_TIMESTAMP"),
    ")"
);

/// n8ncli - manage n8n workflows from the command line.
///
/// Connection settings are resolved from `--host`/`--api-key` flags, the
/// `N8N_HOST`/`N8N_API_KEY` environment variables, and `~/.n8ncli.json`,
/// in that order. Run `n8ncli config` to see what is currently in effect.
#[derive(Parser, Debug)]
#[command(name = "n8ncli")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "CLI for interacting with the n8n API", long_about = None)]
pub struct Cli {
    /// n8n instance URL, including the API base path (overrides N8N_HOST)
    #[arg(long, global = true, value_name = "URL")]
    pub host: Option<String>,

    /// API key (overrides N8N_API_KEY)
    #[arg(long = "api-key", global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage n8n workflows
    Workflows {
        #[command(subcommand)]
        command: WorkflowCommands,
    },

    /// Test the connection to the n8n API
    Test,

    /// Show or modify the stored configuration
    ///
    /// Without a subcommand, shows the resolved configuration and where
    /// each value came from.
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Workflow subcommands
#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// List workflows
    List {
        /// Show only active workflows
        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        /// Show only inactive workflows
        #[arg(long)]
        inactive: bool,

        /// Limit number of results
        #[arg(short, long)]
        limit: Option<u32>,

        /// Filter by tags (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,

        /// Pagination cursor from a previous response
        #[arg(long)]
        cursor: Option<String>,

        /// Output format for human-readable mode
        #[arg(short, long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Get a workflow by ID
    Get {
        /// Workflow ID
        id: String,
    },

    /// Create a new workflow
    Create {
        /// Name for an empty workflow
        #[arg(short, long, conflicts_with = "file")]
        name: Option<String>,

        /// Read the workflow definition from a JSON file
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Update an existing workflow
    Update {
        /// Workflow ID
        id: String,

        /// New workflow name
        #[arg(short, long, conflicts_with = "file")]
        name: Option<String>,

        /// Read the updated definition from a JSON file
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Delete a workflow
    Delete {
        /// Workflow ID
        id: String,
    },

    /// Activate a workflow
    Activate {
        /// Workflow ID
        id: String,
    },

    /// Deactivate a workflow
    Deactivate {
        /// Workflow ID
        id: String,
    },
}

/// Human-readable output formats for `workflows list`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Aligned columns with a header row
    Table,
    /// Workflow IDs only, one per line
    Minimal,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and value sources
    Show,

    /// Get a single configuration value
    Get {
        /// Configuration key (host or apikey)
        key: String,
    },

    /// Set a configuration value in ~/.n8ncli.json
    Set {
        /// Configuration key (host or apikey)
        key: String,

        /// Value to store
        value: String,
    },

    /// Delete the persisted configuration file
    Clear,

    /// Print the path of the persisted configuration file
    Path,
}
