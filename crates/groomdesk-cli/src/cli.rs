use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "groomdesk")]
#[command(about = "Manage grooming records locally and sync them when online")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local store file
    #[arg(long, global = true, value_name = "PATH")]
    pub store_path: Option<PathBuf>,

    /// Start offline: writes are queued and nothing is sent
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a record from a JSON object
    #[command(alias = "new")]
    Add {
        /// client, appointment, service, product or employee
        kind: String,
        /// Record fields, e.g. '{"name": "Max"}'
        json: String,
    },
    /// List cached records of one kind
    #[command(alias = "ls")]
    List {
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge a JSON patch into an existing record
    Update {
        kind: String,
        id: String,
        /// Fields to change, e.g. '{"stock": 5}'
        json: String,
    },
    /// Delete a record
    #[command(alias = "rm")]
    Delete { kind: String, id: String },
    /// Inspect or drain the sync queue
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Show or update the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Wipe the local store and the sync queue
    Reset {
        /// Discard unsynced changes too
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show connectivity, pending count and last sync
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay pending mutations now
    Now,
    /// List pending mutations in replay order
    Queue {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create the config file or update the given values
    Init {
        /// Base URL of the REST API, e.g. <https://api.example.com/v1>
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Path of the local store file
        #[arg(long, value_name = "PATH")]
        store: Option<String>,
        /// Request timeout in seconds (0 disables it)
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// Print the current config
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
