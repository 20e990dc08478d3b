//! Groomdesk CLI - offline-first record keeping for a grooming business
//!
//! Every write lands in the local store first and is replayed against the
//! API when a connection is available.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::reset::run_reset;
use crate::commands::sync::{run_sync_now, run_sync_queue, run_sync_status};
use crate::commands::update::run_update;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("groomdesk=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = match cli.command {
        Commands::Completions { shell, output } => {
            return run_completions(shell, output.as_deref());
        }
        Commands::Config { command } => return run_config(command),
        command => command,
    };

    let context = CliContext::open(cli.store_path, cli.offline)?;

    match command {
        Commands::Add { kind, json } => run_add(&context, &kind, &json).await?,
        Commands::List { kind, json } => run_list(&context, &kind, json)?,
        Commands::Update { kind, id, json } => run_update(&context, &kind, &id, &json).await?,
        Commands::Delete { kind, id } => run_delete(&context, &kind, &id).await?,
        Commands::Sync { command } => match command {
            SyncCommands::Status { json } => run_sync_status(&context, json)?,
            SyncCommands::Now => run_sync_now(&context).await?,
            SyncCommands::Queue { json } => run_sync_queue(&context, json)?,
        },
        Commands::Reset { force } => run_reset(&context, force)?,
        Commands::Completions { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}
