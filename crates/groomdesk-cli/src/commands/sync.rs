use chrono::Utc;
use groomdesk_core::DrainOutcome;

use crate::commands::common::{
    describe_outcome, format_queue_lines, format_status_lines, CliContext,
};
use crate::error::CliError;

pub fn run_sync_status(context: &CliContext, as_json: bool) -> Result<(), CliError> {
    let status = context.service.status();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for line in format_status_lines(&status, Utc::now()) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_sync_now(context: &CliContext) -> Result<(), CliError> {
    let Some(remote) = context.remote.clone() else {
        return Err(CliError::SyncNotConfigured);
    };

    let reporter = context.service.reporter(remote);
    let outcome = reporter.sync_now().await;
    println!(
        "{}",
        describe_outcome(&outcome, reporter.status().pending_count)
    );

    match outcome {
        DrainOutcome::Stalled { error, .. } => Err(CliError::SyncStalled(error)),
        _ => Ok(()),
    }
}

pub fn run_sync_queue(context: &CliContext, as_json: bool) -> Result<(), CliError> {
    let entries = context.service.pending_mutations();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Sync queue is empty.");
        return Ok(());
    }

    for line in format_queue_lines(&entries, Utc::now()) {
        println!("{line}");
    }
    Ok(())
}
