use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use groomdesk_core::config::GroomdeskConfig;
use groomdesk_core::remote::HttpRemote;
use groomdesk_core::services::LocalDataService;
use groomdesk_core::sync::SkipReason;
use groomdesk_core::util::{format_relative_time, normalize_text_option};
use groomdesk_core::{DrainOutcome, EntityId, EntityKind, PendingMutation, SyncStatus};
use serde_json::Value;

use crate::error::CliError;

/// Everything a command needs: the local data layer and, when configured,
/// the API the queue replays against.
pub struct CliContext {
    pub service: LocalDataService,
    pub remote: Option<Arc<HttpRemote>>,
}

impl CliContext {
    pub fn open(cli_store_path: Option<PathBuf>, offline: bool) -> Result<Self, CliError> {
        let config = GroomdeskConfig::load()?;
        let remote = resolve_remote(
            &config,
            env::var("GROOMDESK_API_URL").ok(),
            env::var("GROOMDESK_API_TOKEN").ok(),
        )?;
        let store_path = resolve_store_path(cli_store_path, &config)?;
        let online = !offline && remote.is_some();

        Ok(Self {
            service: LocalDataService::open_path(store_path, online)?,
            remote: remote.map(Arc::new),
        })
    }

    /// Context over an in-memory store
    #[cfg(test)]
    pub fn in_memory(remote: Option<HttpRemote>, online: bool) -> Self {
        Self {
            service: LocalDataService::open_in_memory(online),
            remote: remote.map(Arc::new),
        }
    }

    /// Try to replay queued writes right after a local change.
    ///
    /// A failed replay is reported but never fails the command; the write is
    /// already stored locally and stays queued.
    pub async fn sync_after_write(&self) {
        let Some(remote) = self.remote.as_deref() else {
            return;
        };
        if !self.service.connectivity().is_online() {
            return;
        }

        if let DrainOutcome::Stalled { error, remaining, .. } =
            self.service.sync_now(remote).await
        {
            eprintln!("Warning: sync failed ({error}); {remaining} change(s) still queued");
        }
    }
}

pub fn resolve_store_path(
    cli_store_path: Option<PathBuf>,
    config: &GroomdeskConfig,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_store_path {
        return Ok(path);
    }
    if let Some(path) = env::var_os("GROOMDESK_STORE_PATH").filter(|path| !path.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(config.resolved_store_path()?)
}

/// Build the remote from the environment, falling back to the config file.
/// Returns `None` when no API base URL is known.
pub fn resolve_remote(
    config: &GroomdeskConfig,
    env_url: Option<String>,
    env_token: Option<String>,
) -> Result<Option<HttpRemote>, CliError> {
    let Some(base_url) =
        normalize_text_option(env_url).or_else(|| config.api_base_url.clone())
    else {
        return Ok(None);
    };

    let remote = HttpRemote::new(
        base_url,
        normalize_text_option(env_token),
        config.request_timeout(),
    )?;
    Ok(Some(remote))
}

pub fn parse_kind(raw: &str) -> Result<EntityKind, CliError> {
    Ok(raw.parse::<EntityKind>()?)
}

pub fn normalize_record_id(raw: &str) -> Result<EntityId, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyRecordId);
    }
    Ok(trimmed
        .parse::<EntityId>()
        .unwrap_or_else(|never| match never {}))
}

/// Ids a command-line argument may refer to, most likely first.
///
/// A numeric argument also matches a record whose id is the same digits
/// stored as a string, since the shell cannot tell the two apart.
pub fn record_id_candidates(raw: &str) -> Result<Vec<EntityId>, CliError> {
    let id = normalize_record_id(raw)?;
    let mut candidates = vec![id];
    if matches!(candidates[0], EntityId::Number(_)) {
        candidates.push(EntityId::Text(raw.trim().to_string()));
    }
    Ok(candidates)
}

/// Parse a JSON object argument
pub fn parse_json_object(raw: &str) -> Result<Value, CliError> {
    let value = serde_json::from_str::<Value>(raw)
        .map_err(|error| CliError::InvalidJson(error.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::InvalidJson("expected a JSON object".to_string()))
    }
}

/// Short human label for a record: its name, else its start time.
pub fn record_label(record: &Value) -> String {
    ["name", "starts_at", "sku"]
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .map_or_else(|| record.to_string(), ToString::to_string)
}

pub fn record_id(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => "-".to_string(),
    }
}

pub fn format_record_lines(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let id = record_id(record);
            let short_id = id.chars().take(13).collect::<String>();
            format!("{short_id:<13}  {}", record_label(record))
        })
        .collect()
}

pub fn format_queue_lines(entries: &[PendingMutation], now: DateTime<Utc>) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = entry.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            format!(
                "{:>3}  {:<6}  {:<11}  {short_id:<13}  {}",
                index + 1,
                entry.action.as_str(),
                entry.kind.as_str(),
                format_relative_time(entry.last_modified, now)
            )
        })
        .collect()
}

pub fn format_status_lines(status: &SyncStatus, now: DateTime<Utc>) -> Vec<String> {
    vec![
        format!(
            "Connection: {}",
            if status.is_online { "online" } else { "offline" }
        ),
        format!("Syncing:    {}", if status.is_syncing { "yes" } else { "no" }),
        format!("Pending:    {} of {}", status.pending_count, status.total),
        format!("Last sync:  {}", status.last_sync_label(now)),
    ]
}

pub fn describe_outcome(outcome: &DrainOutcome, pending: usize) -> String {
    match outcome {
        DrainOutcome::Skipped(SkipReason::Empty) => "Nothing to sync".to_string(),
        DrainOutcome::Skipped(SkipReason::Offline) => {
            format!("Offline: {pending} change(s) queued")
        }
        DrainOutcome::Skipped(SkipReason::AlreadyDraining) => {
            "Sync already in progress".to_string()
        }
        DrainOutcome::Completed { synced, .. } => format!("Synced {synced} change(s)"),
        DrainOutcome::Stalled {
            synced, remaining, ..
        } => format!("Synced {synced} change(s), {remaining} still queued"),
    }
}
