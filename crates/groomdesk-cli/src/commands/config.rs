use std::path::Path;

use groomdesk_core::config::{default_config_path, GroomdeskConfig};
use groomdesk_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::error::CliError;

/// Values given on the command line; `None` leaves the stored value alone.
#[derive(Debug, Default)]
pub struct ConfigUpdates {
    pub api_base_url: Option<String>,
    pub store_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            store,
            timeout_secs,
        } => run_config_init(ConfigUpdates {
            api_base_url,
            store_path: store,
            request_timeout_secs: timeout_secs,
        }),
        ConfigCommands::Show { json } => run_config_show(json),
    }
}

pub fn run_config_init(updates: ConfigUpdates) -> Result<(), CliError> {
    let config = apply_config_updates(GroomdeskConfig::load()?, updates);
    let path = config.save()?;
    println!("Config saved to {}", path.display());
    Ok(())
}

pub fn run_config_show(as_json: bool) -> Result<(), CliError> {
    let path = default_config_path()?;
    let config = GroomdeskConfig::load_from_path(&path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    for line in format_config_lines(&path, &config) {
        println!("{line}");
    }
    Ok(())
}

/// Merge command-line values over the stored config. Blank strings count as
/// not given.
pub fn apply_config_updates(
    mut config: GroomdeskConfig,
    updates: ConfigUpdates,
) -> GroomdeskConfig {
    if let Some(url) = normalize_text_option(updates.api_base_url) {
        config.api_base_url = Some(url);
    }
    if let Some(path) = normalize_text_option(updates.store_path) {
        config.store_path = Some(path);
    }
    if let Some(secs) = updates.request_timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    config
}

pub fn format_config_lines(path: &Path, config: &GroomdeskConfig) -> Vec<String> {
    let unset = || "(not set)".to_string();
    vec![
        format!("Config file: {}", path.display()),
        format!(
            "API base URL: {}",
            config.api_base_url.clone().unwrap_or_else(unset)
        ),
        format!(
            "Store path: {}",
            config.store_path.clone().unwrap_or_else(|| "(default)".to_string())
        ),
        format!(
            "Request timeout: {}",
            config
                .request_timeout()
                .map_or_else(unset, |timeout| format!("{}s", timeout.as_secs()))
        ),
    ]
}
