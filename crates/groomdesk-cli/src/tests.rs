use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};
use clap::Parser;
use groomdesk_core::config::GroomdeskConfig;
use groomdesk_core::sync::SkipReason;
use groomdesk_core::{DrainOutcome, EntityId, EntityKind, SyncStatus};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::cli::{Cli, Commands, CompletionShell, ConfigCommands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::common::{
    describe_outcome, format_record_lines, format_status_lines, normalize_record_id,
    parse_json_object, parse_kind, record_id_candidates, record_label, resolve_remote,
    resolve_store_path, CliContext,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{apply_config_updates, format_config_lines, ConfigUpdates};
use crate::commands::delete::run_delete;
use crate::commands::reset::run_reset;
use crate::commands::sync::run_sync_now;
use crate::commands::update::run_update;
use crate::error::CliError;

#[test]
fn parse_json_object_requires_object() {
    assert_eq!(
        parse_json_object(r#"{"name": "Max"}"#).unwrap(),
        json!({"name": "Max"})
    );
    assert!(matches!(
        parse_json_object("[1, 2]"),
        Err(CliError::InvalidJson(_))
    ));
    assert!(matches!(
        parse_json_object("{name: Max}"),
        Err(CliError::InvalidJson(_))
    ));
}

#[test]
fn normalize_record_id_parses_numbers_and_text() {
    assert_eq!(normalize_record_id(" 42 ").unwrap(), EntityId::Number(42));
    assert_eq!(
        normalize_record_id("c-17").unwrap(),
        EntityId::Text("c-17".to_string())
    );
    assert!(matches!(
        normalize_record_id("   "),
        Err(CliError::EmptyRecordId)
    ));
}

#[test]
fn numeric_record_id_also_matches_string_id() {
    assert_eq!(
        record_id_candidates("007").unwrap(),
        vec![EntityId::Number(7), EntityId::Text("007".to_string())]
    );
    assert_eq!(
        record_id_candidates("c-17").unwrap(),
        vec![EntityId::Text("c-17".to_string())]
    );
    assert!(matches!(
        record_id_candidates(""),
        Err(CliError::EmptyRecordId)
    ));
}

#[test]
fn parse_kind_accepts_singular_and_plural() {
    assert_eq!(parse_kind("client").unwrap(), EntityKind::Client);
    assert_eq!(parse_kind("Products").unwrap(), EntityKind::Product);
    assert!(parse_kind("cats").is_err());
}

#[test]
fn record_lines_prefer_name_then_start_time() {
    let records = vec![
        json!({"id": 1, "name": "Max"}),
        json!({"id": "0194f1c2-7a3b-7c1d-9e2f-123456789abc", "starts_at": "2026-03-01T09:00:00Z"}),
    ];

    assert_eq!(
        format_record_lines(&records),
        vec![
            "1              Max".to_string(),
            "0194f1c2-7a3b  2026-03-01T09:00:00Z".to_string(),
        ]
    );
    assert_eq!(record_label(&json!({"id": 3})), r#"{"id":3}"#);
}

#[test]
fn status_lines_report_never_before_first_sync() {
    let status = SyncStatus {
        is_online: false,
        is_syncing: false,
        pending_count: 2,
        total: 2,
        last_sync_time: None,
    };

    assert_eq!(
        format_status_lines(&status, Utc::now()),
        vec![
            "Connection: offline".to_string(),
            "Syncing:    no".to_string(),
            "Pending:    2 of 2".to_string(),
            "Last sync:  never".to_string(),
        ]
    );
}

#[test]
fn status_lines_show_relative_last_sync() {
    let synced_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let status = SyncStatus {
        is_online: true,
        is_syncing: false,
        pending_count: 0,
        total: 0,
        last_sync_time: Some(synced_at),
    };

    let lines = format_status_lines(&status, synced_at + Duration::minutes(12));
    assert_eq!(lines[0], "Connection: online");
    assert_eq!(lines[3], "Last sync:  12m ago");
}

#[test]
fn describe_outcome_covers_each_case() {
    assert_eq!(
        describe_outcome(&DrainOutcome::Skipped(SkipReason::Empty), 0),
        "Nothing to sync"
    );
    assert_eq!(
        describe_outcome(&DrainOutcome::Skipped(SkipReason::Offline), 3),
        "Offline: 3 change(s) queued"
    );
    assert_eq!(
        describe_outcome(
            &DrainOutcome::Completed {
                synced: 2,
                remaining: 0
            },
            0
        ),
        "Synced 2 change(s)"
    );
    assert_eq!(
        describe_outcome(
            &DrainOutcome::Stalled {
                synced: 1,
                remaining: 2,
                error: "timeout".to_string()
            },
            2
        ),
        "Synced 1 change(s), 2 still queued"
    );
}

#[test]
fn resolve_remote_prefers_environment_url() {
    let config = GroomdeskConfig {
        api_base_url: Some("https://config.example.com".to_string()),
        ..GroomdeskConfig::default()
    };

    let remote = resolve_remote(
        &config,
        Some("https://env.example.com/v1/".to_string()),
        Some("token".to_string()),
    )
    .unwrap()
    .unwrap();
    assert_eq!(remote.base_url(), "https://env.example.com/v1");

    let remote = resolve_remote(&config, Some("  ".to_string()), None)
        .unwrap()
        .unwrap();
    assert_eq!(remote.base_url(), "https://config.example.com");
}

#[test]
fn resolve_remote_without_url_is_none() {
    let remote = resolve_remote(&GroomdeskConfig::default(), None, None).unwrap();
    assert!(remote.is_none());
}

#[test]
fn resolve_remote_rejects_invalid_url() {
    let result = resolve_remote(
        &GroomdeskConfig::default(),
        Some("api.example.com".to_string()),
        None,
    );
    assert!(matches!(result, Err(CliError::Remote(_))));
}

#[test]
fn resolve_store_path_prefers_cli_flag() {
    let config = GroomdeskConfig {
        store_path: Some("/var/lib/groomdesk/config.db".to_string()),
        ..GroomdeskConfig::default()
    };
    let path = resolve_store_path(Some(PathBuf::from("/tmp/cli.db")), &config).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/cli.db"));
}

#[test]
fn cli_parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "groomdesk",
        "sync",
        "status",
        "--json",
        "--offline",
        "--store-path",
        "/tmp/local.db",
    ])
    .unwrap();

    assert!(cli.offline);
    assert_eq!(cli.store_path, Some(PathBuf::from("/tmp/local.db")));
    assert!(matches!(
        cli.command,
        Commands::Sync {
            command: SyncCommands::Status { json: true }
        }
    ));
}

#[test]
fn cli_parses_config_init() {
    let cli = Cli::try_parse_from([
        "groomdesk",
        "config",
        "init",
        "--api-base-url",
        "https://api.example.com/v1",
        "--store",
        "/tmp/shop.db",
        "--timeout-secs",
        "15",
    ])
    .unwrap();

    let Commands::Config {
        command:
            ConfigCommands::Init {
                api_base_url,
                store,
                timeout_secs,
            },
    } = cli.command
    else {
        panic!("expected config init");
    };
    assert_eq!(api_base_url.as_deref(), Some("https://api.example.com/v1"));
    assert_eq!(store.as_deref(), Some("/tmp/shop.db"));
    assert_eq!(timeout_secs, Some(15));
    assert_eq!(cli.store_path, None);
}

#[test]
fn config_updates_keep_unset_values() {
    let existing = GroomdeskConfig {
        api_base_url: Some("https://old.example.com".to_string()),
        store_path: Some("/var/lib/groomdesk/local.db".to_string()),
        request_timeout_secs: Some(30),
    };

    let updated = apply_config_updates(
        existing,
        ConfigUpdates {
            api_base_url: Some(" https://new.example.com/v1 ".to_string()),
            store_path: Some("   ".to_string()),
            request_timeout_secs: None,
        },
    );

    assert_eq!(
        updated,
        GroomdeskConfig {
            api_base_url: Some("https://new.example.com/v1".to_string()),
            store_path: Some("/var/lib/groomdesk/local.db".to_string()),
            request_timeout_secs: Some(30),
        }
    );
}

#[test]
fn config_lines_mark_unset_values() {
    let lines = format_config_lines(
        &PathBuf::from("/home/groomer/.config/groomdesk/config.json"),
        &GroomdeskConfig::default(),
    );

    assert_eq!(
        lines,
        vec![
            "Config file: /home/groomer/.config/groomdesk/config.json".to_string(),
            "API base URL: (not set)".to_string(),
            "Store path: (default)".to_string(),
            "Request timeout: (not set)".to_string(),
        ]
    );
}

#[test]
fn completions_mention_binary_name() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("groomdesk"));
}

#[tokio::test]
async fn offline_writes_are_queued() {
    let context = CliContext::in_memory(None, false);

    run_add(&context, "client", r#"{"id": 1, "name": "Max"}"#)
        .await
        .unwrap();
    run_update(&context, "client", "1", r#"{"notes": "Nervous around dryers"}"#)
        .await
        .unwrap();

    let entries = context.service.pending_mutations();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].data["notes"], json!("Nervous around dryers"));
    assert_eq!(context.service.status().pending_count, 1);
}

#[tokio::test]
async fn update_and_delete_report_missing_records() {
    let context = CliContext::in_memory(None, false);

    let update = run_update(&context, "product", "9", r#"{"stock": 1}"#).await;
    assert!(matches!(update, Err(CliError::RecordNotFound { .. })));

    let delete = run_delete(&context, "product", "9").await;
    assert!(matches!(delete, Err(CliError::RecordNotFound { .. })));
    assert_eq!(context.service.pending_mutations().len(), 0);
}

#[tokio::test]
async fn digit_string_ids_can_be_updated_and_deleted() {
    let context = CliContext::in_memory(None, false);
    run_add(&context, "client", r#"{"id": "42", "name": "Max"}"#)
        .await
        .unwrap();

    run_update(&context, "client", "42", r#"{"name": "Maxine"}"#)
        .await
        .unwrap();
    let clients = context.service.list_json(EntityKind::Client).unwrap();
    assert_eq!(clients, vec![json!({"id": "42", "name": "Maxine"})]);

    run_delete(&context, "client", "42").await.unwrap();
    assert!(context
        .service
        .list_json(EntityKind::Client)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn numeric_id_wins_over_string_twin() {
    let context = CliContext::in_memory(None, false);
    run_add(&context, "employee", r#"{"id": 5, "name": "Bo"}"#)
        .await
        .unwrap();
    run_add(&context, "employee", r#"{"id": "5", "name": "Rex"}"#)
        .await
        .unwrap();

    run_delete(&context, "employee", "5").await.unwrap();

    let employees = context.service.list_json(EntityKind::Employee).unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["name"], json!("Rex"));
}

#[tokio::test]
async fn reset_refuses_to_drop_unsynced_changes() {
    let context = CliContext::in_memory(None, false);
    run_add(&context, "service", r#"{"name": "Nail trim", "price_cents": 1500}"#)
        .await
        .unwrap();

    assert!(matches!(
        run_reset(&context, false),
        Err(CliError::UnsyncedChanges(1))
    ));
    run_reset(&context, true).unwrap();
    assert!(context.service.pending_mutations().is_empty());
    assert!(context
        .service
        .list_json(EntityKind::Service)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn sync_now_requires_configured_remote() {
    let context = CliContext::in_memory(None, true);
    assert!(matches!(
        run_sync_now(&context).await,
        Err(CliError::SyncNotConfigured)
    ));
}
