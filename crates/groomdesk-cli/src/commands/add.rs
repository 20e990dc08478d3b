use crate::commands::common::{parse_json_object, parse_kind, record_id, CliContext};
use crate::error::CliError;

pub async fn run_add(context: &CliContext, kind: &str, json: &str) -> Result<(), CliError> {
    let kind = parse_kind(kind)?;
    let record = parse_json_object(json)?;

    let stored = context.service.add_json(kind, record)?;
    println!("{}", record_id(&stored));

    context.sync_after_write().await;
    Ok(())
}
