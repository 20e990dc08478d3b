use crate::commands::common::{
    parse_json_object, parse_kind, record_id, record_id_candidates, CliContext,
};
use crate::error::CliError;

pub async fn run_update(
    context: &CliContext,
    kind: &str,
    id: &str,
    json: &str,
) -> Result<(), CliError> {
    let kind = parse_kind(kind)?;
    let candidates = record_id_candidates(id)?;
    let patch = parse_json_object(json)?;

    let mut updated = None;
    for candidate in &candidates {
        updated = context.service.update_json(kind, candidate, &patch)?;
        if updated.is_some() {
            break;
        }
    }
    let Some(updated) = updated else {
        return Err(CliError::RecordNotFound {
            kind: kind.to_string(),
            id: candidates[0].to_string(),
        });
    };
    println!("{}", record_id(&updated));

    context.sync_after_write().await;
    Ok(())
}
