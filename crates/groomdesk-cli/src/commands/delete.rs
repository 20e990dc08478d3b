use crate::commands::common::{parse_kind, record_id_candidates, CliContext};
use crate::error::CliError;

pub async fn run_delete(context: &CliContext, kind: &str, id: &str) -> Result<(), CliError> {
    let kind = parse_kind(kind)?;
    let candidates = record_id_candidates(id)?;

    let Some(deleted) = candidates
        .iter()
        .find(|candidate| context.service.delete(kind, candidate))
    else {
        return Err(CliError::RecordNotFound {
            kind: kind.to_string(),
            id: candidates[0].to_string(),
        });
    };
    println!("{deleted}");

    context.sync_after_write().await;
    Ok(())
}
