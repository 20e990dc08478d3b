use crate::commands::common::{format_record_lines, parse_kind, CliContext};
use crate::error::CliError;

pub fn run_list(context: &CliContext, kind: &str, as_json: bool) -> Result<(), CliError> {
    let kind = parse_kind(kind)?;
    let records = context.service.list_json(kind)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No {kind} records stored locally.");
        return Ok(());
    }

    for line in format_record_lines(&records) {
        println!("{line}");
    }
    Ok(())
}
