use crate::commands::common::CliContext;
use crate::error::CliError;

pub fn run_reset(context: &CliContext, force: bool) -> Result<(), CliError> {
    let pending = context.service.queue().status().pending;
    if pending > 0 && !force {
        return Err(CliError::UnsyncedChanges(pending));
    }

    context.service.clear_local_data();
    println!("Local data cleared");
    Ok(())
}
