//! Status command handler.

use arbiter_core::Settings;
use arbiter_runtime::probe_owner;

use crate::error::CliError;

/// Report whether an instance owns the port. The probe sends nothing, so
/// the owner ignores it.
pub async fn execute(settings: &Settings) -> Result<(), CliError> {
    let endpoint = settings.endpoint();
    if probe_owner(endpoint).await? {
        println!("An instance is running on {endpoint}");
    } else {
        println!("No instance is listening on {endpoint}");
    }
    Ok(())
}
