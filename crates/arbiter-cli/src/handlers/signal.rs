//! Signal command handler: ask the running instance to exit.

use std::io;
use std::net::SocketAddr;

use arbiter_core::Settings;
use arbiter_runtime::{TakeoverOutcome, send_command, signal_takeover};

use crate::error::CliError;

/// Send a takeover command without acquiring the role afterwards.
///
/// With `legacy` only the bare command is sent, which both old and current
/// builds accept.
pub async fn execute(settings: &Settings, legacy: bool) -> Result<(), CliError> {
    let endpoint = settings.endpoint();

    if legacy {
        return match send_command(endpoint, settings.command().legacy()).await {
            Ok(()) => {
                println!("Sent legacy takeover command to {endpoint}");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                println!("No instance is listening on {endpoint}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
    }

    let outcome = signal_takeover(endpoint, &settings.command()).await;
    println!("{}", describe(endpoint, outcome));
    match outcome {
        TakeoverOutcome::Failed => Err(CliError::Io(format!("could not reach {endpoint}"))),
        _ => Ok(()),
    }
}

fn describe(endpoint: SocketAddr, outcome: TakeoverOutcome) -> String {
    match outcome {
        TakeoverOutcome::OwnerAbsent => format!("No instance is listening on {endpoint}"),
        TakeoverOutcome::Signalled => format!("Instance on {endpoint} accepted the takeover"),
        TakeoverOutcome::LegacyFallback => format!(
            "Instance on {endpoint} is still listening, sent the legacy command as well"
        ),
        TakeoverOutcome::Failed => format!("Could not deliver the takeover command to {endpoint}"),
    }
}
