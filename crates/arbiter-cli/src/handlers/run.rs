//! Run command handler: hold the instance role.

use std::net::SocketAddr;
use std::time::Instant;

use arbiter_core::Settings;
use arbiter_runtime::{Arbiter, ArbiterError};
use tracing::{info, warn};

use crate::error::CliError;

/// Acquire the instance role and hold it until another instance takes over
/// or the user interrupts.
///
/// Interrupting releases the port right away. Being taken over runs the
/// cleanup hook and returns normally, which ends the process well inside the
/// forced-exit grace period.
pub async fn execute(settings: &Settings) -> Result<(), CliError> {
    let arbiter = Arbiter::new(settings);

    let acquired = match arbiter.acquire().await {
        Ok(acquired) => acquired,
        Err(e) => {
            eprintln!("{}", acquire_failure_message(arbiter.endpoint(), &e));
            return Err(e.into());
        }
    };
    println!(
        "Running as the primary instance on {} (attempt {})",
        acquired.endpoint, acquired.attempts
    );

    let started = Instant::now();
    arbiter.register_shutdown_hook(move || -> anyhow::Result<()> {
        info!(uptime = ?started.elapsed(), "Closing application");
        Ok(())
    });

    tokio::select! {
        () = arbiter.displaced() => {
            println!("Replaced by a newer instance, exiting");
            Ok(())
        }
        interrupted = tokio::signal::ctrl_c() => {
            if let Err(e) = &interrupted {
                warn!(error = %e, "Failed to listen for Ctrl-C, releasing");
            }
            arbiter.release().await;
            println!("Released {}", arbiter.endpoint());
            interrupted.map_err(CliError::from)
        }
    }
}

/// Diagnostic shown when the role could not be acquired.
pub fn acquire_failure_message(endpoint: SocketAddr, err: &ArbiterError) -> String {
    match err {
        ArbiterError::RetriesExhausted { attempts, .. } => format!(
            "Another instance still holds {endpoint} after {attempts} attempts.\n\
             End the old process manually (for example from the task manager) and start again."
        ),
        ArbiterError::Displaced => {
            format!("This instance was already replaced on {endpoint} and cannot start again.")
        }
        ArbiterError::AcquireInProgress => {
            format!("Already trying to acquire {endpoint} in this process.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_failure_message_tells_user_to_end_old_process() {
        let endpoint = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 58621);
        let err = ArbiterError::RetriesExhausted {
            endpoint,
            attempts: 20,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };

        let message = acquire_failure_message(endpoint, &err);
        assert!(message.contains("127.0.0.1:58621"));
        assert!(message.contains("20 attempts"));
        assert!(message.contains("End the old process manually"));
    }
}
