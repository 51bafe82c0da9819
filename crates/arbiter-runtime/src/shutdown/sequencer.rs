//! Ordered shutdown of a displaced owner.

use std::sync::Arc;

use arbiter_core::ArbiterState;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::hook::{HookOutcome, run_hook};
use super::watchdog::arm_forced_exit;
use crate::context::OwnerContext;

/// Shut the owner down after an accepted takeover command.
///
/// Steps, each attempted regardless of how the previous one went:
/// 1. clear the running flag
/// 2. close the instance port so the challenger can bind right away
/// 3. arm the forced-exit timer
/// 4. run the host's shutdown hook
/// 5. request a normal exit
///
/// The timer is armed before the hook so a hook that never returns cannot
/// keep the process alive past the grace period.
pub(crate) async fn run_shutdown_sequence(ctx: Arc<OwnerContext>, listener: TcpListener) {
    ctx.set_running(false);
    ctx.set_state(ArbiterState::ShuttingDown);

    let endpoint = listener.local_addr().ok();
    drop(listener);
    info!(?endpoint, "Released instance port");

    if let Err(e) = arm_forced_exit(Arc::clone(&ctx.terminator), ctx.forced_exit_grace) {
        error!(error = %e, "Failed to arm forced-exit timer");
    }

    match ctx.take_hook() {
        Some(hook) => match run_hook(hook).await {
            HookOutcome::Completed => info!("Shutdown hook completed"),
            HookOutcome::Failed(e) => warn!(error = %e, "Shutdown hook returned an error"),
            HookOutcome::Panicked(msg) => error!(panic = %msg, "Shutdown hook panicked"),
            HookOutcome::Lost(msg) => error!(reason = %msg, "Shutdown hook did not report back"),
        },
        None => info!("No shutdown hook registered"),
    }

    ctx.set_state(ArbiterState::Terminated);
    ctx.exit_requested().cancel();
    info!("Requested process exit");
}
