//! The instance arbiter: acquisition, release and displacement.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use arbiter_core::{
    ArbiterState, FORCED_EXIT_GRACE, MAX_ACQUIRE_ATTEMPTS, RETRY_DELAY, Settings, Terminator,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::bind::bind_exclusive;
use crate::challenger::signal_takeover;
use crate::context::OwnerContext;
use crate::error::{ArbiterError, Result};
use crate::listener::run_listener;
use crate::terminator::ProcessTerminator;

/// Successful acquisition of the owner role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired {
    pub endpoint: SocketAddr,
    /// Bind attempts it took, 1 when the port was free.
    pub attempts: u32,
}

/// Running listener task and the token that closes its port.
struct ListenerHandle {
    close: CancellationToken,
    task: JoinHandle<()>,
}

/// Single-instance arbiter for one well-known loopback port.
///
/// Create one per process, call [`acquire`](Self::acquire) at startup and
/// await [`displaced`](Self::displaced) alongside the application's own work.
///
/// ```ignore
/// let arbiter = Arbiter::new(&Settings::with_defaults());
/// arbiter.acquire().await?;
/// arbiter.register_shutdown_hook(|| {
///     tray.remove();
///     Ok(())
/// });
/// arbiter.displaced().await;
/// ```
pub struct Arbiter {
    endpoint: SocketAddr,
    ctx: Arc<OwnerContext>,
    listener: Mutex<Option<ListenerHandle>>,
}

impl Arbiter {
    /// Create an arbiter that terminates the real process on forced exit.
    pub fn new(settings: &Settings) -> Self {
        Self::with_terminator(settings, Arc::new(ProcessTerminator))
    }

    /// Create an arbiter with a custom forced-exit [`Terminator`].
    pub fn with_terminator(settings: &Settings, terminator: Arc<dyn Terminator>) -> Self {
        Self::build(settings, terminator, FORCED_EXIT_GRACE)
    }

    pub(crate) fn build(
        settings: &Settings,
        terminator: Arc<dyn Terminator>,
        forced_exit_grace: Duration,
    ) -> Self {
        Self {
            endpoint: settings.endpoint(),
            ctx: Arc::new(OwnerContext::new(
                settings.command(),
                terminator,
                forced_exit_grace,
            )),
            listener: Mutex::new(None),
        }
    }

    pub const fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn state(&self) -> ArbiterState {
        self.ctx.state()
    }

    pub fn is_owner(&self) -> bool {
        self.state().is_owner()
    }

    /// Watch lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<ArbiterState> {
        self.ctx.subscribe()
    }

    /// Install the cleanup to run if this process is displaced.
    ///
    /// May be called before or after [`acquire`](Self::acquire). A later call
    /// replaces the earlier hook.
    pub fn register_shutdown_hook<F>(&self, hook: F)
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        if self.ctx.replace_hook(Box::new(hook)) {
            debug!("Replaced previously registered shutdown hook");
        }
    }

    /// Resolves once a takeover has requested a normal process exit.
    pub async fn displaced(&self) {
        self.ctx.exit_requested().cancelled().await;
    }

    /// Token cancelled together with [`displaced`](Self::displaced), for
    /// code that cannot borrow the arbiter.
    pub fn displacement_token(&self) -> CancellationToken {
        self.ctx.exit_requested().clone()
    }

    /// Become the owner, displacing a current owner if there is one.
    ///
    /// Returns as soon as the port is bound; the command listener then runs in
    /// the background. Each failed bind is followed by a takeover signal and a
    /// [`RETRY_DELAY`] pause, for at most [`MAX_ACQUIRE_ATTEMPTS`] attempts.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn acquire(&self) -> Result<Acquired> {
        match self.ctx.begin_acquire() {
            ArbiterState::Unclaimed => {}
            ArbiterState::Owner => {
                return Ok(Acquired {
                    endpoint: self.endpoint,
                    attempts: 0,
                });
            }
            // A second loop would signal takeovers at this arbiter's own listener.
            ArbiterState::Acquiring => return Err(ArbiterError::AcquireInProgress),
            ArbiterState::ShuttingDown | ArbiterState::Terminated => {
                return Err(ArbiterError::Displaced);
            }
        }

        let port = self.endpoint.port();
        let mut last_error = None;

        for attempt in 1..=MAX_ACQUIRE_ATTEMPTS {
            match bind_exclusive(self.endpoint) {
                Ok(listener) => {
                    info!(port, attempt, "Bound instance port, this is the primary instance");
                    self.start_listener(listener);
                    return Ok(Acquired {
                        endpoint: self.endpoint,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(
                        port,
                        attempt,
                        max_attempts = MAX_ACQUIRE_ATTEMPTS,
                        error = %e,
                        "Instance port occupied, requesting takeover"
                    );
                    let outcome = signal_takeover(self.endpoint, &self.ctx.command).await;
                    debug!(port, attempt, outcome = outcome.as_str(), "Takeover signal sent");
                    last_error = Some(e);
                    sleep(RETRY_DELAY).await;
                }
            }
        }

        self.ctx.set_state(ArbiterState::Unclaimed);
        error!(
            port,
            attempts = MAX_ACQUIRE_ATTEMPTS,
            "Failed to bind instance port after all attempts"
        );
        Err(ArbiterError::RetriesExhausted {
            endpoint: self.endpoint,
            attempts: MAX_ACQUIRE_ATTEMPTS,
            source: last_error.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrInUse)),
        })
    }

    /// Give up the owner role and free the port.
    ///
    /// Waits for the listener task to drop its socket, so the port is free
    /// when this returns. Safe to call repeatedly and without owning.
    ///
    /// Once a takeover has been accepted the port is already closed and the
    /// listener task may be waiting on the shutdown hook, so it is not awaited.
    pub async fn release(&self) {
        let Some(handle) = self.lock_listener().take() else {
            debug!("Release without a listener, nothing to do");
            return;
        };

        handle.close.cancel();
        let mut task = handle.task;
        let mut state = self.ctx.subscribe();
        let displaced = async {
            let _ = state.wait_for(|s| s.is_displaced()).await;
        };

        tokio::select! {
            joined = &mut task => {
                if let Err(e) = joined {
                    warn!(error = %e, "Listener task ended abnormally");
                }
            }
            () = displaced => {
                debug!("Takeover already accepted, leaving shutdown sequence to finish");
            }
        }

        if !self.state().is_displaced() {
            self.ctx.set_running(false);
            self.ctx.set_state(ArbiterState::Unclaimed);
            info!(port = self.endpoint.port(), "Released instance port");
        }
    }

    fn start_listener(&self, listener: TcpListener) {
        self.ctx.set_running(true);
        self.ctx.set_state(ArbiterState::Owner);

        let close = CancellationToken::new();
        let task = tokio::spawn(run_listener(
            listener,
            Arc::clone(&self.ctx),
            close.clone(),
        ));
        *self.lock_listener() = Some(ListenerHandle { close, task });
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<ListenerHandle>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Arbiter {
    fn drop(&mut self) {
        let slot = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.close.cancel();
        }
    }
}
