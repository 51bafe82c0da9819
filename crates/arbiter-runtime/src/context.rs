//! State shared between the arbiter and its background tasks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arbiter_core::{ArbiterState, ShutdownHook, TakeoverCommand, Terminator};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Owner-side state, owned by [`crate::Arbiter`] and handed by `Arc` to the
/// command listener and the shutdown sequence.
pub(crate) struct OwnerContext {
    /// Cleared when a takeover is accepted or the role is released.
    running: AtomicBool,
    /// Single hook slot, last registration wins.
    hook: Mutex<Option<ShutdownHook>>,
    state: watch::Sender<ArbiterState>,
    /// Cancelled when the shutdown sequence requests a normal exit.
    exit_requested: CancellationToken,
    pub(crate) command: TakeoverCommand,
    pub(crate) terminator: Arc<dyn Terminator>,
    pub(crate) forced_exit_grace: Duration,
}

impl OwnerContext {
    pub(crate) fn new(
        command: TakeoverCommand,
        terminator: Arc<dyn Terminator>,
        forced_exit_grace: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ArbiterState::Unclaimed);
        Self {
            running: AtomicBool::new(false),
            hook: Mutex::new(None),
            state,
            exit_requested: CancellationToken::new(),
            command,
            terminator,
            forced_exit_grace,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub(crate) fn state(&self) -> ArbiterState {
        *self.state.borrow()
    }

    pub(crate) fn set_state(&self, next: ArbiterState) {
        self.state.send_replace(next);
    }

    /// Move `Unclaimed -> Acquiring` in one step. Returns the state found,
    /// which is left unchanged unless it was `Unclaimed`.
    pub(crate) fn begin_acquire(&self) -> ArbiterState {
        let mut found = ArbiterState::Unclaimed;
        self.state.send_if_modified(|state| {
            found = *state;
            if found == ArbiterState::Unclaimed {
                *state = ArbiterState::Acquiring;
                true
            } else {
                false
            }
        });
        found
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ArbiterState> {
        self.state.subscribe()
    }

    pub(crate) fn replace_hook(&self, hook: ShutdownHook) -> bool {
        let mut slot = self.hook.lock().unwrap_or_else(PoisonError::into_inner);
        slot.replace(hook).is_some()
    }

    pub(crate) fn take_hook(&self) -> Option<ShutdownHook> {
        self.hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) fn exit_requested(&self) -> &CancellationToken {
        &self.exit_requested
    }
}
