//! Isolated execution of the host's shutdown hook.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use arbiter_core::ShutdownHook;
use tokio::sync::oneshot;

/// How a shutdown hook finished.
#[derive(Debug)]
pub(crate) enum HookOutcome {
    Completed,
    Failed(anyhow::Error),
    Panicked(String),
    /// The hook thread could not be started or vanished without reporting.
    Lost(String),
}

/// Run `hook` on a dedicated thread and wait for it.
///
/// A dedicated OS thread keeps a hook that blocks forever away from the async
/// runtime. If it never returns, this future never resolves and the forced-exit
/// timer ends the process instead.
pub(crate) async fn run_hook(hook: ShutdownHook) -> HookOutcome {
    let (tx, rx) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name("arbiter-shutdown-hook".to_string())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(hook));
            let _ = tx.send(result);
        });
    if let Err(e) = spawned {
        return HookOutcome::Lost(format!("failed to spawn hook thread: {e}"));
    }

    match rx.await {
        Ok(Ok(Ok(()))) => HookOutcome::Completed,
        Ok(Ok(Err(e))) => HookOutcome::Failed(e),
        Ok(Err(payload)) => HookOutcome::Panicked(panic_message(payload.as_ref())),
        Err(_) => HookOutcome::Lost("hook thread exited without reporting".to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_hook() {
        let outcome = run_hook(Box::new(|| -> anyhow::Result<()> { Ok(()) })).await;
        assert!(matches!(outcome, HookOutcome::Completed));
    }

    #[tokio::test]
    async fn failing_hook_is_reported() {
        let hook = || -> anyhow::Result<()> { Err(anyhow::anyhow!("tray icon gone")) };
        let outcome = run_hook(Box::new(hook)).await;
        match outcome {
            HookOutcome::Failed(e) => assert!(e.to_string().contains("tray icon gone")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_hook_is_caught() {
        let outcome = run_hook(Box::new(|| -> anyhow::Result<()> { panic!("boom") })).await;
        match outcome {
            HookOutcome::Panicked(msg) => assert_eq!(msg, "boom"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn formatted_panic_message() {
        let code = 7;
        let hook = move || -> anyhow::Result<()> { panic!("exit code {code}") };
        let outcome = run_hook(Box::new(hook)).await;
        match outcome {
            HookOutcome::Panicked(msg) => assert_eq!(msg, "exit code 7"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
