//! Forced-exit timer.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use arbiter_core::Terminator;
use tracing::warn;

/// Exit code used when the timer fires. A displaced instance is not a failure.
const FORCED_EXIT_CODE: i32 = 0;

/// Start a detached OS thread that terminates the process after `grace`.
///
/// Runs outside the async runtime so a stalled runtime cannot delay it, and is
/// never cancelled: by the time it is armed the process is going away anyway.
pub(crate) fn arm_forced_exit(terminator: Arc<dyn Terminator>, grace: Duration) -> io::Result<()> {
    thread::Builder::new()
        .name("arbiter-forced-exit".to_string())
        .spawn(move || {
            thread::sleep(grace);
            warn!(?grace, "Shutdown did not finish within grace period, forcing exit");
            terminator.terminate(FORCED_EXIT_CODE);
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Flag(AtomicBool);

    impl Terminator for Flag {
        fn terminate(&self, _code: i32) -> ! {
            self.0.store(true, Ordering::SeqCst);
            loop {
                thread::park();
            }
        }
    }

    #[test]
    fn fires_after_grace() {
        let flag = Arc::new(Flag::default());
        let started = Instant::now();
        arm_forced_exit(flag.clone(), Duration::from_millis(50)).unwrap();

        assert!(!flag.0.load(Ordering::SeqCst));
        while !flag.0.load(Ordering::SeqCst) {
            assert!(started.elapsed() < Duration::from_secs(2), "timer never fired");
            thread::sleep(Duration::from_millis(5));
        }
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
