//! Port definitions the runtime plugs into.
//!
//! - [`ShutdownHook`]: host cleanup run when this process is displaced
//! - [`Terminator`]: the non-graceful process exit used by the forced-exit timer

mod terminator;

pub use terminator::Terminator;

/// Cleanup logic supplied by the hosting application.
///
/// Runs at most once, on its own thread, after the instance port has already
/// been released. An `Err` is logged and does not stop the shutdown sequence.
pub type ShutdownHook = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;
