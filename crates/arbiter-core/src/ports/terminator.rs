//! Process termination port.

/// Unconditional process termination.
///
/// Called by the forced-exit timer once the grace period after a takeover has
/// elapsed, whatever state the regular shutdown path is in.
pub trait Terminator: Send + Sync + 'static {
    /// Terminate the process with `code`, skipping any remaining cleanup.
    fn terminate(&self, code: i32) -> !;
}
