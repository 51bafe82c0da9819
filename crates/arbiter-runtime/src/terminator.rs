//! Default process terminator.

use arbiter_core::Terminator;

/// Ends the process with [`std::process::exit`].
///
/// No destructors run on any thread, so a stuck shutdown path cannot delay it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}
