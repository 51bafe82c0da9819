//! Single-instance arbitration over a loopback TCP port.
//!
//! The process that holds the port is the owner. A newly started process that
//! finds the port taken sends the owner a takeover command, waits briefly and
//! tries again, until the old owner has let go.
//!
//! # Structure
//!
//! - [`Arbiter`] - acquisition with bounded retries, voluntary release, displacement signal
//! - [`challenger`] - the takeover signal and a bare presence probe
//! - `listener` - owner-side loop that reacts to takeover commands
//! - `shutdown` - ordered shutdown of a displaced owner with a forced-exit timer
//! - [`ProcessTerminator`] - the default non-graceful exit

#![deny(unsafe_code)]

mod arbiter;
mod bind;
pub mod challenger;
mod context;
mod error;
mod listener;
mod shutdown;
mod terminator;

pub use arbiter::{Acquired, Arbiter};
pub use bind::bind_exclusive;
pub use challenger::{TakeoverOutcome, probe_owner, send_command, signal_takeover};
pub use error::{ArbiterError, Result};
pub use terminator::ProcessTerminator;
