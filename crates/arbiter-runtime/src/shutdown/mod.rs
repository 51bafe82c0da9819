//! Displacement shutdown for the owner process.
//!
//! - `sequencer`: the ordered steps run once a takeover command is accepted
//! - `hook`: runs the host's cleanup hook on its own thread, catching errors and panics
//! - `watchdog`: the forced-exit timer that guarantees the process dies

mod hook;
mod sequencer;
mod watchdog;

pub(crate) use sequencer::run_shutdown_sequence;
