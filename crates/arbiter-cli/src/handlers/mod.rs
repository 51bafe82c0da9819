//! Command handlers.
//!
//! Each handler takes the effective [`Settings`](arbiter_core::Settings),
//! talks to the instance port and prints a short result for the terminal.

pub mod run;
pub mod signal;
pub mod status;
