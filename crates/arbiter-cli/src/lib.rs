//! Command-line host for single-instance arbitration.
//!
//! `arbiter run` keeps exactly one instance alive per machine: a newly
//! started instance replaces the one already running. `signal` and `status`
//! talk to a running instance without claiming its role.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary entry point only
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;

pub use commands::Commands;
pub use config::CliConfig;
pub use error::CliError;
pub use parser::Cli;
