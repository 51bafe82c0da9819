//! Core types for single-instance arbitration.
//!
//! This crate is free of sockets and async runtimes. It defines:
//! - the takeover wire protocol and its fixed timing constants ([`protocol`])
//! - the owner lifecycle states ([`state`])
//! - user settings and their validation ([`settings`])
//! - config file locations ([`paths`])
//! - the seams the runtime plugs into: shutdown hooks and process termination ([`ports`])

#![deny(unused_crate_dependencies)]

pub mod paths;
pub mod ports;
pub mod protocol;
pub mod settings;
pub mod state;

pub use paths::{PathError, resolve_settings_path, settings_path};
pub use ports::{ShutdownHook, Terminator};
pub use protocol::{
    COMMAND_READ_TIMEOUT, CONNECT_TIMEOUT, CommandForm, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN,
    FORCED_EXIT_GRACE, KILL_VERB, LEGACY_PROBE_DELAY, MAX_ACQUIRE_ATTEMPTS, MAX_COMMAND_LEN,
    RETRY_DELAY, TakeoverCommand,
};
pub use settings::{Settings, SettingsError, validate_settings};
pub use state::ArbiterState;
