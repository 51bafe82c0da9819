//! Path-related error types.

use thiserror::Error;

/// Errors that can occur while locating configuration files.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system configuration directory.
    #[error("Cannot determine system config directory")]
    NoConfigDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,
}
