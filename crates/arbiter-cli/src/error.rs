//! CLI-specific error types and mappings.
//!
//! Library errors are flattened to messages here and mapped to exit codes.

use arbiter_core::{PathError, SettingsError};
use arbiter_runtime::ArbiterError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Another instance kept the port through every attempt.
    #[error("{0}")]
    Contended(String),

    /// IO error (connection failures, unreadable settings file, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other arbitration failure.
    #[error("{0}")]
    Runtime(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 1: General error
    /// - 74: I/O error
    /// - 75: Temporary failure, retrying later may succeed
    /// - 78: Configuration error
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Runtime(_) => 1,
            Self::Io(_) => 74,        // EX_IOERR
            Self::Contended(_) => 75, // EX_TEMPFAIL
            Self::Config(_) => 78,    // EX_CONFIG
        }
    }
}

impl From<ArbiterError> for CliError {
    fn from(err: ArbiterError) -> Self {
        match err {
            ArbiterError::RetriesExhausted { .. } => Self::Contended(err.to_string()),
            ArbiterError::Displaced | ArbiterError::AcquireInProgress => {
                Self::Runtime(err.to_string())
            }
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[test]
    fn test_contention_maps_to_tempfail() {
        let err: CliError = ArbiterError::RetriesExhausted {
            endpoint: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 58621),
            attempts: 20,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        }
        .into();
        assert!(matches!(err, CliError::Contended(_)));
        assert_eq!(err.exit_code(), 75);
        assert!(err.to_string().contains("127.0.0.1:58621"));
    }

    #[test]
    fn test_settings_errors_are_config_errors() {
        let err: CliError = SettingsError::EmptyToken.into();
        assert_eq!(err.exit_code(), 78);

        let err: CliError = PathError::NoConfigDir.into();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_io_and_displaced_codes() {
        let err: CliError = io::Error::from(io::ErrorKind::TimedOut).into();
        assert_eq!(err.exit_code(), 74);

        let err: CliError = ArbiterError::Displaced.into();
        assert_eq!(err.exit_code(), 1);
    }
}
