//! Error types for instance arbitration.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced to the caller of [`crate::Arbiter::acquire`].
///
/// Everything else that can go wrong (signal failures, listener I/O, hook
/// errors) is logged where it happens and never reaches the caller.
#[derive(Debug, Error)]
pub enum ArbiterError {
    /// Every bind attempt failed. The previous owner did not exit in time.
    #[error("Instance port {endpoint} still in use after {attempts} attempts: {source}")]
    RetriesExhausted {
        endpoint: SocketAddr,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// This process already accepted a takeover and cannot own the role again.
    #[error("Instance was displaced by a newer process")]
    Displaced,

    /// Another `acquire` call on the same arbiter is still retrying.
    #[error("Acquisition already in progress")]
    AcquireInProgress,
}

/// Result type for arbitration operations.
pub type Result<T> = std::result::Result<T, ArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_retries_exhausted_display_and_source() {
        let err = ArbiterError::RetriesExhausted {
            endpoint: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 58621),
            attempts: 20,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:58621"));
        assert!(msg.contains("20 attempts"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_displaced_has_no_source() {
        assert!(ArbiterError::Displaced.source().is_none());
        assert!(ArbiterError::AcquireInProgress.source().is_none());
    }
}
