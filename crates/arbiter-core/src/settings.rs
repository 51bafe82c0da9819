//! Settings domain types and validation.
//!
//! Only the endpoint and the shared token are user-configurable. Retry and
//! timeout values are protocol constants in [`crate::protocol`].

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::protocol::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN, KILL_VERB, MAX_COMMAND_LEN, TakeoverCommand,
};

/// Arbitration settings.
///
/// All fields are optional so a partial settings file or a single CLI flag
/// can override just what it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Loopback address the owner binds.
    pub host: Option<IpAddr>,

    /// Port used as the instance mutex.
    pub port: Option<u16>,

    /// Shared token carried by the current takeover command.
    pub token: Option<String>,
}

impl Settings {
    /// Create settings with every field set to the protocol default.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            host: Some(DEFAULT_HOST),
            port: Some(DEFAULT_PORT),
            token: Some(DEFAULT_TOKEN.to_string()),
        }
    }

    #[must_use]
    pub fn effective_host(&self) -> IpAddr {
        self.host.unwrap_or(DEFAULT_HOST)
    }

    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    #[must_use]
    pub fn effective_token(&self) -> &str {
        self.token.as_deref().unwrap_or(DEFAULT_TOKEN)
    }

    /// Socket address every participant uses.
    #[must_use]
    pub fn endpoint(&self) -> SocketAddr {
        SocketAddr::new(self.effective_host(), self.effective_port())
    }

    /// Encoded takeover command for the effective token.
    #[must_use]
    pub fn command(&self) -> TakeoverCommand {
        TakeoverCommand::new(self.effective_token())
    }

    /// Merge another settings value into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(host) = other.host {
            self.host = Some(host);
        }
        if let Some(port) = other.port {
            self.port = Some(port);
        }
        if let Some(ref token) = other.token {
            self.token = Some(token.clone());
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Host {0} is not a loopback address; arbitration is machine-local only")]
    NonLoopbackHost(IpAddr),

    #[error("Port must be non-zero")]
    InvalidPort(u16),

    #[error("Token cannot be empty")]
    EmptyToken,

    #[error("Token is {len} bytes; the encoded command must fit in {max} bytes")]
    TokenTooLong { len: usize, max: usize },
}

/// Validate settings.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(host) = settings.host {
        if !host.is_loopback() {
            return Err(SettingsError::NonLoopbackHost(host));
        }
    }

    if settings.port == Some(0) {
        return Err(SettingsError::InvalidPort(0));
    }

    if let Some(ref token) = settings.token {
        if token.trim().is_empty() {
            return Err(SettingsError::EmptyToken);
        }
        let max = MAX_COMMAND_LEN - KILL_VERB.len() - 1;
        if token.len() > max {
            return Err(SettingsError::TokenTooLong {
                len: token.len(),
                max,
            });
        }
    }

    Ok(())
}
