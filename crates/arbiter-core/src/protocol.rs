//! Takeover wire protocol.
//!
//! A challenger opens a loopback TCP connection to the owner, writes one of two
//! byte sequences and closes. The owner never answers.
//!
//! - current form: `<token>:KILL`
//! - legacy form: `KILL`, understood by owners that predate the token
//!
//! Anything else is ignored by the owner.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Address the owner binds. Arbitration is machine-local only.
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Well-known port used as the instance mutex.
pub const DEFAULT_PORT: u16 = 58621;

/// Shared token carried by the current command form.
pub const DEFAULT_TOKEN: &str = "Overlay_App_Secret_Key_v1";

/// The only verb the protocol knows.
pub const KILL_VERB: &str = "KILL";

/// Read budget for one inbound command.
pub const MAX_COMMAND_LEN: usize = 1024;

/// Bind attempts made by one `acquire` call before giving up.
pub const MAX_ACQUIRE_ATTEMPTS: u32 = 20;

/// Pause between bind attempts. Much shorter than a typical owner shutdown.
pub const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Pause between the current-form command and the legacy re-probe.
pub const LEGACY_PROBE_DELAY: Duration = Duration::from_millis(100);

/// Connect/write budget for challenger connections on loopback.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// How long the owner waits for a connected peer to finish sending.
pub const COMMAND_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Delay after which a displaced owner is terminated unconditionally.
pub const FORCED_EXIT_GRACE: Duration = Duration::from_secs(2);

/// Which form of the takeover command a payload matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandForm {
    /// `<token>:KILL`
    Current,
    /// Bare `KILL`.
    Legacy,
}

impl CommandForm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}

/// Encoded takeover command for one token.
///
/// Built once per process and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoverCommand {
    current: Box<[u8]>,
}

impl TakeoverCommand {
    /// Encode the current form for `token`.
    pub fn new(token: &str) -> Self {
        let current = format!("{token}:{KILL_VERB}").into_bytes().into_boxed_slice();
        Self { current }
    }

    /// Bytes of the tokenized command.
    pub fn current(&self) -> &[u8] {
        &self.current
    }

    /// Bytes of the bare legacy command.
    pub const fn legacy(&self) -> &'static [u8] {
        KILL_VERB.as_bytes()
    }

    /// Match a received payload exactly against both forms.
    ///
    /// Partial, padded or differently-tokenized payloads return `None`.
    pub fn recognize(&self, payload: &[u8]) -> Option<CommandForm> {
        if payload == self.current() {
            Some(CommandForm::Current)
        } else if payload == self.legacy() {
            Some(CommandForm::Legacy)
        } else {
            None
        }
    }
}

impl Default for TakeoverCommand {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN)
    }
}
