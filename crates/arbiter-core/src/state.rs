//! Owner role lifecycle.

use std::fmt;

/// Lifecycle of the owner role inside one process.
///
/// ```text
/// Unclaimed -> Acquiring -> Owner -> ShuttingDown -> Terminated
///                  |
///                  +-> Unclaimed   (retries exhausted)
/// ```
///
/// `Owner -> Unclaimed` also happens on a voluntary release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArbiterState {
    /// Not holding the port and not trying to.
    #[default]
    Unclaimed,
    /// Inside an `acquire` call.
    Acquiring,
    /// Holding the port; the command listener is running.
    Owner,
    /// A takeover command was accepted and the shutdown sequence is running.
    ShuttingDown,
    /// Process exit has been requested.
    Terminated,
}

impl ArbiterState {
    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// True once a takeover has been accepted. Such a process never owns again.
    pub const fn is_displaced(self) -> bool {
        matches!(self, Self::ShuttingDown | Self::Terminated)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unclaimed => "unclaimed",
            Self::Acquiring => "acquiring",
            Self::Owner => "owner",
            Self::ShuttingDown => "shutting_down",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for ArbiterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unclaimed() {
        assert_eq!(ArbiterState::default(), ArbiterState::Unclaimed);
    }

    #[test]
    fn test_displaced_states() {
        assert!(!ArbiterState::Owner.is_displaced());
        assert!(!ArbiterState::Acquiring.is_displaced());
        assert!(ArbiterState::ShuttingDown.is_displaced());
        assert!(ArbiterState::Terminated.is_displaced());
    }

    #[test]
    fn test_display() {
        assert_eq!(ArbiterState::ShuttingDown.to_string(), "shutting_down");
        assert_eq!(ArbiterState::Owner.to_string(), "owner");
    }
}
