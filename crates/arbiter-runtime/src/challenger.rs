//! Challenger side of the takeover protocol.
//!
//! Every function here is fire-and-forget: the owner never replies, and a
//! refused connection means there is no owner left to signal.

use std::io;
use std::net::SocketAddr;

use arbiter_core::{CONNECT_TIMEOUT, LEGACY_PROBE_DELAY, TakeoverCommand};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// What a takeover signal achieved.
///
/// Informational only. Acquisition correctness comes from the retry loop,
/// never from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoverOutcome {
    /// Connection refused: nothing is listening any more.
    OwnerAbsent,
    /// Current-form command delivered and the owner stopped listening.
    Signalled,
    /// Owner still reachable after the current-form command, so the legacy
    /// bare verb was sent as well.
    LegacyFallback,
    /// A network error other than refusal. Logged and ignored.
    Failed,
}

impl TakeoverOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OwnerAbsent => "owner_absent",
            Self::Signalled => "signalled",
            Self::LegacyFallback => "legacy_fallback",
            Self::Failed => "failed",
        }
    }
}

/// Ask the current owner at `endpoint` to shut down.
///
/// Sends the current form, pauses, then probes again. A second successful
/// connection means the owner ignored the tokenized command (most likely an
/// older build), so the legacy verb is sent on that connection. The owner may
/// also just be slow to close; sending the legacy verb then is harmless.
pub async fn signal_takeover(endpoint: SocketAddr, command: &TakeoverCommand) -> TakeoverOutcome {
    match send_command(endpoint, command.current()).await {
        Ok(()) => debug!(%endpoint, "Sent takeover command"),
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
            return TakeoverOutcome::OwnerAbsent;
        }
        Err(e) => {
            warn!(%endpoint, error = %e, "Failed to send takeover command");
            return TakeoverOutcome::Failed;
        }
    }

    sleep(LEGACY_PROBE_DELAY).await;

    match send_command(endpoint, command.legacy()).await {
        Ok(()) => {
            warn!(%endpoint, "Owner still reachable, sent legacy takeover command");
            TakeoverOutcome::LegacyFallback
        }
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => TakeoverOutcome::Signalled,
        Err(e) => {
            warn!(%endpoint, error = %e, "Failed to send legacy takeover command");
            TakeoverOutcome::Failed
        }
    }
}

/// Connect, write `payload`, close the write half.
///
/// Connect and write are each bounded by [`CONNECT_TIMEOUT`].
pub async fn send_command(endpoint: SocketAddr, payload: &[u8]) -> io::Result<()> {
    let mut stream = connect(endpoint).await?;

    let write = async {
        stream.write_all(payload).await?;
        stream.shutdown().await
    };
    timeout(CONNECT_TIMEOUT, write)
        .await
        .map_err(|_| timed_out("write to instance port timed out"))?
}

/// Check whether anything is listening on `endpoint`.
///
/// Connects and closes without sending a byte. Owners ignore such probes.
pub async fn probe_owner(endpoint: SocketAddr) -> io::Result<bool> {
    match connect(endpoint).await {
        Ok(_stream) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => Ok(false),
        Err(e) => Err(e),
    }
}

async fn connect(endpoint: SocketAddr) -> io::Result<TcpStream> {
    timeout(CONNECT_TIMEOUT, TcpStream::connect(endpoint))
        .await
        .map_err(|_| timed_out("connect to instance port timed out"))?
}

fn timed_out(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Address with nothing listening on it.
    async fn dead_endpoint() -> SocketAddr {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    /// Listener that records every payload and never shuts down.
    async fn deaf_owner() -> (SocketAddr, mpsc::UnboundedReceiver<Vec<u8>>) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf).await;
                let _ = tx.send(buf);
            }
        });
        (addr, rx)
    }

    #[tokio::test]
    async fn signal_without_owner_is_noop() {
        let addr = dead_endpoint().await;
        let outcome = signal_takeover(addr, &TakeoverCommand::default()).await;
        assert_eq!(outcome, TakeoverOutcome::OwnerAbsent);
    }

    #[tokio::test]
    async fn deaf_owner_gets_legacy_fallback() {
        let (addr, mut rx) = deaf_owner().await;
        let cmd = TakeoverCommand::new("tok");

        let outcome = signal_takeover(addr, &cmd).await;
        assert_eq!(outcome, TakeoverOutcome::LegacyFallback);

        assert_eq!(rx.recv().await.unwrap(), b"tok:KILL");
        assert_eq!(rx.recv().await.unwrap(), b"KILL");
    }

    #[tokio::test]
    async fn send_command_writes_exact_bytes() {
        let (addr, mut rx) = deaf_owner().await;
        tokio_test::assert_ok!(send_command(addr, b"hello").await);
        assert_eq!(rx.recv().await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn probe_reports_presence() {
        let (addr, mut rx) = deaf_owner().await;
        assert!(probe_owner(addr).await.unwrap());
        // The probe carries no payload.
        assert!(rx.recv().await.unwrap().is_empty());

        let dead = dead_endpoint().await;
        assert!(!probe_owner(dead).await.unwrap());
    }

    #[test]
    fn outcome_names() {
        assert_eq!(TakeoverOutcome::LegacyFallback.as_str(), "legacy_fallback");
        assert_eq!(TakeoverOutcome::OwnerAbsent.as_str(), "owner_absent");
    }
}
