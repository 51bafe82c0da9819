//! Owner-side command listener.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use arbiter_core::{COMMAND_READ_TIMEOUT, MAX_COMMAND_LEN};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::OwnerContext;
use crate::shutdown::run_shutdown_sequence;

/// Accept connections on the instance port until displaced or closed.
///
/// Connections are handled one at a time. A payload that exactly matches the
/// current or legacy command starts the shutdown sequence, which takes the
/// listener and closes it. Anything else is dropped without a reply.
///
/// Cancelling `close` drops the listener, which is how a voluntary release
/// frees the port.
pub(crate) async fn run_listener(
    listener: TcpListener,
    ctx: Arc<OwnerContext>,
    close: CancellationToken,
) {
    while ctx.is_running() {
        let accepted = tokio::select! {
            () = close.cancelled() => {
                debug!("Instance port closed, listener stopping");
                return;
            }
            accepted = listener.accept() => accepted,
        };

        let (mut stream, peer) = match accepted {
            Ok(pair) => pair,
            Err(e) if is_transient(&e) => {
                debug!(error = %e, "Transient accept error");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Accept failed, listener stopping");
                return;
            }
        };

        let payload = match read_payload(&mut stream).await {
            Ok(payload) => payload,
            Err(e) => {
                debug!(%peer, error = %e, "Dropped connection without a complete command");
                continue;
            }
        };
        drop(stream);

        match ctx.command.recognize(&payload) {
            Some(form) => {
                info!(%peer, form = form.as_str(), "Received takeover command, shutting down");
                run_shutdown_sequence(ctx, listener).await;
                return;
            }
            None => log_ignored(peer, &payload),
        }
    }
}

/// Read until the peer closes its write half, [`MAX_COMMAND_LEN`] bytes have
/// arrived or [`COMMAND_READ_TIMEOUT`] has passed.
///
/// A peer that stays open past the timeout still has what it sent compared.
async fn read_payload(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let deadline = Instant::now() + COMMAND_READ_TIMEOUT;
    let mut payload = Vec::with_capacity(MAX_COMMAND_LEN);
    let mut chunk = [0u8; MAX_COMMAND_LEN];

    while payload.len() < MAX_COMMAND_LEN {
        let room = MAX_COMMAND_LEN - payload.len();
        match timeout_at(deadline, stream.read(&mut chunk[..room])).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => payload.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                debug!(received = payload.len(), "Peer kept the connection open");
                break;
            }
        }
    }
    Ok(payload)
}

fn log_ignored(peer: SocketAddr, payload: &[u8]) {
    if payload.is_empty() {
        debug!(%peer, "Ignored probe connection");
    } else {
        debug!(%peer, len = payload.len(), "Ignored unrecognized payload");
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
    )
}
