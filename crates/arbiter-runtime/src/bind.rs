//! Exclusive binding of the instance port.

use std::io;
use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket};

/// Pending-connection queue for the instance port.
///
/// Challenger probes must not be refused while the owner is busy reading an
/// earlier command, or they would mistake a live owner for a dead one.
const LISTEN_BACKLOG: u32 = 16;

/// Bind and listen on `addr` so that a live owner always makes this fail.
///
/// Address reuse is explicitly disabled on every platform. On failure the
/// socket is closed before returning.
pub fn bind_exclusive(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = exclusive_socket(addr)?;
    socket.bind(addr)?;
    socket.listen(LISTEN_BACKLOG)
}

fn exclusive_socket(addr: SocketAddr) -> io::Result<TcpSocket> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(false)?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn loopback(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[tokio::test]
    async fn second_bind_on_held_port_fails() {
        let first = bind_exclusive(loopback(0)).expect("first bind");
        let addr = first.local_addr().unwrap();

        let second = bind_exclusive(addr);
        assert!(second.is_err(), "two owners bound {addr}");
    }

    #[tokio::test]
    async fn address_reuse_is_not_requested() {
        let socket = exclusive_socket(loopback(0)).unwrap();
        assert!(!socket.reuseaddr().unwrap());
    }

    #[tokio::test]
    async fn bind_fails_next_to_reuse_enabled_listener() {
        let other = tokio::net::TcpListener::bind(loopback(0)).await.unwrap();
        let addr = other.local_addr().unwrap();
        assert!(bind_exclusive(addr).is_err());
    }

    #[tokio::test]
    async fn port_is_reusable_after_drop() {
        let first = bind_exclusive(loopback(0)).expect("first bind");
        let addr = first.local_addr().unwrap();
        drop(first);

        let again = bind_exclusive(addr);
        assert!(again.is_ok(), "rebind after close failed: {:?}", again.err());
    }
}
