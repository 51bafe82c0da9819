//! Shared helpers for arbitration integration tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use arbiter_core::{ArbiterState, Settings, Terminator};
use arbiter_runtime::Arbiter;
use tokio::sync::watch;

/// Terminator that records when it fired and then parks its thread forever,
/// so a test process is never actually killed.
#[derive(Default)]
pub struct RecordingTerminator {
    fired_at: Mutex<Option<Instant>>,
}

impl RecordingTerminator {
    pub fn fired_at(&self) -> Option<Instant> {
        *self.fired_at.lock().unwrap()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, _code: i32) -> ! {
        *self.fired_at.lock().unwrap() = Some(Instant::now());
        loop {
            thread::park();
        }
    }
}

/// Settings pointing at a loopback port that was free a moment ago.
pub fn free_port_settings() -> Settings {
    let probe = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = probe.local_addr().unwrap().port();
    Settings {
        host: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        port: Some(port),
        token: Some("Integration_Test_Key".to_string()),
    }
}

pub fn arbiter(settings: &Settings) -> (Arbiter, Arc<RecordingTerminator>) {
    let terminator = Arc::new(RecordingTerminator::default());
    let arbiter = Arbiter::with_terminator(settings, terminator.clone());
    (arbiter, terminator)
}

/// Hook that counts its invocations.
pub fn counting_hook(
    counter: &Arc<AtomicUsize>,
) -> impl FnOnce() -> anyhow::Result<()> + Send + 'static {
    let counter = Arc::clone(counter);
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wait until `rx` reports `target`, failing the test after `limit`.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<ArbiterState>,
    target: ArbiterState,
    limit: Duration,
) {
    tokio::time::timeout(limit, rx.wait_for(|state| *state == target))
        .await
        .unwrap_or_else(|_| panic!("state never reached {target}"))
        .expect("state channel closed");
}

/// Wait until nothing listens on `endpoint` any more.
pub async fn wait_for_free_port(endpoint: std::net::SocketAddr, limit: Duration) {
    let started = Instant::now();
    while arbiter_runtime::bind_exclusive(endpoint).is_err() {
        assert!(started.elapsed() < limit, "{endpoint} still held after {limit:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
