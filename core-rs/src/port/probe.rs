/**
 * probe.rs
 * Transient bind probes and bounded forward scans
 *
 * A probe binds a listener on (host, port), and drops it straight away.
 * Success means the port is free right now; anything else (in use,
 * permission denied, port 0, timeout) means it is not.
 *
 * The default host is the unspecified address. The probe then binds
 * 0.0.0.0 and, when the host has IPv6 sockets, [::] one after the other,
 * so a listener on any local address of either family blocks the port.
 *
 * Scan strategy:
 * - Window: [start, start+window_size-1], clipped at 65535
 * - Candidates already claimed in this run are skipped
 * - First free candidate wins (first-fit)
 * - Nothing free: fall back to start, which may still be in use
 *
 * Example (window_size = 10):
 * - start=3000, 3000 in use, 3001 free → 3001
 * - start=3000, claimed=[3000], 3000 free → 3001
 * - start=3000, 3000..=3009 in use → 3000 (fallback)
 */

use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::errors::{PortscoutError, Result};

/// Upper bound on a single bind/listen attempt
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Number of consecutive candidates scanned per service
pub const DEFAULT_WINDOW_SIZE: u16 = 10;

/// Interface probed when nothing else is configured: every local address
pub const DEFAULT_PROBE_HOST: IpAddr = IpAddr::V6(Ipv6Addr::UNSPECIFIED);

/// Inclusive range of candidate ports for one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    start: u16,
    end: u16,
}

impl ScanWindow {
    /// Window of `size` ports beginning at `start`
    ///
    /// A zero size still yields the start port alone; the end is clipped
    /// at 65535 instead of wrapping.
    pub fn new(start: u16, size: u16) -> Self {
        let span = size.max(1) - 1;
        ScanWindow {
            start,
            end: start.saturating_add(span),
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Check if port is within this window
    pub fn contains(&self, port: u16) -> bool {
        port >= self.start && port <= self.end
    }

    /// Candidates in scan order
    pub fn candidates(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

/// True when the host can create IPv6 TCP sockets
fn ipv6_sockets_available() -> bool {
    TcpSocket::new_v6().is_ok()
}

fn new_socket_for(addr: &SocketAddr) -> io::Result<TcpSocket> {
    if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
}

/// Bind and drop a listener on each address in turn
async fn bind_each(targets: &[SocketAddr]) -> io::Result<()> {
    for addr in targets {
        let listener = TcpListener::bind(*addr).await?;
        drop(listener);
    }
    Ok(())
}

/// Port Probe - answers "can this port be bound right now?"
#[derive(Debug, Clone, PartialEq)]
pub struct PortProbe {
    host: IpAddr,
    timeout: Duration,
    window_size: u16,
}

impl Default for PortProbe {
    fn default() -> Self {
        PortProbe {
            host: DEFAULT_PROBE_HOST,
            timeout: DEFAULT_PROBE_TIMEOUT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl PortProbe {
    /// Create a probe with explicit settings
    ///
    /// # Arguments
    /// * `host` - Interface the transient listener binds to; `0.0.0.0` or
    ///   `::` mean every local address of both families
    /// * `timeout` - Bound on each bind/listen attempt
    /// * `window_size` - Candidates scanned by `find_available_port`
    pub fn new(host: IpAddr, timeout: Duration, window_size: u16) -> Self {
        PortProbe {
            host,
            timeout,
            window_size,
        }
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    /// Scan window starting at `start_port`
    pub fn window(&self, start_port: u16) -> ScanWindow {
        ScanWindow::new(start_port, self.window_size)
    }

    /// Addresses a probe of `port` binds, in order
    pub fn bind_targets(&self, port: u16) -> Vec<SocketAddr> {
        if !self.host.is_unspecified() {
            return vec![SocketAddr::new(self.host, port)];
        }

        let mut targets = vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)];
        if ipv6_sockets_available() {
            targets.push(SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port));
        }
        targets
    }

    /// Verify that the probe host can bind TCP sockets at all
    ///
    /// This is the only failure that escapes a detection run. Individual
    /// bind errors on busy ports never do.
    ///
    /// # Errors
    /// Returns `SocketUnavailable` if the OS refuses to create a socket, or
    /// to bind an ephemeral port on the probe host (e.g. an address that
    /// does not belong to this machine).
    pub fn ensure_socket_support(&self) -> Result<()> {
        for addr in self.bind_targets(0) {
            new_socket_for(&addr)
                .and_then(|socket| socket.bind(addr))
                .map_err(|e| {
                    PortscoutError::SocketUnavailable(format!(
                        "cannot bind a TCP socket on {}: {}",
                        addr.ip(),
                        e
                    ))
                })?;
        }
        Ok(())
    }

    /// Test if port can be bound for listening
    ///
    /// # Arguments
    /// * `port` - Port to test
    ///
    /// # Returns
    /// true if every bind target accepted a listener, false otherwise. The
    /// listeners are closed before this returns.
    pub async fn check_availability(&self, port: u16) -> bool {
        if port == 0 {
            debug!(port, "port 0 is never a candidate");
            return false;
        }

        let targets = self.bind_targets(port);
        self.within_timeout(port, bind_each(&targets)).await
    }

    /// Resolve one bind attempt to available/unavailable under the timeout
    async fn within_timeout<F>(&self, port: u16, attempt: F) -> bool
    where
        F: Future<Output = io::Result<()>>,
    {
        match timeout(self.timeout, attempt).await {
            Ok(Ok(())) => {
                debug!(port, "port available");
                true
            }
            Ok(Err(e)) => {
                debug!(port, error = %e, "port unavailable");
                false
            }
            Err(_) => {
                debug!(port, timeout_ms = self.timeout.as_millis() as u64, "probe timed out");
                false
            }
        }
    }

    /// Find the first free, unclaimed port at or after `start_port`
    ///
    /// # Arguments
    /// * `start_port` - Preferred port, first candidate of the window
    /// * `claimed` - Ports already handed out earlier in this run
    ///
    /// # Returns
    /// The first candidate that is both unclaimed and bindable, or
    /// `start_port` unchanged when the window has none.
    pub async fn find_available_port(&self, start_port: u16, claimed: &[u16]) -> u16 {
        let window = self.window(start_port);

        for candidate in window.candidates() {
            if claimed.contains(&candidate) {
                debug!(port = candidate, "skipping claimed port");
                continue;
            }

            if self.check_availability(candidate).await {
                return candidate;
            }
        }

        warn!(
            start = window.start,
            end = window.end,
            "no free port in window, falling back to {}",
            start_port
        );
        start_port
    }
}
