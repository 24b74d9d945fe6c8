// Port Scan Contract Tests
//
// Invariants deployment scripts rely on. Each test states what breaks
// for callers if the constant or behavior changes.

use portscout::port::{
    default_services, PortProbe, ScanWindow, DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_SERVICES, DEFAULT_WINDOW_SIZE,
};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener};
use std::time::Duration;

/// WHY: Each service scans exactly 10 consecutive ports
/// BREAKS: Env files and proxies that expect frontend in 3000-3009
#[test]
fn window_is_ten_consecutive_ports() {
    assert_eq!(DEFAULT_WINDOW_SIZE, 10);

    let window = PortProbe::default().window(3000);
    assert_eq!((window.start(), window.end()), (3000, 3009));
    assert_eq!(window.candidates().collect::<Vec<_>>(), (3000..=3009).collect::<Vec<_>>());
}

/// WHY: Services are claimed in a fixed order with fixed defaults
/// BREAKS: Earlier services losing first claim on overlapping windows
#[test]
fn default_service_table_is_fixed() {
    assert_eq!(
        DEFAULT_SERVICES,
        [("frontend", 3000), ("backend", 5000), ("auxiliary", 3002)]
    );

    let names: Vec<String> = default_services().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["frontend", "backend", "auxiliary"]);
}

/// WHY: One probe costs at most one second
/// BREAKS: Worst case bound of services x window x timeout (30s)
#[test]
fn probe_timeout_is_one_second() {
    assert_eq!(DEFAULT_PROBE_TIMEOUT, Duration::from_secs(1));

    let worst_case = DEFAULT_PROBE_TIMEOUT * (DEFAULT_SERVICES.len() as u32) * u32::from(DEFAULT_WINDOW_SIZE);
    assert_eq!(worst_case, Duration::from_secs(30));
}

/// WHY: Availability checks bind every local address of both families by default
/// BREAKS: A port held on [::1], 127.0.0.2 or a LAN address would read as
/// free, and the service that later listens on 0.0.0.0 or [::] fails
#[test]
fn default_host_is_unspecified() {
    assert_eq!(DEFAULT_PROBE_HOST, IpAddr::V6(Ipv6Addr::UNSPECIFIED));

    let targets = PortProbe::default().bind_targets(3000);
    assert_eq!(targets[0], SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 3000));
    assert!(targets.iter().all(|addr| addr.ip().is_unspecified()));
}

/// WHY: The window never wraps past 65535 into low ports
/// BREAKS: A scan near the top could hand out privileged ports
#[test]
fn window_never_wraps() {
    let window = ScanWindow::new(65535, DEFAULT_WINDOW_SIZE);
    assert_eq!(window.candidates().collect::<Vec<_>>(), vec![65535]);
}

/// WHY: An exhausted window returns the start port, not an error
/// BREAKS: Callers treat the result as a hint and must always get a port
#[tokio::test]
async fn exhausted_window_returns_start_port() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    let probe = PortProbe::new(DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT, 1);
    assert_eq!(probe.find_available_port(port, &[]).await, port);
}

/// WHY: check_availability never fails outward
/// BREAKS: Callers that expect a plain bool for port 0 and busy ports
#[tokio::test]
async fn probe_absorbs_bind_errors() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = PortProbe::default();

    assert!(!probe.check_availability(port).await);
    assert!(!probe.check_availability(0).await);
}
