/**
 * port module
 * Free-port detection for deployment services
 */

pub mod detector;
pub mod probe;

pub use detector::{default_services, PortDetector, ServicePortMap, ServiceSpec, DEFAULT_SERVICES};
pub use probe::{PortProbe, ScanWindow, DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT, DEFAULT_WINDOW_SIZE};
