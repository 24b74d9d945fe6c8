/**
 * detector.rs
 * One port per service, in table order
 *
 * Each service starts its scan at its default port. Ports handed out to
 * earlier services are claimed, so later services skip them even when
 * the windows overlap:
 * - frontend  → 3000 (window 3000-3009)
 * - backend   → 5000 (window 5000-5009)
 * - auxiliary → 3002 (window 3002-3011, overlaps frontend)
 *
 * Fallback to a default can hand the same port to two services when both
 * windows are saturated. That is accepted best-effort behavior.
 */

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use super::probe::PortProbe;
use crate::errors::Result;

/// Fixed service table: name and default port, in claim order
pub const DEFAULT_SERVICES: [(&str, u16); 3] = [
    ("frontend", 3000),
    ("backend", 5000),
    ("auxiliary", 3002),
];

/// One logical service and the port it prefers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: String,
    pub default_port: u16,
}

impl ServiceSpec {
    pub fn new(name: impl Into<String>, default_port: u16) -> Self {
        ServiceSpec {
            name: name.into(),
            default_port,
        }
    }
}

/// The default service table as owned specs
pub fn default_services() -> Vec<ServiceSpec> {
    DEFAULT_SERVICES
        .iter()
        .map(|(name, port)| ServiceSpec::new(*name, *port))
        .collect()
}

/// Service name → assigned port, in service table order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServicePortMap {
    assignments: Vec<(String, u16)>,
}

impl ServicePortMap {
    /// Port assigned to a service, if it is in the map
    pub fn get(&self, service: &str) -> Option<u16> {
        self.assignments
            .iter()
            .find(|(name, _)| name == service)
            .map(|(_, port)| *port)
    }

    /// Assignments in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.assignments.iter().map(|(name, port)| (name.as_str(), *port))
    }

    /// Ports only, in table order
    pub fn ports(&self) -> Vec<u16> {
        self.assignments.iter().map(|(_, port)| *port).collect()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

// Serialized as a plain map so JSON/YAML output keeps table order
impl Serialize for ServicePortMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.assignments.len()))?;
        for (name, port) in &self.assignments {
            map.serialize_entry(name, port)?;
        }
        map.end()
    }
}

/// Port Detector - assigns a port to every service in one pass
#[derive(Debug, Clone)]
pub struct PortDetector {
    probe: PortProbe,
    services: Vec<ServiceSpec>,
}

impl Default for PortDetector {
    fn default() -> Self {
        Self::new(PortProbe::default())
    }
}

impl PortDetector {
    /// Detector over the fixed default service table
    pub fn new(probe: PortProbe) -> Self {
        Self::with_services(probe, default_services())
    }

    /// Detector over a caller-supplied service table
    ///
    /// Order matters: earlier services get first claim on shared ports.
    pub fn with_services(probe: PortProbe, services: Vec<ServiceSpec>) -> Self {
        PortDetector { probe, services }
    }

    pub fn probe(&self) -> &PortProbe {
        &self.probe
    }

    pub fn services(&self) -> &[ServiceSpec] {
        &self.services
    }

    /// Assign a port to every service
    ///
    /// Probes run strictly one after another. The claimed list lives only
    /// for the duration of this call.
    ///
    /// # Errors
    /// Only when the probe host cannot bind TCP sockets at all. Busy ports and
    /// exhausted windows never produce an error.
    pub async fn detect_all(&self) -> Result<ServicePortMap> {
        self.probe.ensure_socket_support()?;

        let mut claimed: Vec<u16> = Vec::with_capacity(self.services.len());
        let mut assignments = Vec::with_capacity(self.services.len());

        for service in &self.services {
            let port = self
                .probe
                .find_available_port(service.default_port, &claimed)
                .await;

            info!(
                service = %service.name,
                default = service.default_port,
                port,
                "assigned port"
            );

            claimed.push(port);
            assignments.push((service.name.clone(), port));
        }

        Ok(ServicePortMap { assignments })
    }
}
