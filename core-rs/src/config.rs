/**
 * config.rs
 * Parser for .portscout.yaml files (YAML format)
 *
 * Format:
 * ```yaml
 * apiVersion: portscout/v1
 * kind: ProbeConfig
 * spec:
 *   host: 127.0.0.1
 *   timeoutMs: 1000
 *   windowSize: 10
 * ```
 *
 * Every spec field is optional. The service table is not configurable here.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use crate::errors::{PortscoutError, Result};
use crate::port::{PortProbe, DEFAULT_PROBE_HOST, DEFAULT_PROBE_TIMEOUT, DEFAULT_WINDOW_SIZE};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".portscout.yaml";

pub const API_VERSION: &str = "portscout/v1";
pub const KIND: &str = "ProbeConfig";

/// .portscout.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub spec: ProbeSpec,
}

/// Probe settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<u16>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            api_version: default_api_version(),
            kind: default_kind(),
            spec: ProbeSpec::default(),
        }
    }
}

impl ProbeConfig {
    /// Load config from specified path
    ///
    /// # Errors
    /// `FileNotFound` if the file is missing, `Yaml` if it does not parse,
    /// `ConfigError` if it parses but fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PortscoutError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: ProbeConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load config, or fall back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(PortscoutError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Check kind and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.kind != KIND {
            return Err(PortscoutError::ConfigError(format!(
                "expected kind '{}', found '{}'",
                KIND, self.kind
            )));
        }

        self.host()?;

        if self.spec.timeout_ms == Some(0) {
            return Err(PortscoutError::ConfigError(
                "timeoutMs must be at least 1".to_string(),
            ));
        }

        if self.spec.window_size == Some(0) {
            return Err(PortscoutError::ConfigError(
                "windowSize must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        timeout_ms: Option<u64>,
        window_size: Option<u16>,
    ) -> Self {
        if host.is_some() {
            self.spec.host = host;
        }
        if timeout_ms.is_some() {
            self.spec.timeout_ms = timeout_ms;
        }
        if window_size.is_some() {
            self.spec.window_size = window_size;
        }
        self
    }

    /// Probe host, defaulting to the unspecified address (all interfaces)
    pub fn host(&self) -> Result<IpAddr> {
        match &self.spec.host {
            None => Ok(DEFAULT_PROBE_HOST),
            Some(raw) => raw.parse().map_err(|_| {
                PortscoutError::ConfigError(format!("host '{}' is not an IP address", raw))
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.spec
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }

    pub fn window_size(&self) -> u16 {
        self.spec.window_size.unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    /// Build the probe these settings describe
    pub fn to_probe(&self) -> Result<PortProbe> {
        self.validate()?;
        Ok(PortProbe::new(self.host()?, self.timeout(), self.window_size()))
    }
}
