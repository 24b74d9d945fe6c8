//! # portscout - free TCP port detection
//!
//! Finds, for each service of a deployment, the first TCP port that can be
//! bound right now, scanning a short window forward from the service's
//! default port.
//!
//! ## Core Principle
//!
//! **Best effort, never blocking the caller**: busy ports, bind errors and
//! probe timeouts all read as "unavailable", and an exhausted window falls
//! back to the default port. The only error that escapes is a host that
//! cannot create TCP sockets at all.
//!
//! ## Example
//!
//! ```no_run
//! # async fn run() -> portscout::errors::Result<()> {
//! let map = portscout::PortDetector::default().detect_all().await?;
//! println!("frontend on {:?}", map.get("frontend"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod logging;
pub mod output;
pub mod port;

pub use config::ProbeConfig;
pub use errors::PortscoutError;
pub use output::{render, OutputFormat};
pub use port::{PortDetector, PortProbe, ScanWindow, ServicePortMap, ServiceSpec};

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
