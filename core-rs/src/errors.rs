//! Error types for portscout

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortscoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Socket unavailable: {0}")]
    SocketUnavailable(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, PortscoutError>;
