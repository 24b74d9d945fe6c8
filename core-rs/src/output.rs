//! Rendering of a ServicePortMap for stdout

use std::fmt;

use clap::ValueEnum;

use crate::errors::Result;
use crate::port::ServicePortMap;

/// Output format for detection results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `name=port` line per service
    #[default]
    #[value(alias = "table")]
    Text,
    Json,
    #[value(alias = "yml")]
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// Render the map; the result always ends with a newline
pub fn render(map: &ServicePortMap, format: OutputFormat) -> Result<String> {
    let mut out = match format {
        OutputFormat::Text => map
            .iter()
            .map(|(name, port)| format!("{}={}", name, port))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(map)?,
        OutputFormat::Yaml => serde_yaml::to_string(map)?,
    };

    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
