//! Tracing subscriber setup for the CLI
//!
//! Logs go to stderr so stdout carries only detection output.

use tracing::Level;

/// Log level for a given verbosity flag
pub fn level_for(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the global fmt subscriber
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
