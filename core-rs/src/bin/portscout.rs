//! portscout - free port detection CLI
//!
//! Prints one port per deployment service, or probes single ports.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use portscout::config::DEFAULT_CONFIG_FILE;
use portscout::{logging, render, OutputFormat, PortDetector, PortProbe, ProbeConfig};

#[derive(Parser)]
#[command(name = "portscout")]
#[command(version = portscout::VERSION)]
#[command(about = "Find the first free TCP port for each service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to .portscout.yaml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interface to probe (overrides config)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Per-probe timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Ports scanned per service (overrides config)
    #[arg(long, global = true)]
    window: Option<u16>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign a port to every service (default command)
    Detect {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Probe a single port
    Check {
        /// Port to probe
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        port: u16,
    },
    /// Find the first free port at or after START
    Find {
        /// First candidate port
        #[arg(value_parser = clap::value_parser!(u16).range(1..))]
        start: u16,
        /// Ports to skip (repeatable)
        #[arg(long)]
        claimed: Vec<u16>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<ProbeConfig> {
    let config = match &cli.config {
        Some(path) => ProbeConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ProbeConfig::load_or_default(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("failed to load config {}", DEFAULT_CONFIG_FILE))?,
    };

    let config = config.with_overrides(cli.host.clone(), cli.timeout_ms, cli.window);
    config.validate().context("invalid probe settings")?;
    Ok(config)
}

async fn handle_detect(probe: PortProbe, format: OutputFormat) -> anyhow::Result<()> {
    let detector = PortDetector::new(probe);
    let map = detector
        .detect_all()
        .await
        .context("port detection aborted")?;

    print!("{}", render(&map, format)?);
    Ok(())
}

async fn handle_check(probe: PortProbe, port: u16) -> anyhow::Result<()> {
    probe.ensure_socket_support()?;

    if probe.check_availability(port).await {
        println!("{} {} available", "✓".green(), port);
    } else {
        println!("{} {} in use", "✗".red(), port);
    }
    Ok(())
}

async fn handle_find(probe: PortProbe, start: u16, claimed: Vec<u16>) -> anyhow::Result<()> {
    probe.ensure_socket_support()?;

    let port = probe.find_available_port(start, &claimed).await;
    println!("{}", port);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let probe = load_config(&cli)?.to_probe()?;
    tracing::debug!(
        host = %probe.host(),
        timeout_ms = probe.timeout().as_millis() as u64,
        window = probe.window_size(),
        "probe settings"
    );

    match cli.command {
        None => handle_detect(probe, OutputFormat::Text).await,
        Some(Commands::Detect { format }) => handle_detect(probe, format).await,
        Some(Commands::Check { port }) => handle_check(probe, port).await,
        Some(Commands::Find { start, claimed }) => handle_find(probe, start, claimed).await,
    }
}
