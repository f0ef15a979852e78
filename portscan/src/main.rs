//! portscan - serial port lister
//!
//! Lists the serial ports known to the device manager, probes whether a
//! port is held by another process, and watches for ports coming and going.

mod output;
mod settings;
mod watch;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use port_info::location::{port_name_to_system_location, standard_baud_rates};
use port_info::{probe, PortScanner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use output::{PortRow, ProbeState};
use settings::{OutputFormat, Settings};

#[derive(Debug, Parser)]
#[command(name = "portscan", version, about = "List and probe serial ports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List serial ports (default)
    List {
        /// Output format (overrides settings)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Report each system location once
        #[arg(long)]
        dedupe: bool,
        /// Probe whether each port is busy
        #[arg(long)]
        probe: bool,
    },
    /// Report whether a port is busy and valid
    Probe {
        /// Port name (COM3) or system location
        port: String,
    },
    /// Print the standard baud rates
    Rates,
    /// Print arrivals and removals until interrupted
    Watch {
        /// Delay between scans (overrides settings)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Show the settings file, optionally writing the current settings to it
    Config {
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portscan=info,port_info=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command.unwrap_or(Command::List {
        format: None,
        dedupe: false,
        probe: false,
    }) {
        Command::List {
            format,
            dedupe,
            probe,
        } => list(&settings, format, dedupe, probe),
        Command::Probe { port } => probe_port(&port),
        Command::Rates => {
            for rate in standard_baud_rates() {
                println!("{rate}");
            }
            Ok(())
        }
        Command::Watch { interval_ms } => {
            let interval = Duration::from_millis(interval_ms.unwrap_or(settings.watch_interval_ms));
            let scanner = PortScanner::with_config(settings.scanner.clone());
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?
                .block_on(watch::run(scanner, interval))
        }
        Command::Config { save } => {
            if save {
                let path = settings.save()?;
                println!("Saved {}", path.display());
            } else {
                match Settings::settings_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no settings path)"),
                }
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            Ok(())
        }
    }
}

fn list(
    settings: &Settings,
    format: Option<OutputFormat>,
    dedupe: bool,
    probe: bool,
) -> anyhow::Result<()> {
    let mut config = settings.scanner.clone();
    config.deduplicate_locations |= dedupe;
    let ports = PortScanner::with_config(config).enumerate_ports();

    let probe = probe || settings.probe_on_list;
    let rows: Vec<PortRow<'_>> = ports
        .iter()
        .map(|port| PortRow {
            port,
            probe: probe.then(|| ProbeState::of(port)),
        })
        .collect();

    match format.unwrap_or(settings.format) {
        OutputFormat::Table => print!("{}", output::render_table(&rows)),
        OutputFormat::Json => println!(
            "{}",
            output::render_json(&rows).context("Failed to serialize port list")?
        ),
    }
    Ok(())
}

fn probe_port(port: &str) -> anyhow::Result<()> {
    let location = port_name_to_system_location(port);
    let state = ProbeState {
        busy: probe::is_busy(&location),
        valid: probe::is_valid(&location),
    };
    println!(
        "{}: {} (busy={}, valid={})",
        location,
        output::state_label(state),
        state.busy,
        state.valid
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::parse_from(["portscan", "list", "--format", "json", "--dedupe"]);
        match cli.command {
            Some(Command::List {
                format,
                dedupe,
                probe,
            }) => {
                assert_eq!(format, Some(OutputFormat::Json));
                assert!(dedupe);
                assert!(!probe);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_defaults_to_list() {
        let cli = Cli::parse_from(["portscan"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn probe_requires_a_port() {
        assert!(Cli::try_parse_from(["portscan", "probe"]).is_err());
    }
}
