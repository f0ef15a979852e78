//! Hot-plug watching
//!
//! Scans repeatedly on a blocking worker and reports ports that appeared
//! or disappeared since the previous scan, keyed by system location.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use port_info::{PortDescriptor, PortScanner};
use tracing::{debug, info};

/// Entries that arrived and left between two scans
#[derive(Debug, PartialEq, Eq)]
pub struct PortChanges<T> {
    pub arrived: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> PortChanges<T> {
    pub fn is_empty(&self) -> bool {
        self.arrived.is_empty() && self.removed.is_empty()
    }
}

/// Known ports by system location
pub type PortMap = BTreeMap<String, PortDescriptor>;

/// Index a scan by system location; the first port at a location wins
pub fn index_ports(ports: Vec<PortDescriptor>) -> PortMap {
    let mut map = PortMap::new();
    for port in ports {
        map.entry(port.system_location().to_string()).or_insert(port);
    }
    map
}

/// Compare two scans keyed by system location
pub fn diff<T: Clone>(previous: &BTreeMap<String, T>, current: &BTreeMap<String, T>) -> PortChanges<T> {
    PortChanges {
        arrived: current
            .iter()
            .filter(|(location, _)| !previous.contains_key(*location))
            .map(|(_, port)| port.clone())
            .collect(),
        removed: previous
            .iter()
            .filter(|(location, _)| !current.contains_key(*location))
            .map(|(_, port)| port.clone())
            .collect(),
    }
}

/// Scan every `interval` until Ctrl-C, printing changes
pub async fn run(scanner: PortScanner, interval: Duration) -> anyhow::Result<()> {
    let scanner = Arc::new(scanner);
    let mut known: Option<PortMap> = None;
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
        }

        let worker = Arc::clone(&scanner);
        let ports = tokio::task::spawn_blocking(move || worker.enumerate_ports())
            .await
            .context("Port scan task failed")?;
        let current = index_ports(ports);

        match &known {
            None => {
                for port in current.values() {
                    println!("  {} ({})", port.port_name(), port.description());
                }
                println!("Watching {} port(s); Ctrl-C to stop", current.len());
            }
            Some(previous) => {
                let changes = diff(previous, &current);
                if changes.is_empty() {
                    debug!("No port changes");
                }
                for port in &changes.arrived {
                    println!("+ {} ({})", port.port_name(), port.description());
                }
                for port in &changes.removed {
                    println!("- {} ({})", port.port_name(), port.description());
                }
            }
        }
        known = Some(current);
    }
}
