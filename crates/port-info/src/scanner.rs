//! Serial port scanner
//!
//! Walks every [`DeviceClass`] in order and turns each present device with
//! a serial port name into a [`PortDescriptor`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::backend::{DeviceBackend, DeviceRecord, DeviceSet, SystemBackend};
use crate::class::DeviceClass;
use crate::descriptor::PortDescriptor;
use crate::hardware_id::{parse_hardware_id, IdSelector};
use crate::port_name::read_port_name;
use crate::property::{read_property, DeviceProperty};

/// Names containing this are parallel ports sharing the ports class
const PARALLEL_PORT_MARKER: &str = "LPT";

/// Serial port scanner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerConfig {
    /// Drop later ports whose system location was already reported
    ///
    /// Off by default: a device registered under two classes is then
    /// reported twice.
    pub deduplicate_locations: bool,
}

/// Serial port scanner
#[derive(Debug, Clone)]
pub struct PortScanner<B = SystemBackend> {
    backend: B,
    config: ScannerConfig,
}

impl PortScanner<SystemBackend> {
    /// Create a scanner for this platform with default configuration
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    /// Create a scanner for this platform with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self::with_backend(SystemBackend::default(), config)
    }
}

impl Default for PortScanner<SystemBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DeviceBackend> PortScanner<B> {
    /// Create a scanner over an explicit backend
    pub fn with_backend(backend: B, config: ScannerConfig) -> Self {
        Self { backend, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Backend the scanner enumerates through
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Enumerate all serial ports
    ///
    /// Ports are ordered by class scan order, then by device index. If a
    /// class cannot be opened the scan stops there and returns what it has.
    pub fn enumerate_ports(&self) -> Vec<PortDescriptor> {
        info!("Enumerating serial ports...");
        let mut ports = Vec::new();

        for class in DeviceClass::ALL {
            let set = match self.backend.open_class(class) {
                Ok(set) => set,
                Err(e) => {
                    warn!("{}; stopping scan with {} port(s)", e, ports.len());
                    break;
                }
            };
            let before = ports.len();
            scan_class(&set, &mut ports);
            debug!(%class, found = ports.len() - before, "scanned device class");
        }

        if self.config.deduplicate_locations {
            let mut seen = HashSet::new();
            ports.retain(|port: &PortDescriptor| seen.insert(port.system_location().to_string()));
        }

        if ports.is_empty() {
            info!("No serial ports found");
        } else {
            info!("Found {} serial port(s)", ports.len());
            for port in &ports {
                info!("  {} - {}", port.port_name(), port.description());
            }
        }

        ports
    }
}

fn scan_class<S: DeviceSet>(set: &S, ports: &mut Vec<PortDescriptor>) {
    let mut index = 0;
    while let Some(record) = set.device(index) {
        index += 1;
        if let Some(port) = describe_device(&record) {
            ports.push(port);
        }
    }
}

/// Build the descriptor for one device
///
/// Returns `None` for devices without a port name and for parallel ports.
pub fn describe_device<R: DeviceRecord + ?Sized>(record: &R) -> Option<PortDescriptor> {
    let port_name = read_port_name(record);
    if port_name.is_empty() || port_name.contains(PARALLEL_PORT_MARKER) {
        debug!(port_name = %port_name, "skipping device");
        return None;
    }

    let description = read_property(record, DeviceProperty::Description).to_text();
    let manufacturer = read_property(record, DeviceProperty::Manufacturer).to_text();
    let hardware_ids = read_property(record, DeviceProperty::HardwareId).to_text_list();

    Some(PortDescriptor::new(
        port_name,
        description,
        manufacturer,
        parse_hardware_id(IdSelector::Vendor, &hardware_ids),
        parse_hardware_id(IdSelector::Product, &hardware_ids),
    ))
}

/// Enumerate all serial ports with the platform backend
pub fn available_ports() -> Vec<PortDescriptor> {
    PortScanner::new().enumerate_ports()
}
