//! Serial Port Discovery Library
//!
//! This crate enumerates the serial ports registered with the operating
//! system's device manager and describes each one with a normalized
//! [`PortDescriptor`]:
//!
//! - **Port name**: the canonical short name (`COM3`)
//! - **System location**: the path handed to an open call (`\\.\COM3`)
//! - **Description / manufacturer**: free text from the device's properties
//! - **Vendor / product identifier**: parsed from the hardware id (`VID_1A86&PID_7523`)
//!
//! # Architecture
//!
//! The scan walks a fixed list of device classes ([`DeviceClass::ALL`]).
//! The OS boundary is the [`backend`] trait seam; on Windows it is backed by
//! SetupAPI, elsewhere every class fails to open and the scan is empty.
//! Busy/valid checks live in [`probe`] and work by attempting an exclusive
//! open of a port's system location.
//!
//! # Example
//!
//! ```rust,no_run
//! use port_info::PortScanner;
//!
//! let scanner = PortScanner::new();
//! for port in scanner.enumerate_ports() {
//!     println!("{} ({}) busy={}", port.port_name(), port.description(), port.is_busy());
//! }
//! ```

pub mod backend;
pub mod class;
pub mod descriptor;
pub mod error;
pub mod hardware_id;
pub mod location;
pub mod port_name;
pub mod probe;
pub mod property;
pub mod scanner;
#[cfg(windows)]
pub mod setupapi;

pub use backend::{DeviceBackend, DeviceRecord, DeviceSet, RegistryValues, SystemBackend};
pub use class::DeviceClass;
pub use descriptor::PortDescriptor;
pub use error::EnumError;
pub use hardware_id::{parse_hardware_id, IdSelector};
pub use probe::{is_busy, is_valid, try_exclusive_open, OpenOutcome};
pub use property::{DeviceProperty, PropertyValue};
pub use scanner::{available_ports, PortScanner, ScannerConfig};
