//! Error types for port enumeration

use thiserror::Error;

use crate::class::DeviceClass;

/// Errors raised at the device-manager boundary
///
/// None of these reach callers of [`crate::PortScanner::enumerate_ports`]:
/// a class that cannot be opened ends the scan and the ports collected so
/// far are returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnumError {
    /// The OS refused to build a device information set for a class
    #[error("cannot open device class {class}: os error {code}")]
    ClassUnavailable { class: DeviceClass, code: u32 },

    /// No device-manager backend exists for this platform
    #[error("device class enumeration is not supported on this platform")]
    Unsupported,
}
