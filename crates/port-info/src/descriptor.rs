//! Port descriptors

use crate::location;
use crate::probe;

/// Description of one enumerated serial port
///
/// Built fresh by every scan; two scans describing the same device produce
/// equal but independent values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortDescriptor {
    port_name: String,
    system_location: String,
    description: String,
    manufacturer: String,
    vendor_identifier: String,
    product_identifier: String,
}

impl PortDescriptor {
    pub(crate) fn new(
        port_name: String,
        description: String,
        manufacturer: String,
        vendor_identifier: String,
        product_identifier: String,
    ) -> Self {
        let system_location = location::port_name_to_system_location(&port_name);
        Self {
            port_name,
            system_location,
            description,
            manufacturer,
            vendor_identifier,
            product_identifier,
        }
    }

    /// Canonical short name (e.g. `COM3`); never empty
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Path used to open the port (e.g. `\\.\COM3`)
    pub fn system_location(&self) -> &str {
        &self.system_location
    }

    /// Device description; may be empty
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Manufacturer; may be empty
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// USB vendor id token (e.g. `1A86`); empty when not parsed
    pub fn vendor_identifier(&self) -> &str {
        &self.vendor_identifier
    }

    /// USB product id token (e.g. `7523`); empty when not parsed
    pub fn product_identifier(&self) -> &str {
        &self.product_identifier
    }

    /// Vendor id as a number, when the token is hexadecimal
    pub fn vid(&self) -> Option<u16> {
        u16::from_str_radix(&self.vendor_identifier, 16).ok()
    }

    /// Product id as a number, when the token is hexadecimal
    pub fn pid(&self) -> Option<u16> {
        u16::from_str_radix(&self.product_identifier, 16).ok()
    }

    /// True when another process holds the port exclusively
    pub fn is_busy(&self) -> bool {
        probe::is_busy(&self.system_location)
    }

    /// False when the port cannot be opened for a reason other than
    /// being held by another process
    pub fn is_valid(&self) -> bool {
        probe::is_valid(&self.system_location)
    }

    /// Baud rates the platform accepts by name
    pub fn standard_baud_rates() -> &'static [u32] {
        location::standard_baud_rates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch340() -> PortDescriptor {
        PortDescriptor::new(
            "COM3".into(),
            "USB-SERIAL CH340".into(),
            "wch.cn".into(),
            "1A86".into(),
            "7523".into(),
        )
    }

    #[test]
    fn location_is_derived_from_name() {
        let port = ch340();
        assert_eq!(
            port.system_location(),
            location::port_name_to_system_location("COM3")
        );
    }

    #[test]
    fn numeric_ids_parse_hex_tokens() {
        let port = ch340();
        assert_eq!(port.vid(), Some(0x1A86));
        assert_eq!(port.pid(), Some(0x7523));
    }

    #[test]
    fn missing_ids_have_no_numeric_value() {
        let port = PortDescriptor::new(
            "COM1".into(),
            "Communications Port".into(),
            "(Standard port types)".into(),
            String::new(),
            String::new(),
        );
        assert_eq!(port.vid(), None);
        assert_eq!(port.pid(), None);
    }

    #[test]
    fn missing_device_is_neither_busy_nor_valid() {
        let port = PortDescriptor::new(
            "portinfo-test-missing-device".into(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(!port.is_busy());
        assert!(!port.is_valid());
    }
}
