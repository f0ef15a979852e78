//! Port name to system location translation and standard baud rates

/// Prefix that turns a port name into an openable path
#[cfg(windows)]
pub const SYSTEM_LOCATION_PREFIX: &str = r"\\.\";

/// Prefix that turns a port name into an openable path
#[cfg(not(windows))]
pub const SYSTEM_LOCATION_PREFIX: &str = "/dev/";

/// Path used to open the port called `port_name`
///
/// Names that already carry the prefix are returned unchanged.
pub fn port_name_to_system_location(port_name: &str) -> String {
    if port_name.starts_with(SYSTEM_LOCATION_PREFIX) {
        port_name.to_string()
    } else {
        format!("{SYSTEM_LOCATION_PREFIX}{port_name}")
    }
}

/// Port name for a system location; the inverse of
/// [`port_name_to_system_location`]
pub fn system_location_to_port_name(location: &str) -> String {
    location
        .strip_prefix(SYSTEM_LOCATION_PREFIX)
        .unwrap_or(location)
        .to_string()
}

/// Baud rates the platform's serial driver accepts by name
#[cfg(windows)]
pub fn standard_baud_rates() -> &'static [u32] {
    // CBR_* constants
    &[
        110, 300, 600, 1200, 2400, 4800, 9600, 14400, 19200, 38400, 56000, 57600, 115200, 128000,
        256000,
    ]
}

/// Baud rates the platform's serial driver accepts by name
#[cfg(not(windows))]
pub fn standard_baud_rates() -> &'static [u32] {
    // B* termios constants
    &[
        50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
        115200, 230400,
    ]
}
