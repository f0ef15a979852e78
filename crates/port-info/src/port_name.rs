//! Canonical port name lookup
//!
//! A serial port's name (`COM3`) is stored as a string value in the
//! device's configuration key. Drivers do not agree on the value's exact
//! name, so any string value whose name contains `PortName` is accepted.

use tracing::debug;

use crate::backend::{DeviceRecord, RegistryValues, ValueEnum};
use crate::property::{value_type::REG_SZ, wide_to_string_nul};

/// Substring a value name must contain to hold the port name
pub const PORT_NAME_MARKER: &str = "PortName";

/// Initial value-name buffer, in UTF-16 units
pub const NAME_INITIAL_CAPACITY: usize = 16 * 1024;
/// Value-name buffer ceiling, in UTF-16 units
pub const NAME_MAX_CAPACITY: usize = 64 * 1024;
/// Initial value-data buffer, in bytes
pub const DATA_INITIAL_CAPACITY: usize = 16 * 1024;
/// Value-data buffer ceiling, in bytes
pub const DATA_MAX_CAPACITY: usize = 1024 * 1024;

/// A scan buffer that grows on demand up to a fixed ceiling
///
/// Growth at least doubles the length and never exceeds the ceiling.
#[derive(Debug, Clone)]
pub struct ScanBuffer<T> {
    buf: Vec<T>,
    max: usize,
}

impl<T: Copy + Default> ScanBuffer<T> {
    /// Create a buffer of `initial` elements that may grow to `max`
    pub fn new(initial: usize, max: usize) -> Self {
        Self {
            buf: vec![T::default(); initial.min(max)],
            max,
        }
    }

    /// Current length in elements
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True for a zero-length buffer
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Ceiling in elements
    pub fn max_len(&self) -> usize {
        self.max
    }

    /// Current contents
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    /// Current contents, writable
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    /// Grow to hold at least `required` elements
    ///
    /// Returns false, leaving the buffer unchanged, when `required` is above
    /// the ceiling or the buffer is already at it.
    pub fn grow(&mut self, required: usize) -> bool {
        if required > self.max || self.buf.len() >= self.max {
            return false;
        }
        let target = required.max(self.buf.len().saturating_mul(2)).min(self.max);
        self.buf.resize(target, T::default());
        true
    }
}

/// Scan a configuration key for the port name value
///
/// Returns an empty string when no matching string value exists or the
/// enumeration fails part way. Values too large for the buffer ceiling are
/// skipped.
pub fn resolve_port_name<K: RegistryValues + ?Sized>(key: &K) -> String {
    let mut name = ScanBuffer::<u16>::new(NAME_INITIAL_CAPACITY, NAME_MAX_CAPACITY);
    let mut data = ScanBuffer::<u8>::new(DATA_INITIAL_CAPACITY, DATA_MAX_CAPACITY);
    let mut index = 0u32;

    loop {
        match key.enum_value(index, name.as_mut_slice(), data.as_mut_slice()) {
            ValueEnum::Entry {
                name_len,
                value_type,
                data_len,
            } => {
                if value_type == REG_SZ {
                    let entry = String::from_utf16_lossy(&name.as_slice()[..name_len]);
                    if entry.contains(PORT_NAME_MARKER) {
                        let value = wide_to_string_nul(&data.as_slice()[..data_len]);
                        debug!(entry = %entry, value = %value, "found port name value");
                        return value;
                    }
                }
                index += 1;
            }
            ValueEnum::MoreData { data_required } => {
                let grown = if data_required > data.len() {
                    data.grow(data_required)
                } else {
                    name.grow(name.len() + 1)
                };
                if !grown {
                    debug!(index, data_required, "registry value exceeds scan buffers, skipping");
                    index += 1;
                }
            }
            ValueEnum::NoMoreItems => break,
            ValueEnum::Failed(code) => {
                debug!(index, code, "registry value enumeration failed");
                break;
            }
        }
    }

    String::new()
}

/// Look up a device's port name
///
/// A device without a readable configuration key (a disabled device, for
/// one) has no name.
pub fn read_port_name<R: DeviceRecord + ?Sized>(record: &R) -> String {
    match record.open_device_key() {
        Some(key) => resolve_port_name(&key),
        None => {
            debug!("device configuration key unavailable");
            String::new()
        }
    }
}
