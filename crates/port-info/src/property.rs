//! Typed device registry properties
//!
//! Device properties arrive as a byte blob plus a registry type tag. They
//! are decoded into a [`PropertyValue`]; tags without a decoding rule decode
//! to [`PropertyValue::Absent`].

use tracing::trace;

use crate::backend::{DeviceRecord, PropertyQuery};

/// Registry value type tags
pub mod value_type {
    pub const REG_NONE: u32 = 0;
    pub const REG_SZ: u32 = 1;
    pub const REG_EXPAND_SZ: u32 = 2;
    pub const REG_BINARY: u32 = 3;
    pub const REG_DWORD: u32 = 4;
    pub const REG_DWORD_BIG_ENDIAN: u32 = 5;
    pub const REG_LINK: u32 = 6;
    pub const REG_MULTI_SZ: u32 = 7;
    pub const REG_QWORD: u32 = 11;
}

use value_type::*;

/// A device property read by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceProperty {
    /// Device description (`SPDRP_DEVICEDESC`)
    Description,
    /// Hardware identifier list (`SPDRP_HARDWAREID`)
    HardwareId,
    /// Manufacturer (`SPDRP_MFG`)
    Manufacturer,
}

impl DeviceProperty {
    /// SetupAPI property code
    pub const fn code(self) -> u32 {
        match self {
            DeviceProperty::Description => 0x0000_0000,
            DeviceProperty::HardwareId => 0x0000_0001,
            DeviceProperty::Manufacturer => 0x0000_000B,
        }
    }
}

/// A decoded property value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyValue {
    /// Missing, unreadable, or of an unsupported type
    #[default]
    Absent,
    /// `REG_SZ`, `REG_EXPAND_SZ`, and the `REG_BINARY`/`REG_NONE` fallback
    Text(String),
    /// `REG_MULTI_SZ`
    TextList(Vec<String>),
    /// `REG_DWORD` in either byte order
    Dword(u32),
}

impl PropertyValue {
    /// Decode a raw property blob by its registry type tag
    ///
    /// # Panics
    ///
    /// Panics if a `REG_DWORD` or `REG_DWORD_BIG_ENDIAN` blob is not exactly
    /// four bytes long.
    pub fn decode(value_type: u32, data: &[u8]) -> Self {
        match value_type {
            REG_SZ | REG_EXPAND_SZ => PropertyValue::Text(wide_to_string_nul(data)),
            REG_MULTI_SZ => PropertyValue::TextList(wide_to_string_list(data)),
            REG_NONE | REG_BINARY => PropertyValue::Text(wide_to_string(data)),
            REG_DWORD | REG_DWORD_BIG_ENDIAN => {
                let bytes: [u8; 4] = match data.try_into() {
                    Ok(bytes) => bytes,
                    Err(_) => panic!(
                        "DWORD property must be 4 bytes, got {} (type tag {})",
                        data.len(),
                        value_type
                    ),
                };
                // Both tags are read in native order; the big-endian tag is not swapped.
                PropertyValue::Dword(u32::from_ne_bytes(bytes))
            }
            _ => PropertyValue::Absent,
        }
    }

    /// True for [`PropertyValue::Absent`]
    pub fn is_absent(&self) -> bool {
        matches!(self, PropertyValue::Absent)
    }

    /// Text view: strings as-is, integers in decimal, everything else empty
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Dword(v) => v.to_string(),
            PropertyValue::TextList(_) | PropertyValue::Absent => String::new(),
        }
    }

    /// List view: lists as-is, a single string as a one-element list,
    /// everything else empty
    pub fn to_text_list(&self) -> Vec<String> {
        match self {
            PropertyValue::TextList(l) => l.clone(),
            PropertyValue::Text(s) => vec![s.clone()],
            PropertyValue::Dword(_) | PropertyValue::Absent => Vec::new(),
        }
    }
}

/// Read and decode one property of a device
///
/// The first query learns the size and type, the second fills a buffer of
/// exactly that size. A failure of either query yields
/// [`PropertyValue::Absent`].
pub fn read_property<R: DeviceRecord + ?Sized>(record: &R, property: DeviceProperty) -> PropertyValue {
    let (value_type, size) = match record.query_property(property, &mut []) {
        PropertyQuery::InsufficientBuffer {
            value_type,
            required,
        } => (value_type, required),
        PropertyQuery::Complete { value_type, len } => (value_type, len),
        PropertyQuery::Missing => return PropertyValue::Absent,
    };
    trace!(?property, value_type, size, "property size query");

    let mut data = vec![0u8; size];
    match record.query_property(property, &mut data) {
        PropertyQuery::Complete { len, .. } => {
            data.truncate(len);
            PropertyValue::decode(value_type, &data)
        }
        _ => PropertyValue::Absent,
    }
}

fn wide_units(data: &[u8]) -> impl Iterator<Item = u16> + '_ {
    data.chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

/// UTF-16LE text up to the first NUL or the end of the buffer
pub(crate) fn wide_to_string_nul(data: &[u8]) -> String {
    let units: Vec<u16> = wide_units(data).take_while(|&u| u != 0).collect();
    String::from_utf16_lossy(&units)
}

/// UTF-16LE text of every unit in the buffer, NULs included
fn wide_to_string(data: &[u8]) -> String {
    let units: Vec<u16> = wide_units(data).collect();
    String::from_utf16_lossy(&units)
}

/// NUL-separated UTF-16LE runs, stopping at the first empty run
fn wide_to_string_list(data: &[u8]) -> Vec<String> {
    let units: Vec<u16> = wide_units(data).collect();
    units
        .split(|&u| u == 0)
        .take_while(|run| !run.is_empty())
        .map(String::from_utf16_lossy)
        .collect()
}
