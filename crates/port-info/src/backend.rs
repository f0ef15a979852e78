//! Device-manager boundary
//!
//! The scanner talks to the operating system only through these traits:
//!
//! - [`DeviceBackend`] opens one device class at a time
//! - [`DeviceSet`] is the open class; dropping it releases the OS handle
//! - [`DeviceRecord`] is one present device in the set
//! - [`RegistryValues`] is a device's configuration key; dropping it closes the key
//!
//! The calls mirror the shape of the Win32 APIs they wrap (size queries,
//! caller-owned buffers, status codes) so the decoding and buffer-growth
//! logic above them stays platform independent and testable.

use crate::class::DeviceClass;
use crate::error::EnumError;
use crate::property::DeviceProperty;

/// Result of a single registry property query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyQuery {
    /// The property fit in the buffer; `len` bytes were written
    Complete { value_type: u32, len: usize },
    /// The buffer is smaller than the `required` byte count
    InsufficientBuffer { value_type: u32, required: usize },
    /// The device has no such property, or the query failed
    Missing,
}

/// Result of enumerating one value of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEnum {
    /// The value at this index; lengths are in UTF-16 units (name) and bytes (data)
    Entry {
        name_len: usize,
        value_type: u32,
        data_len: usize,
    },
    /// Name or data buffer too small; `data_required` is the data size in bytes
    MoreData { data_required: usize },
    /// Index is past the last value
    NoMoreItems,
    /// Any other OS status
    Failed(u32),
}

/// Source of device classes
pub trait DeviceBackend {
    /// An open device class
    type Set<'a>: DeviceSet
    where
        Self: 'a;

    /// Open the set of devices currently present in `class`
    fn open_class(&self, class: DeviceClass) -> Result<Self::Set<'_>, EnumError>;
}

/// The devices of one open class
pub trait DeviceSet {
    /// One device in the set
    type Record<'a>: DeviceRecord
    where
        Self: 'a;

    /// The device at `index`, or `None` past the last device
    fn device(&self, index: u32) -> Option<Self::Record<'_>>;
}

/// One enumerated device
pub trait DeviceRecord {
    /// The device's configuration key
    type Key: RegistryValues;

    /// Query a registry property into `buffer`
    ///
    /// An empty buffer asks for the size and type only.
    fn query_property(&self, property: DeviceProperty, buffer: &mut [u8]) -> PropertyQuery;

    /// Open the per-device configuration key for reading
    fn open_device_key(&self) -> Option<Self::Key>;
}

/// Values stored under a configuration key
pub trait RegistryValues {
    /// Read the value at `index` into the name and data buffers
    fn enum_value(&self, index: u32, name: &mut [u16], data: &mut [u8]) -> ValueEnum;
}

/// Backend for platforms without a device manager
///
/// Every class fails to open, so a scan returns no ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

/// Uninhabited set/record/key type for [`UnsupportedBackend`]
#[derive(Debug)]
pub enum NoDevices {}

impl DeviceBackend for UnsupportedBackend {
    type Set<'a> = NoDevices;

    fn open_class(&self, _class: DeviceClass) -> Result<NoDevices, EnumError> {
        Err(EnumError::Unsupported)
    }
}

impl DeviceSet for NoDevices {
    type Record<'a> = NoDevices;

    fn device(&self, _index: u32) -> Option<NoDevices> {
        match *self {}
    }
}

impl DeviceRecord for NoDevices {
    type Key = NoDevices;

    fn query_property(&self, _property: DeviceProperty, _buffer: &mut [u8]) -> PropertyQuery {
        match *self {}
    }

    fn open_device_key(&self) -> Option<NoDevices> {
        match *self {}
    }
}

impl RegistryValues for NoDevices {
    fn enum_value(&self, _index: u32, _name: &mut [u16], _data: &mut [u8]) -> ValueEnum {
        match *self {}
    }
}

/// The backend used by [`crate::PortScanner::new`] on this platform
#[cfg(windows)]
pub type SystemBackend = crate::setupapi::SetupApi;

/// The backend used by [`crate::PortScanner::new`] on this platform
#[cfg(not(windows))]
pub type SystemBackend = UnsupportedBackend;
