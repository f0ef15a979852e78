//! In-memory device manager used by the integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use port_info::backend::{
    DeviceBackend, DeviceRecord, DeviceSet, PropertyQuery, RegistryValues, ValueEnum,
};
use port_info::property::value_type::{REG_MULTI_SZ, REG_SZ};
use port_info::{DeviceClass, DeviceProperty, EnumError};

pub fn wide_nul(s: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

pub fn multi_sz(items: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for item in items {
        bytes.extend(wide_nul(item));
    }
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

/// A registry value: name, type tag, raw data
#[derive(Debug, Clone)]
pub struct FakeValue {
    pub name: String,
    pub value_type: u32,
    pub data: Vec<u8>,
}

/// A device in a fake class
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    /// `None` means the configuration key cannot be opened
    pub key: Option<Vec<FakeValue>>,
    pub properties: HashMap<DeviceProperty, (u32, Vec<u8>)>,
}

impl FakeDevice {
    /// A USB serial adapter named `port_name`
    pub fn usb(port_name: &str, description: &str, manufacturer: &str, hardware_id: &str) -> Self {
        Self::named(port_name)
            .with_text(DeviceProperty::Description, description)
            .with_text(DeviceProperty::Manufacturer, manufacturer)
            .with_property(
                DeviceProperty::HardwareId,
                REG_MULTI_SZ,
                multi_sz(&[hardware_id]),
            )
    }

    /// A device whose key holds only a `PortName` value
    pub fn named(port_name: &str) -> Self {
        Self {
            key: Some(vec![FakeValue {
                name: "PortName".into(),
                value_type: REG_SZ,
                data: wide_nul(port_name),
            }]),
            properties: HashMap::new(),
        }
    }

    /// A device whose key opens but holds no `PortName` value
    pub fn without_port_name(friendly_name: &str) -> Self {
        Self {
            key: Some(vec![FakeValue {
                name: "FriendlyName".into(),
                value_type: REG_SZ,
                data: wide_nul(friendly_name),
            }]),
            properties: HashMap::new(),
        }
    }

    /// A device whose configuration key cannot be opened
    pub fn without_key() -> Self {
        Self::default()
    }

    pub fn with_text(self, property: DeviceProperty, text: &str) -> Self {
        self.with_property(property, REG_SZ, wide_nul(text))
    }

    pub fn with_property(mut self, property: DeviceProperty, value_type: u32, data: Vec<u8>) -> Self {
        self.properties.insert(property, (value_type, data));
        self
    }
}

/// Counters for handles the scanner acquires and releases
#[derive(Debug, Default)]
pub struct HandleLedger {
    pub sets_opened: Cell<usize>,
    pub sets_released: Cell<usize>,
    pub keys_opened: Cell<usize>,
    pub keys_closed: Cell<usize>,
    pub classes_requested: std::cell::RefCell<Vec<DeviceClass>>,
}

fn bump(cell: &Cell<usize>) {
    cell.set(cell.get() + 1);
}

/// Fake backend: one entry per class in scan order; `None` fails to open
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub classes: Vec<Option<Vec<FakeDevice>>>,
    pub ledger: HandleLedger,
}

impl FakeBackend {
    pub fn new(classes: Vec<Option<Vec<FakeDevice>>>) -> Self {
        Self {
            classes,
            ledger: HandleLedger::default(),
        }
    }

    /// Every class opens; `devices` go in the first one
    pub fn single_class(devices: Vec<FakeDevice>) -> Self {
        let mut classes = vec![Some(devices)];
        classes.resize(DeviceClass::ALL.len(), Some(Vec::new()));
        Self::new(classes)
    }
}

impl DeviceBackend for FakeBackend {
    type Set<'a> = FakeSet<'a>;

    fn open_class(&self, class: DeviceClass) -> Result<FakeSet<'_>, EnumError> {
        self.ledger.classes_requested.borrow_mut().push(class);
        let position = DeviceClass::ALL
            .iter()
            .position(|c| *c == class)
            .expect("class in scan list");
        match self.classes.get(position) {
            Some(Some(devices)) => {
                bump(&self.ledger.sets_opened);
                Ok(FakeSet {
                    devices,
                    ledger: &self.ledger,
                })
            }
            _ => Err(EnumError::ClassUnavailable { class, code: 13 }),
        }
    }
}

pub struct FakeSet<'a> {
    devices: &'a [FakeDevice],
    ledger: &'a HandleLedger,
}

impl Drop for FakeSet<'_> {
    fn drop(&mut self) {
        bump(&self.ledger.sets_released);
    }
}

impl<'s> DeviceSet for FakeSet<'s> {
    type Record<'a> = FakeRecord<'a> where Self: 'a;

    fn device(&self, index: u32) -> Option<FakeRecord<'_>> {
        self.devices.get(index as usize).map(|device| FakeRecord {
            device,
            ledger: self.ledger,
        })
    }
}

pub struct FakeRecord<'a> {
    device: &'a FakeDevice,
    ledger: &'a HandleLedger,
}

impl<'a> DeviceRecord for FakeRecord<'a> {
    type Key = FakeKey<'a>;

    fn query_property(&self, property: DeviceProperty, buffer: &mut [u8]) -> PropertyQuery {
        let Some((value_type, data)) = self.device.properties.get(&property) else {
            return PropertyQuery::Missing;
        };
        if buffer.len() < data.len() {
            return PropertyQuery::InsufficientBuffer {
                value_type: *value_type,
                required: data.len(),
            };
        }
        buffer[..data.len()].copy_from_slice(data);
        PropertyQuery::Complete {
            value_type: *value_type,
            len: data.len(),
        }
    }

    fn open_device_key(&self) -> Option<FakeKey<'a>> {
        let values = self.device.key.as_deref()?;
        bump(&self.ledger.keys_opened);
        Some(FakeKey {
            values,
            ledger: self.ledger,
        })
    }
}

pub struct FakeKey<'a> {
    values: &'a [FakeValue],
    ledger: &'a HandleLedger,
}

impl Drop for FakeKey<'_> {
    fn drop(&mut self) {
        bump(&self.ledger.keys_closed);
    }
}

impl RegistryValues for FakeKey<'_> {
    fn enum_value(&self, index: u32, name: &mut [u16], data: &mut [u8]) -> ValueEnum {
        let Some(value) = self.values.get(index as usize) else {
            return ValueEnum::NoMoreItems;
        };
        let wide_name: Vec<u16> = value.name.encode_utf16().collect();
        if wide_name.len() + 1 > name.len() || value.data.len() > data.len() {
            return ValueEnum::MoreData {
                data_required: value.data.len(),
            };
        }
        name[..wide_name.len()].copy_from_slice(&wide_name);
        name[wide_name.len()] = 0;
        data[..value.data.len()].copy_from_slice(&value.data);
        ValueEnum::Entry {
            name_len: wide_name.len(),
            value_type: value.value_type,
            data_len: value.data.len(),
        }
    }
}
