//! SetupAPI backend
//!
//! Device information sets and device registry keys are owned by guards
//! that release the OS handle when dropped.

use std::mem;
use std::ptr;

use tracing::trace;
use windows_sys::core::GUID;
use windows_sys::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsW,
    SetupDiGetDeviceRegistryPropertyW, SetupDiOpenDevRegKey, DICS_FLAG_GLOBAL, DIGCF_PRESENT,
    DIREG_DEV, HDEVINFO, SP_DEVINFO_DATA,
};
use windows_sys::Win32::Foundation::{
    GetLastError, ERROR_INSUFFICIENT_BUFFER, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS,
    INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::System::Registry::{RegCloseKey, RegEnumValueW, HKEY, KEY_READ};

use crate::backend::{DeviceBackend, DeviceRecord, DeviceSet, PropertyQuery, RegistryValues, ValueEnum};
use crate::class::DeviceClass;
use crate::error::EnumError;
use crate::property::DeviceProperty;

/// The Windows device manager
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupApi;

impl DeviceBackend for SetupApi {
    type Set<'a> = DeviceInfoSet;

    fn open_class(&self, class: DeviceClass) -> Result<DeviceInfoSet, EnumError> {
        DeviceInfoSet::open(class)
    }
}

/// Present devices of one class; destroyed on drop
#[derive(Debug)]
pub struct DeviceInfoSet {
    handle: HDEVINFO,
    class: DeviceClass,
}

impl DeviceInfoSet {
    fn open(class: DeviceClass) -> Result<Self, EnumError> {
        let guid = GUID::from_u128(class.guid());
        // SAFETY: `guid` outlives the call; a null enumerator and parent window are allowed.
        let handle = unsafe {
            SetupDiGetClassDevsW(&guid, ptr::null(), ptr::null_mut(), DIGCF_PRESENT)
        };
        if handle == INVALID_HANDLE_VALUE as HDEVINFO {
            // SAFETY: reads the calling thread's last-error value.
            let code = unsafe { GetLastError() };
            return Err(EnumError::ClassUnavailable { class, code });
        }
        trace!(%class, "opened device information set");
        Ok(Self { handle, class })
    }
}

impl DeviceSet for DeviceInfoSet {
    type Record<'a> = DeviceInfo<'a>;

    fn device(&self, index: u32) -> Option<DeviceInfo<'_>> {
        // SAFETY: SP_DEVINFO_DATA is plain data; all-zero is a valid value.
        let mut data: SP_DEVINFO_DATA = unsafe { mem::zeroed() };
        data.cbSize = mem::size_of::<SP_DEVINFO_DATA>() as u32;
        // SAFETY: the set handle is live while `self` is, `data` is sized correctly.
        let ok = unsafe { SetupDiEnumDeviceInfo(self.handle, index, &mut data) };
        (ok != 0).then_some(DeviceInfo { set: self, data })
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        // SAFETY: the handle came from SetupDiGetClassDevsW and is destroyed exactly once.
        unsafe {
            SetupDiDestroyDeviceInfoList(self.handle);
        }
        trace!(class = %self.class, "released device information set");
    }
}

/// One device of a [`DeviceInfoSet`]
pub struct DeviceInfo<'a> {
    set: &'a DeviceInfoSet,
    data: SP_DEVINFO_DATA,
}

impl DeviceRecord for DeviceInfo<'_> {
    type Key = RegKey;

    fn query_property(&self, property: DeviceProperty, buffer: &mut [u8]) -> PropertyQuery {
        let mut value_type = 0u32;
        let mut required = 0u32;
        let out = if buffer.is_empty() {
            ptr::null_mut()
        } else {
            buffer.as_mut_ptr()
        };
        // SAFETY: `out` is null or points to `buffer.len()` writable bytes.
        let ok = unsafe {
            SetupDiGetDeviceRegistryPropertyW(
                self.set.handle,
                &self.data,
                property.code(),
                &mut value_type,
                out,
                buffer.len() as u32,
                &mut required,
            )
        };
        if ok != 0 {
            return PropertyQuery::Complete {
                value_type,
                len: required as usize,
            };
        }
        // SAFETY: reads the calling thread's last-error value.
        match unsafe { GetLastError() } {
            ERROR_INSUFFICIENT_BUFFER => PropertyQuery::InsufficientBuffer {
                value_type,
                required: required as usize,
            },
            _ => PropertyQuery::Missing,
        }
    }

    fn open_device_key(&self) -> Option<RegKey> {
        // SAFETY: set handle and device data are live for the call.
        let key = unsafe {
            SetupDiOpenDevRegKey(
                self.set.handle,
                &self.data,
                DICS_FLAG_GLOBAL,
                0,
                DIREG_DEV,
                KEY_READ,
            )
        };
        if key == INVALID_HANDLE_VALUE as HKEY {
            return None;
        }
        Some(RegKey(key))
    }
}

/// An open device registry key; closed on drop
#[derive(Debug)]
pub struct RegKey(HKEY);

impl RegistryValues for RegKey {
    fn enum_value(&self, index: u32, name: &mut [u16], data: &mut [u8]) -> ValueEnum {
        let mut name_len = name.len() as u32;
        let mut data_len = data.len() as u32;
        let mut value_type = 0u32;
        // SAFETY: buffer lengths are passed alongside their pointers.
        let status = unsafe {
            RegEnumValueW(
                self.0,
                index,
                name.as_mut_ptr(),
                &mut name_len,
                ptr::null_mut(),
                &mut value_type,
                data.as_mut_ptr(),
                &mut data_len,
            )
        };
        match status {
            ERROR_SUCCESS => ValueEnum::Entry {
                name_len: name_len as usize,
                value_type,
                data_len: data_len as usize,
            },
            ERROR_MORE_DATA => ValueEnum::MoreData {
                data_required: data_len as usize,
            },
            ERROR_NO_MORE_ITEMS => ValueEnum::NoMoreItems,
            code => ValueEnum::Failed(code),
        }
    }
}

impl Drop for RegKey {
    fn drop(&mut self) {
        // SAFETY: the key came from SetupDiOpenDevRegKey and is closed exactly once.
        unsafe {
            RegCloseKey(self.0);
        }
    }
}
