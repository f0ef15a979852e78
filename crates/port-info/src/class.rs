//! Device setup classes that can carry serial ports
//!
//! Besides the standard "Ports (COM & LPT)" class, modems and a few
//! virtual serial port drivers register their ports under classes of
//! their own. The scan visits them in the order of [`DeviceClass::ALL`].

use std::fmt;

/// A device setup class scanned for serial ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Windows "Ports (COM & LPT)" class
    Ports,
    /// Virtual ports class (com0com and similar)
    VirtualPorts,
    /// Windows modems class
    Modems,
    /// Eltima Virtual Serial Port Driver v4
    EltimaVirtualSerial,
    /// Advanced Virtual COM Port
    AdvancedVirtualCom,
}

impl DeviceClass {
    /// Every class, in scan order
    pub const ALL: [DeviceClass; 5] = [
        DeviceClass::Ports,
        DeviceClass::VirtualPorts,
        DeviceClass::Modems,
        DeviceClass::EltimaVirtualSerial,
        DeviceClass::AdvancedVirtualCom,
    ];

    /// Class GUID packed into a single `u128`
    pub const fn guid(self) -> u128 {
        match self {
            DeviceClass::Ports => 0x4D36E978_E325_11CE_BFC1_08002BE10318,
            DeviceClass::VirtualPorts => 0xDF799E12_3C56_421B_B298_B6D3642BC878,
            DeviceClass::Modems => 0x4D36E96D_E325_11CE_BFC1_08002BE10318,
            DeviceClass::EltimaVirtualSerial => 0xCC0EF009_B820_42F4_95A9_9BFA6A5AB7AB,
            DeviceClass::AdvancedVirtualCom => 0x9341CD95_4371_4A37_A5AF_FDB0A9D19631,
        }
    }

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DeviceClass::Ports => "Ports",
            DeviceClass::VirtualPorts => "Virtual Ports",
            DeviceClass::Modems => "Modems",
            DeviceClass::EltimaVirtualSerial => "Eltima Virtual Serial",
            DeviceClass::AdvancedVirtualCom => "Advanced Virtual COM",
        }
    }

    /// GUID in registry form, e.g. `{4D36E978-E325-11CE-BFC1-08002BE10318}`
    pub fn guid_string(self) -> String {
        let g = self.guid();
        format!(
            "{{{:08X}-{:04X}-{:04X}-{:04X}-{:012X}}}",
            (g >> 96) as u32,
            (g >> 80) as u16,
            (g >> 64) as u16,
            (g >> 48) as u16,
            g & 0xFFFF_FFFF_FFFF
        )
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.guid_string())
    }
}
