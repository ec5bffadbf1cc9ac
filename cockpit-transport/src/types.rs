//! Common types for transport layer

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::device;

/// Identity of the one HID interface that accepts LED commands
///
/// A QMK keyboard exposes several interfaces under the same VID/PID (boot
/// keyboard, media keys, Raw HID). Only the Raw HID interface, selected by
/// usage page/usage, understands the command packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceIdentity {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// HID usage page of the vendor channel
    pub usage_page: u16,
    /// HID usage of the vendor channel
    pub usage: u16,
}

impl DeviceIdentity {
    /// Identity for a VID/PID pair on the standard QMK Raw HID interface
    pub fn raw_hid(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            usage_page: device::RAW_USAGE_PAGE,
            usage: device::RAW_USAGE,
        }
    }

    /// Check VID/PID only
    pub fn matches_ids(&self, vid: u16, pid: u16) -> bool {
        self.vendor_id == vid && self.product_id == pid
    }

    /// Check usage page/usage only
    pub fn matches_usage(&self, usage_page: u16, usage: u16) -> bool {
        self.usage_page == usage_page && self.usage == usage
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::raw_hid(device::VENDOR_ID, device::PRODUCT_ID)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}:{:04X} (usage page 0x{:04X}, usage 0x{:02X})",
            self.vendor_id, self.product_id, self.usage_page, self.usage
        )
    }
}

/// Device identification information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// HID usage page of this interface
    pub usage_page: u16,
    /// HID usage of this interface
    pub usage: u16,
    /// USB interface number (-1 if unknown)
    pub interface_number: i32,
    /// Device path used to open the interface
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Manufacturer name if available
    pub manufacturer: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Name to show the user, falling back to VID:PID
    pub fn display_name(&self) -> String {
        match (&self.manufacturer, &self.product_name) {
            (Some(m), Some(p)) => format!("{m} {p}"),
            (None, Some(p)) => p.clone(),
            _ => format!("{:04X}:{:04X}", self.vid, self.pid),
        }
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

impl DiscoveredDevice {
    /// Whether this interface is the one the identity selects
    pub fn is_command_interface(&self, identity: &DeviceIdentity) -> bool {
        identity.matches_ids(self.info.vid, self.info.pid)
            && identity.matches_usage(self.info.usage_page, self.info.usage)
    }
}
