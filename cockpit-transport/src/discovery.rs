//! Device discovery for the Cockpit keyboard's Raw HID interface

use std::ffi::CString;
use std::sync::Arc;

use hidapi::HidApi;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid_raw::RawHidTransport;
use crate::printer::{PrinterConfig, PrinterTransport};
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::BoxedTransport;

/// Device discovery abstraction
pub trait DeviceDiscovery: Send + Sync {
    /// List every HID interface exposed under a VID/PID pair
    ///
    /// No usage filtering happens here; callers pick the interface.
    fn list_devices(&self, vid: u16, pid: u16) -> Result<Vec<DiscoveredDevice>, TransportError>;

    /// Open a specific interface by its path
    fn open_device(&self, device: &DiscoveredDevice) -> Result<BoxedTransport, TransportError>;
}

/// hidapi-backed discovery
pub struct HidDiscovery {
    api: Mutex<HidApi>,
    /// Optional printer config for monitoring mode - wraps transports automatically
    printer_config: Option<PrinterConfig>,
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::HidError(e.to_string()))?;
        Ok(Self {
            api: Mutex::new(api),
            printer_config: None,
        })
    }

    /// Create with printer config for monitoring mode
    /// All transports opened via open_device() will be wrapped with Printer
    pub fn with_printer_config(config: PrinterConfig) -> Result<Self, TransportError> {
        let mut discovery = Self::new()?;
        discovery.printer_config = Some(config);
        Ok(discovery)
    }

    fn to_info(device_info: &hidapi::DeviceInfo) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid: device_info.vendor_id(),
            pid: device_info.product_id(),
            usage_page: device_info.usage_page(),
            usage: device_info.usage(),
            interface_number: device_info.interface_number(),
            device_path: device_info.path().to_string_lossy().to_string(),
            serial: device_info.serial_number().map(|s| s.to_string()),
            manufacturer: device_info.manufacturer_string().map(|s| s.to_string()),
            product_name: device_info.product_string().map(|s| s.to_string()),
        }
    }
}

impl DeviceDiscovery for HidDiscovery {
    fn list_devices(&self, vid: u16, pid: u16) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let mut api = self.api.lock();
        api.refresh_devices()?;

        let devices: Vec<DiscoveredDevice> = api
            .device_list()
            .filter(|d| d.vendor_id() == vid && d.product_id() == pid)
            .map(|d| {
                let info = Self::to_info(d);
                debug!(
                    "Found interface: VID={:04X} PID={:04X} usage_page=0x{:04X} usage=0x{:02X} if={} path={}",
                    info.vid, info.pid, info.usage_page, info.usage, info.interface_number, info.device_path
                );
                DiscoveredDevice { info }
            })
            .collect();

        info!("Found {} interfaces for {:04X}:{:04X}", devices.len(), vid, pid);
        Ok(devices)
    }

    fn open_device(&self, device: &DiscoveredDevice) -> Result<BoxedTransport, TransportError> {
        let path = CString::new(device.info.device_path.clone()).map_err(|e| {
            TransportError::Internal(format!("invalid device path {:?}: {e}", device.info.device_path))
        })?;

        let hid_device = {
            let api = self.api.lock();
            api.open_path(&path)?
        };
        debug!("Opened {}", device.info.device_path);

        let transport: BoxedTransport =
            Arc::new(RawHidTransport::new(hid_device, device.info.clone()));

        if let Some(ref config) = self.printer_config {
            Ok(PrinterTransport::wrap(transport, config.clone()))
        } else {
            Ok(transport)
        }
    }
}
