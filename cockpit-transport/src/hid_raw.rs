//! Raw HID transport for the QMK vendor channel (usage page 0xFF60)

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport over the keyboard's Raw HID interface
///
/// Commands go out as interrupt OUT reports (`hid_write`), replies come
/// back as interrupt IN reports (`hid_read_timeout`).
pub struct RawHidTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl RawHidTransport {
    /// Wrap an opened Raw HID interface
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
        }
    }
}

impl Transport for RawHidTransport {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        let device = self.device.lock();
        let written = device.write(report)?;
        debug!("Wrote {} bytes to {}", written, self.info.device_path);
        Ok(written)
    }

    fn read_report(&self, len: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
        let device = self.device.lock();
        let mut buf = vec![0u8; len];
        let n = device.read_timeout(&mut buf, timeout_ms)?;
        if n == 0 {
            debug!("No response within {} ms", timeout_ms);
        }
        buf.truncate(n);
        Ok(buf)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for RawHidTransport {
    fn drop(&mut self) {
        debug!("RawHidTransport dropped, closing {}", self.info.device_path);
    }
}
