//! In-memory discovery and transport for tests
//!
//! `MockTransport` records every written report and serves queued replies;
//! an empty queue behaves like a read timeout.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::discovery::DeviceDiscovery;
use crate::error::TransportError;
use crate::protocol::device;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};
use crate::{BoxedTransport, Transport};

/// Interface info under the default VID/PID
pub fn mock_interface(usage_page: u16, usage: u16, interface_number: i32) -> DiscoveredDevice {
    DiscoveredDevice {
        info: TransportDeviceInfo {
            vid: device::VENDOR_ID,
            pid: device::PRODUCT_ID,
            usage_page,
            usage,
            interface_number,
            device_path: format!("mock:{interface_number}"),
            serial: None,
            manufacturer: Some("Skadis".into()),
            product_name: Some("Cockpit".into()),
        },
    }
}

pub struct MockTransport {
    info: TransportDeviceInfo,
    writes: Mutex<Vec<Vec<u8>>>,
    responses: Mutex<VecDeque<Vec<u8>>>,
    reads: AtomicUsize,
    last_timeout: Mutex<Option<i32>>,
    fail_on_write: bool,
    fail_on_read: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            info: mock_interface(device::RAW_USAGE_PAGE, device::RAW_USAGE, 1).info,
            writes: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            reads: AtomicUsize::new(0),
            last_timeout: Mutex::new(None),
            fail_on_write: false,
            fail_on_read: false,
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_on_write: true,
            ..Self::new()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_on_read: true,
            ..Self::new()
        }
    }

    /// Queue a reply for the next read
    pub fn push_response(&self, data: Vec<u8>) {
        self.responses.lock().push_back(data);
    }

    /// Every report written so far
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().clone()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes.lock().last().cloned()
    }

    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn last_read_timeout(&self) -> Option<i32> {
        *self.last_timeout.lock()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        if self.fail_on_write {
            return Err(TransportError::HidError("Mock write failure".into()));
        }
        self.writes.lock().push(report.to_vec());
        Ok(report.len())
    }

    fn read_report(&self, len: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        *self.last_timeout.lock() = Some(timeout_ms);
        if self.fail_on_read {
            return Err(TransportError::HidError("Mock read failure".into()));
        }
        let mut resp = self.responses.lock().pop_front().unwrap_or_default();
        resp.truncate(len);
        Ok(resp)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

struct MockDiscoveryState {
    devices: Mutex<Vec<DiscoveredDevice>>,
    transport: Option<Arc<MockTransport>>,
    list_calls: AtomicUsize,
    open_calls: AtomicUsize,
}

/// Discovery returning a fixed interface list; every open yields the
/// same shared `MockTransport`
#[derive(Clone)]
pub struct MockDiscovery {
    state: Arc<MockDiscoveryState>,
}

impl MockDiscovery {
    pub fn with_devices(devices: Vec<DiscoveredDevice>, transport: Option<Arc<MockTransport>>) -> Self {
        Self {
            state: Arc::new(MockDiscoveryState {
                devices: Mutex::new(devices),
                transport,
                list_calls: AtomicUsize::new(0),
                open_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Nothing plugged in
    pub fn empty() -> Self {
        Self::with_devices(Vec::new(), None)
    }

    /// A keyboard exposing its boot keyboard interface and the Raw HID one
    pub fn with_raw_interface(transport: Arc<MockTransport>) -> Self {
        Self::with_devices(
            vec![
                mock_interface(0x0001, 0x0006, 0),
                mock_interface(device::RAW_USAGE_PAGE, device::RAW_USAGE, 1),
            ],
            Some(transport),
        )
    }

    /// A keyboard whose firmware was built without Raw HID
    pub fn with_keyboard_interface_only(transport: Arc<MockTransport>) -> Self {
        Self::with_devices(vec![mock_interface(0x0001, 0x0006, 0)], Some(transport))
    }

    /// Remove every device from subsequent listings
    pub fn unplug(&self) {
        self.state.devices.lock().clear();
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn open_calls(&self) -> usize {
        self.state.open_calls.load(Ordering::SeqCst)
    }
}

impl DeviceDiscovery for MockDiscovery {
    fn list_devices(&self, vid: u16, pid: u16) -> Result<Vec<DiscoveredDevice>, TransportError> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state
            .devices
            .lock()
            .iter()
            .filter(|d| d.info.vid == vid && d.info.pid == pid)
            .cloned()
            .collect())
    }

    fn open_device(&self, device: &DiscoveredDevice) -> Result<BoxedTransport, TransportError> {
        self.state.open_calls.fetch_add(1, Ordering::SeqCst);
        match &self.state.transport {
            Some(t) => Ok(t.clone() as BoxedTransport),
            None => Err(TransportError::DeviceNotFound(device.info.device_path.clone())),
        }
    }
}
