//! Transport layer for the Cockpit keyboard's Raw HID command channel
//!
//! This crate provides:
//!
//! - the packet layout and command table ([`protocol`], [`command`])
//! - a synchronous [`Transport`] trait with a hidapi backend
//! - device discovery filtered by VID/PID and usage page/usage
//! - [`DeviceSession`], the connect / send-and-read-back primitive
//! - [`PrinterTransport`], a middleware that prints every packet

pub mod command;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_raw;
mod session;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use command::{
    try_parse_command, try_parse_response, AnimationSpeedResponse, HidCommand, HidResponse,
    HsvData, ParseError, ParsedCommand, ParsedResponse, QueryState, QueryVersion,
    RgbColorResponse, RgbEffectResponse, SetAnimationSpeed, SetDirection, SetRgbColor,
    SetRgbEffect, SetSkadisMode, SetWhiteMode, SkadisModeResponse, StateResponse,
    VersionResponse, WhiteModeResponse,
};
pub use error::TransportError;
pub use printer::{PacketFilter, PrinterConfig, PrinterTransport};
pub use types::{DeviceIdentity, DiscoveredDevice, TransportDeviceInfo};

pub use discovery::{DeviceDiscovery, HidDiscovery};
pub use hid_raw::RawHidTransport;
pub use session::{DeviceSession, SessionConfig};

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// Methods are blocking. Implementations must be `Send + Sync` so a
/// session can be moved to whichever thread drives the UI.
pub trait Transport: Send + Sync {
    /// Write one output report (report ID included)
    ///
    /// # Returns
    /// Number of bytes written
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError>;

    /// Read one input report
    ///
    /// # Arguments
    /// * `len` - Maximum number of bytes to read
    /// * `timeout_ms` - Timeout in milliseconds (-1 blocks indefinitely)
    ///
    /// # Returns
    /// The bytes read; empty if nothing arrived before the timeout
    fn read_report(&self, len: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;
