//! Device session: connect once, then exchange command packets
//!
//! The session owns at most one open transport. Every send is a blocking
//! write followed by a blocking read bounded by the read timeout; a
//! timeout yields an empty reply rather than an error.
//!
//! The firmware answers every packet, so replies to fire-and-forget sends
//! (or replies that arrived after an earlier timeout) can still sit in the
//! input queue. Typed commands skip replies whose first byte does not echo
//! their opcode.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::HidCommand;
use crate::discovery::{DeviceDiscovery, HidDiscovery};
use crate::error::TransportError;
use crate::printer::PrinterConfig;
use crate::protocol::{self, cmd, timing, RESPONSE_SIZE};
use crate::types::{DeviceIdentity, TransportDeviceInfo};
use crate::{BoxedTransport, Transport};

/// Exchange settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Read timeout after each write, in milliseconds
    pub read_timeout_ms: u16,
    /// Read the firmware's reply after each write. When false, sends are
    /// fire-and-forget and return an empty reply immediately.
    pub await_response: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: timing::READ_TIMEOUT_MS,
            await_response: true,
        }
    }
}

/// A connection (or lack of one) to the keyboard's command interface
pub struct DeviceSession {
    discovery: Box<dyn DeviceDiscovery>,
    identity: DeviceIdentity,
    config: SessionConfig,
    transport: Option<BoxedTransport>,
}

impl DeviceSession {
    /// Create an unconnected session
    pub fn new(
        discovery: Box<dyn DeviceDiscovery>,
        identity: DeviceIdentity,
        config: SessionConfig,
    ) -> Self {
        Self {
            discovery,
            identity,
            config,
            transport: None,
        }
    }

    /// Create an unconnected session backed by hidapi
    ///
    /// With a printer config, every packet is echoed to stderr.
    pub fn hid(
        identity: DeviceIdentity,
        config: SessionConfig,
        printer_config: Option<PrinterConfig>,
    ) -> Result<Self, TransportError> {
        let discovery = match printer_config {
            Some(pc) => HidDiscovery::with_printer_config(pc)?,
            None => HidDiscovery::new()?,
        };
        Ok(Self::new(Box::new(discovery), identity, config))
    }

    /// Locate and open the command interface
    ///
    /// Lists interfaces under the identity's VID/PID, keeps those whose
    /// usage page/usage match, and opens the first. Any previously open
    /// handle is released first; on failure the session stays absent.
    pub fn connect(&mut self) -> Result<TransportDeviceInfo, TransportError> {
        self.transport = None;

        let candidates = self
            .discovery
            .list_devices(self.identity.vendor_id, self.identity.product_id)?;

        let target = candidates
            .into_iter()
            .find(|d| d.is_command_interface(&self.identity))
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!("no Raw HID interface for {}", self.identity))
            })?;

        let transport = self.discovery.open_device(&target)?;
        let info = transport.device_info().clone();
        info!("Connected to {} at {}", info.display_name(), info.device_path);
        self.transport = Some(transport);
        Ok(info)
    }

    /// Drop the open handle, if any
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            info!("Disconnected");
        }
    }

    /// Whether a handle is open
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Info for the open interface
    pub fn device_info(&self) -> Option<&TransportDeviceInfo> {
        self.transport.as_ref().map(|t| t.device_info())
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    /// Send a command and read back the reply
    ///
    /// # Arguments
    /// * `cmd` - Command byte
    /// * `args` - Up to `MAX_ARGS` argument bytes
    ///
    /// # Returns
    /// Whatever the read produced (up to 32 bytes). Empty on timeout or when
    /// `await_response` is off.
    pub fn send(&self, cmd: u8, args: &[u8]) -> Result<Vec<u8>, TransportError> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotConnected)?;
        let report = protocol::build_command(cmd, args)?;
        self.write_only(transport.as_ref(), cmd, &report)?;
        if !self.config.await_response {
            return Ok(Vec::new());
        }
        self.read_reply(transport.as_ref(), cmd, None)
    }

    /// Send a typed command and read back the reply
    ///
    /// Queued replies to other opcodes are discarded until one echoing
    /// `C::CMD` arrives or the read timeout runs out.
    pub fn send_command<C: HidCommand>(&self, command: &C) -> Result<Vec<u8>, TransportError> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotConnected)?;
        let report = command.build()?;
        self.write_only(transport.as_ref(), C::CMD, &report)?;
        if !self.config.await_response {
            return Ok(Vec::new());
        }
        self.read_reply(transport.as_ref(), C::CMD, Some(C::CMD))
    }

    /// Send a typed command and always read the reply, even when
    /// `await_response` is off
    pub fn query_command<C: HidCommand>(&self, command: &C) -> Result<Vec<u8>, TransportError> {
        let transport = self.transport.as_ref().ok_or(TransportError::NotConnected)?;
        let report = command.build()?;
        self.write_only(transport.as_ref(), C::CMD, &report)?;
        self.read_reply(transport.as_ref(), C::CMD, Some(C::CMD))
    }

    fn write_only(
        &self,
        transport: &dyn Transport,
        command: u8,
        report: &[u8],
    ) -> Result<(), TransportError> {
        debug!(
            "Sending {} (0x{:02X}): {:02X?}",
            cmd::name(command),
            command,
            &report[..8]
        );

        transport
            .write_report(report)
            .inspect_err(|e| debug!("Write of 0x{:02X} failed: {}", command, e))?;
        Ok(())
    }

    /// Read until a reply arrives, skipping ones that don't start with
    /// `echo` (when given). The whole loop shares one timeout budget.
    fn read_reply(
        &self,
        transport: &dyn Transport,
        command: u8,
        echo: Option<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let budget = Duration::from_millis(u64::from(self.config.read_timeout_ms));
        let deadline = Instant::now() + budget;
        let mut timeout = budget;

        loop {
            let resp = transport
                .read_report(RESPONSE_SIZE, timeout_ms(timeout))
                .inspect_err(|e| debug!("Read after 0x{:02X} failed: {}", command, e))?;

            if resp.is_empty() {
                debug!("No reply to 0x{:02X}", command);
                return Ok(resp);
            }

            match echo {
                Some(expected) if resp[0] != expected => {
                    debug!(
                        "Discarding stale reply to 0x{:02X} while waiting for 0x{:02X}",
                        resp[0], expected
                    );
                }
                _ => {
                    debug!("Reply to 0x{:02X}: {:02X?}", command, &resp[..resp.len().min(8)]);
                    return Ok(resp);
                }
            }

            timeout = deadline.saturating_duration_since(Instant::now());
            if timeout.is_zero() {
                debug!("No reply to 0x{:02X} before timeout", command);
                return Ok(Vec::new());
            }
        }
    }
}

fn timeout_ms(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}
