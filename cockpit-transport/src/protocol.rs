//! Protocol constants and packet framing for the Cockpit Raw HID channel

use crate::error::TransportError;

/// Raw HID commands understood by the Cockpit firmware
pub mod cmd {
    // Lighting setters
    pub const SET_SKADIS_MODE: u8 = 0x01;
    pub const SET_WHITE_MODE: u8 = 0x02;
    pub const SET_RGB_EFFECT: u8 = 0x03;
    pub const SET_RGB_COLOR: u8 = 0x04;
    pub const SET_ANIMATION_SPEED: u8 = 0x05;
    pub const SET_DIRECTION: u8 = 0x06;

    // Queries
    pub const GET_VERSION: u8 = 0x0E;
    pub const GET_STATE: u8 = 0x0F;

    /// Get human-readable name for command byte
    pub fn name(cmd: u8) -> &'static str {
        match cmd {
            SET_SKADIS_MODE => "SET_SKADIS_MODE",
            SET_WHITE_MODE => "SET_WHITE_MODE",
            SET_RGB_EFFECT => "SET_RGB_EFFECT",
            SET_RGB_COLOR => "SET_RGB_COLOR",
            SET_ANIMATION_SPEED => "SET_ANIMATION_SPEED",
            SET_DIRECTION => "SET_DIRECTION",
            GET_VERSION => "GET_VERSION",
            GET_STATE => "GET_STATE",
            _ => "UNKNOWN",
        }
    }
}

/// Outbound report size: report ID + 32 byte Raw HID payload
pub const REPORT_SIZE: usize = 33;
/// Inbound report size (no report ID on reads)
pub const RESPONSE_SIZE: usize = 32;
/// Argument bytes that fit after report ID and command byte
pub const MAX_ARGS: usize = REPORT_SIZE - 2;

/// HID communication timing constants
pub mod timing {
    /// Timeout for the read that follows every command (ms)
    pub const READ_TIMEOUT_MS: u16 = 1000;
}

/// Device identification constants
pub mod device {
    /// Cockpit keyboard vendor ID
    pub const VENDOR_ID: u16 = 0x4648;
    /// Cockpit keyboard product ID
    pub const PRODUCT_ID: u16 = 0x0001;

    /// QMK Raw HID usage page (vendor-defined)
    pub const RAW_USAGE_PAGE: u16 = 0xFF60;
    /// QMK Raw HID usage
    pub const RAW_USAGE: u16 = 0x61;
}

/// Build a command buffer
///
/// Format: `[report_id=0] [cmd] [data...] [zero padding]`, always
/// `REPORT_SIZE` bytes. More than `MAX_ARGS` data bytes is rejected rather
/// than truncated, since a clipped packet would still be accepted by the
/// firmware.
pub fn build_command(cmd: u8, data: &[u8]) -> Result<Vec<u8>, TransportError> {
    if data.len() > MAX_ARGS {
        return Err(TransportError::InvalidArgument(format!(
            "command 0x{:02X} takes at most {} argument bytes, got {}",
            cmd,
            MAX_ARGS,
            data.len()
        )));
    }
    let mut buf = vec![0u8; REPORT_SIZE];
    buf[0] = 0; // Report ID
    buf[1] = cmd;
    buf[2..2 + data.len()].copy_from_slice(data);
    Ok(buf)
}
