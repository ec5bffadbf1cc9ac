//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `set`: Lighting changes (skadis, white, effect, color, speed, direction)
//! - `query`: Read-only commands (state, version)
//! - `utility`: Commands that don't need a connection (list, effects)

pub mod query;
pub mod set;
pub mod utility;

use cockpit_keyboard::{KeyboardError, LedController};
use cockpit_led::config::Config;
use cockpit_transport::protocol::cmd;
use cockpit_transport::{try_parse_response, PacketFilter, ParsedResponse, PrinterConfig};
use thiserror::Error;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Startup connection failure; `main` follows it with troubleshooting hints
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ConnectError(#[from] pub KeyboardError);

/// Open and connect the keyboard described by `config`
pub fn open_controller(
    config: &Config,
    printer_config: Option<PrinterConfig>,
) -> Result<LedController, ConnectError> {
    let mut led = LedController::hid(config.device, config.session, printer_config)?;
    led.connect()?;
    Ok(led)
}

impl ConnectError {
    /// Extra advice for failures with a known cause
    pub fn hint(&self) -> Option<&'static str> {
        if self.0.is_permission_denied() {
            Some("Found the keyboard but may not open its hidraw node; check your udev rules")
        } else {
            None
        }
    }
}

/// Lines printed after a failed startup connect
pub const CONNECT_HELP: [&str; 3] = [
    "1. The keyboard is properly connected",
    "2. You have the necessary permissions to access HID devices",
    "3. The keyboard firmware supports Raw HID communication",
];

/// Describe a firmware reply in a few words, or None if nothing came back
pub fn describe_reply(resp: &[u8]) -> Option<String> {
    let on_off = |b: bool| if b { "on" } else { "off" };
    let text = match try_parse_response(resp) {
        ParsedResponse::Empty => return None,
        ParsedResponse::SkadisMode(r) => format!("skadis {}", on_off(r.enabled)),
        ParsedResponse::WhiteMode(r) => format!("white {}", on_off(r.enabled)),
        ParsedResponse::RgbEffect(r) => format!("effect {}", r.effect),
        ParsedResponse::RgbColor(r) => format!("hsv {},{},{}", r.hsv.h, r.hsv.s, r.hsv.v),
        ParsedResponse::AnimationSpeed(r) => format!("speed {}", r.speed),
        ParsedResponse::Direction { reverse } => {
            format!("direction {}", if reverse { "rev" } else { "fwd" })
        }
        ParsedResponse::Version(v) => format!("v{}.{}.{}", v.major, v.minor, v.patch),
        ParsedResponse::State(s) => format!("mode {}", s.effect),
        ParsedResponse::Unknown { cmd, data } => {
            format!("0x{:02X} {:02X?}", cmd, &data[..data.len().min(8)])
        }
    };
    Some(text)
}

/// Describe the firmware's answer to a setter
///
/// `stored` holds the value bytes the firmware keeps when it accepts the
/// setting. Outside Skadis mode the firmware ignores setters 0x02-0x06 and
/// answers with zeroed value bytes, which would otherwise decode as a
/// plausible setting.
pub fn describe_set_reply(resp: &[u8], stored: &[u8]) -> Option<String> {
    if resp.is_empty() || resp.iter().all(|&b| b == 0) {
        return None;
    }
    let values = &resp[1..resp.len().min(1 + stored.len())];
    let zeroed = |bytes: &[u8]| bytes.iter().all(|&b| b == 0);

    if zeroed(values) && resp[0] != cmd::SET_SKADIS_MODE {
        // A setting stored as zero looks the same as an ignored one
        if zeroed(stored) {
            return None;
        }
        return Some("ignored, is Skadis mode on?".to_string());
    }
    if values == stored {
        return Some("confirmed".to_string());
    }
    describe_reply(resp)
}

/// Create printer config from CLI flags
pub fn create_printer_config(
    monitor: bool,
    hex: bool,
    filter: Option<&str>,
) -> anyhow::Result<Option<PrinterConfig>> {
    if !monitor {
        return Ok(None);
    }

    let filter = match filter {
        Some(f) => f.parse::<PacketFilter>().map_err(anyhow::Error::msg)?,
        None => PacketFilter::All,
    };

    Ok(Some(PrinterConfig::default().with_hex(hex).with_filter(filter)))
}
