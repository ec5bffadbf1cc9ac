//! High-level lighting interface for the Cockpit keyboard
//!
//! [`LedController`] maps lighting intents (Skadis mode, white mode, effect,
//! color, animation speed) onto Raw HID commands sent through a
//! [`DeviceSession`]. It holds the session itself; there is no global
//! device handle.

pub mod error;
pub mod led;
pub mod settings;

pub use error::KeyboardError;
pub use led::{Hsv, RgbEffect, SPEED_DEFAULT};
pub use settings::{FirmwareVersion, LightingState};

use cockpit_transport::command::{
    HidCommand, HidResponse, QueryState, QueryVersion, SetAnimationSpeed, SetDirection,
    SetRgbColor, SetRgbEffect, SetSkadisMode, SetWhiteMode, StateResponse, VersionResponse,
};
use cockpit_transport::{
    DeviceIdentity, DeviceSession, PrinterConfig, SessionConfig, TransportDeviceInfo,
};
use tracing::warn;

/// Lighting controller bound to one device session
///
/// Setters return the firmware's raw reply, which is empty when the read
/// timed out or the session is fire-and-forget. Every failure is logged
/// and returned; the controller stays usable afterwards.
pub struct LedController {
    session: DeviceSession,
}

impl LedController {
    /// Create a controller over an existing (possibly unconnected) session
    pub fn new(session: DeviceSession) -> Self {
        Self { session }
    }

    /// Create an unconnected controller backed by hidapi
    pub fn hid(
        identity: DeviceIdentity,
        config: SessionConfig,
        printer_config: Option<PrinterConfig>,
    ) -> Result<Self, KeyboardError> {
        Ok(Self::new(DeviceSession::hid(identity, config, printer_config)?))
    }

    /// Get the underlying session
    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DeviceSession {
        &mut self.session
    }

    /// Locate and open the keyboard's Raw HID interface
    pub fn connect(&mut self) -> Result<TransportDeviceInfo, KeyboardError> {
        self.session.connect().map_err(|e| {
            warn!("Failed to connect to keyboard: {}", e);
            KeyboardError::from(e)
        })
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn device_info(&self) -> Option<&TransportDeviceInfo> {
        self.session.device_info()
    }

    // === Mode Toggles ===

    /// Turn Skadis lighting mode on or off
    pub fn set_skadis_mode(&self, enabled: bool) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetSkadisMode::new(enabled))
    }

    /// Turn white-only mode on or off (firmware ignores this outside Skadis mode)
    pub fn set_white_mode(&self, enabled: bool) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetWhiteMode::new(enabled))
    }

    // === RGB Control ===

    pub fn set_rgb_effect(&self, effect: RgbEffect) -> Result<Vec<u8>, KeyboardError> {
        self.set_rgb_effect_index(effect.as_u8())
    }

    /// Select an effect by raw rgblight mode index
    pub fn set_rgb_effect_index(&self, index: u8) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetRgbEffect::new(index))
    }

    pub fn set_rgb_color(&self, h: u8, s: u8, v: u8) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetRgbColor::new(h, s, v))
    }

    pub fn set_color(&self, color: Hsv) -> Result<Vec<u8>, KeyboardError> {
        self.set_rgb_color(color.h, color.s, color.v)
    }

    /// Set animation speed (0 = slowest, 255 = fastest)
    pub fn set_animation_speed(&self, speed: u8) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetAnimationSpeed::new(speed))
    }

    /// Step the running animation forward, or backward when `reverse`
    pub fn set_direction(&self, reverse: bool) -> Result<Vec<u8>, KeyboardError> {
        self.send(&SetDirection::new(reverse))
    }

    // === Queries ===

    pub fn get_version(&self) -> Result<FirmwareVersion, KeyboardError> {
        let resp: VersionResponse = self.query(&QueryVersion)?;
        Ok(FirmwareVersion::from_transport_response(&resp))
    }

    /// Read mode, color, speed and toggle state from the firmware
    pub fn get_state(&self) -> Result<LightingState, KeyboardError> {
        let resp: StateResponse = self.query(&QueryState)?;
        Ok(LightingState::from_transport_response(&resp))
    }

    fn send<C: HidCommand>(&self, command: &C) -> Result<Vec<u8>, KeyboardError> {
        self.session.send_command(command).map_err(|e| {
            warn!("Command 0x{:02X} failed: {}", C::CMD, e);
            KeyboardError::from(e)
        })
    }

    fn query<C: HidCommand, R: HidResponse>(&self, command: &C) -> Result<R, KeyboardError> {
        let resp = self.session.query_command(command).map_err(|e| {
            warn!("Query 0x{:02X} failed: {}", C::CMD, e);
            KeyboardError::from(e)
        })?;
        if resp.is_empty() {
            return Err(KeyboardError::UnexpectedResponse(format!(
                "no reply to 0x{:02X}",
                C::CMD
            )));
        }
        R::parse(&resp).map_err(|e| KeyboardError::UnexpectedResponse(e.to_string()))
    }
}
