//! Decoded lighting state and firmware version

use std::fmt;

use cockpit_transport::{StateResponse, VersionResponse};
use serde::Serialize;

use crate::led::{Hsv, RgbEffect};

/// Firmware version information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FirmwareVersion {
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub(crate) fn from_transport_response(resp: &VersionResponse) -> Self {
        Self::new(resp.major, resp.minor, resp.patch)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Lighting state as reported by GET_STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightingState {
    /// Raw rgblight mode index
    pub effect_index: u8,
    pub color: Hsv,
    /// Animation speed in host terms (0 = slowest)
    pub speed: u8,
    pub skadis_mode: bool,
    pub white_mode: bool,
}

impl LightingState {
    /// The effect, if the mode index is one of the known effects
    pub fn effect(&self) -> Option<RgbEffect> {
        RgbEffect::from_u8(self.effect_index)
    }

    pub(crate) fn from_transport_response(resp: &StateResponse) -> Self {
        Self {
            effect_index: resp.effect,
            color: Hsv::new(resp.hsv.h, resp.hsv.s, resp.hsv.v),
            speed: resp.speed,
            skadis_mode: resp.skadis,
            white_mode: resp.white,
        }
    }
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            effect_index: RgbEffect::Static.as_u8(),
            color: Hsv::DEFAULT,
            speed: crate::led::SPEED_DEFAULT,
            skadis_mode: false,
            white_mode: false,
        }
    }
}

impl fmt::Display for LightingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let effect = self
            .effect()
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| format!("mode {}", self.effect_index));
        let on_off = |b: bool| if b { "on" } else { "off" };
        writeln!(f, "Skadis mode: {}", on_off(self.skadis_mode))?;
        writeln!(f, "White mode:  {}", on_off(self.white_mode))?;
        writeln!(f, "Effect:      {} ({})", effect, self.effect_index)?;
        writeln!(f, "Color:       {}", self.color)?;
        write!(f, "Speed:       {}", self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockpit_transport::HsvData;

    #[test]
    fn test_state_from_response() {
        let resp = StateResponse {
            effect: 42,
            hsv: HsvData { h: 1, s: 2, v: 3 },
            speed: 9,
            skadis: true,
            white: true,
        };
        let state = LightingState::from_transport_response(&resp);
        assert_eq!(state.effect(), None);
        assert_eq!(state.color, Hsv::new(1, 2, 3));
        assert!(state.to_string().contains("mode 42"));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(FirmwareVersion::new(1, 2, 3).to_string(), "v1.2.3");
    }
}
