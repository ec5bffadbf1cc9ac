//! Type-safe HID command builders and response parsers
//!
//! This module keeps the argument layout of every Cockpit command and the
//! shape of the firmware's replies in one place. Replies echo the command
//! byte at offset 0; the rest is command specific.

use std::fmt;

use crate::error::TransportError;
use crate::protocol::{self, cmd};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// =============================================================================
// Core Traits
// =============================================================================

/// A command that can be serialized to HID bytes
pub trait HidCommand: Sized {
    /// Command byte (e.g., 0x04 for SET_RGB_COLOR)
    const CMD: u8;

    /// Serialize to bytes (excluding report ID and command byte)
    fn to_data(&self) -> Vec<u8>;

    /// Build complete HID buffer (33 bytes with report ID, command, data)
    fn build(&self) -> Result<Vec<u8>, TransportError> {
        protocol::build_command(Self::CMD, &self.to_data())
    }
}

/// A response that can be parsed from HID bytes
pub trait HidResponse: Sized {
    /// Expected command echo byte (for validation)
    const CMD_ECHO: u8;

    /// Minimum response length required
    const MIN_LEN: usize;

    /// Parse from response bytes (starting with command echo)
    fn from_data(data: &[u8]) -> Result<Self, ParseError>;

    /// Parse with validation
    fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::MIN_LEN {
            return Err(ParseError::TooShort {
                expected: Self::MIN_LEN,
                got: data.len(),
            });
        }
        if data[0] != Self::CMD_ECHO {
            return Err(ParseError::CommandMismatch {
                expected: Self::CMD_ECHO,
                got: data[0],
            });
        }
        Self::from_data(data)
    }
}

/// Parse error for responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    TooShort { expected: usize, got: usize },
    CommandMismatch { expected: u8, got: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { expected, got } => {
                write!(
                    f,
                    "Response too short: expected {} bytes, got {}",
                    expected, got
                )
            }
            Self::CommandMismatch { expected, got } => {
                write!(
                    f,
                    "Command mismatch: expected 0x{:02X}, got 0x{:02X}",
                    expected, got
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Firmware stores `255 - speed`, and reports its stored value back
#[inline]
pub fn invert_speed(speed: u8) -> u8 {
    u8::MAX - speed
}

// =============================================================================
// Mode toggles
// =============================================================================

/// SET_SKADIS_MODE (0x01)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSkadisMode {
    pub enabled: bool,
}

impl SetSkadisMode {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl HidCommand for SetSkadisMode {
    const CMD: u8 = cmd::SET_SKADIS_MODE;

    fn to_data(&self) -> Vec<u8> {
        vec![u8::from(self.enabled)]
    }
}

/// SET_SKADIS_MODE response: the mode now in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkadisModeResponse {
    pub enabled: bool,
}

impl HidResponse for SkadisModeResponse {
    const CMD_ECHO: u8 = cmd::SET_SKADIS_MODE;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            enabled: data[1] != 0,
        })
    }
}

/// SET_WHITE_MODE (0x02)
///
/// Ignored by the firmware unless Skadis mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetWhiteMode {
    pub enabled: bool,
}

impl SetWhiteMode {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl HidCommand for SetWhiteMode {
    const CMD: u8 = cmd::SET_WHITE_MODE;

    fn to_data(&self) -> Vec<u8> {
        vec![u8::from(self.enabled)]
    }
}

/// SET_WHITE_MODE response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhiteModeResponse {
    pub enabled: bool,
}

impl HidResponse for WhiteModeResponse {
    const CMD_ECHO: u8 = cmd::SET_WHITE_MODE;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            enabled: data[1] != 0,
        })
    }
}

// =============================================================================
// RGB effect / color / speed / direction
// =============================================================================

/// SET_RGB_EFFECT (0x03)
///
/// The index is passed through unchanged; the firmware ignores indices
/// past its last effect and replies with the mode it kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRgbEffect {
    pub effect: u8,
}

impl SetRgbEffect {
    pub fn new(effect: u8) -> Self {
        Self { effect }
    }
}

impl HidCommand for SetRgbEffect {
    const CMD: u8 = cmd::SET_RGB_EFFECT;

    fn to_data(&self) -> Vec<u8> {
        vec![self.effect]
    }
}

/// SET_RGB_EFFECT response: the effect now active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbEffectResponse {
    pub effect: u8,
}

impl HidResponse for RgbEffectResponse {
    const CMD_ECHO: u8 = cmd::SET_RGB_EFFECT;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self { effect: data[1] })
    }
}

/// Hue/saturation/value triple as laid out on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct HsvData {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// SET_RGB_COLOR (0x04) — 3-byte payload `[h, s, v]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRgbColor {
    pub hsv: HsvData,
}

impl SetRgbColor {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self {
            hsv: HsvData { h, s, v },
        }
    }
}

impl HidCommand for SetRgbColor {
    const CMD: u8 = cmd::SET_RGB_COLOR;

    fn to_data(&self) -> Vec<u8> {
        self.hsv.as_bytes().to_vec()
    }
}

/// SET_RGB_COLOR response: the color the firmware applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColorResponse {
    pub hsv: HsvData,
}

impl HidResponse for RgbColorResponse {
    const CMD_ECHO: u8 = cmd::SET_RGB_COLOR;
    const MIN_LEN: usize = 4;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        let (hsv, _) = HsvData::read_from_prefix(&data[1..]).map_err(|_| ParseError::TooShort {
            expected: Self::MIN_LEN,
            got: data.len(),
        })?;
        Ok(Self { hsv })
    }
}

/// SET_ANIMATION_SPEED (0x05)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetAnimationSpeed {
    pub speed: u8,
}

impl SetAnimationSpeed {
    pub fn new(speed: u8) -> Self {
        Self { speed }
    }
}

impl HidCommand for SetAnimationSpeed {
    const CMD: u8 = cmd::SET_ANIMATION_SPEED;

    fn to_data(&self) -> Vec<u8> {
        vec![self.speed]
    }
}

/// SET_ANIMATION_SPEED response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpeedResponse {
    /// Speed in host terms (0 = slowest), inverted back from the firmware value
    pub speed: u8,
}

impl HidResponse for AnimationSpeedResponse {
    const CMD_ECHO: u8 = cmd::SET_ANIMATION_SPEED;
    const MIN_LEN: usize = 2;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            speed: invert_speed(data[1]),
        })
    }
}

/// SET_DIRECTION (0x06) — steps the current animation forward or backward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetDirection {
    pub reverse: bool,
}

impl SetDirection {
    pub fn new(reverse: bool) -> Self {
        Self { reverse }
    }
}

impl HidCommand for SetDirection {
    const CMD: u8 = cmd::SET_DIRECTION;

    fn to_data(&self) -> Vec<u8> {
        vec![u8::from(self.reverse)]
    }
}

// =============================================================================
// Queries
// =============================================================================

/// GET_VERSION (0x0E)
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryVersion;

impl HidCommand for QueryVersion {
    const CMD: u8 = cmd::GET_VERSION;

    fn to_data(&self) -> Vec<u8> {
        vec![]
    }
}

/// GET_VERSION response — `[0x0E, major, minor, patch]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VersionResponse {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl HidResponse for VersionResponse {
    const CMD_ECHO: u8 = cmd::GET_VERSION;
    const MIN_LEN: usize = 4;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        Self::read_from_prefix(&data[1..])
            .map(|(resp, _)| resp)
            .map_err(|_| ParseError::TooShort {
                expected: Self::MIN_LEN,
                got: data.len(),
            })
    }
}

/// GET_STATE (0x0F)
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryState;

impl HidCommand for QueryState {
    const CMD: u8 = cmd::GET_STATE;

    fn to_data(&self) -> Vec<u8> {
        vec![]
    }
}

/// GET_STATE payload as laid out by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
struct StateData {
    mode: u8,
    hue: u8,
    sat: u8,
    val: u8,
    speed_inv: u8,
    skadis: u8,
    white: u8,
}

/// GET_STATE response — `[0x0F, mode, h, s, v, speed, skadis, white]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateResponse {
    pub effect: u8,
    pub hsv: HsvData,
    /// Speed in host terms (0 = slowest)
    pub speed: u8,
    pub skadis: bool,
    pub white: bool,
}

impl HidResponse for StateResponse {
    const CMD_ECHO: u8 = cmd::GET_STATE;
    const MIN_LEN: usize = 8;

    fn from_data(data: &[u8]) -> Result<Self, ParseError> {
        let (raw, _) = StateData::read_from_prefix(&data[1..]).map_err(|_| ParseError::TooShort {
            expected: Self::MIN_LEN,
            got: data.len(),
        })?;
        Ok(Self {
            effect: raw.mode,
            hsv: HsvData {
                h: raw.hue,
                s: raw.sat,
                v: raw.val,
            },
            speed: invert_speed(raw.speed_inv),
            skadis: raw.skadis != 0,
            white: raw.white != 0,
        })
    }
}

// =============================================================================
// Packet Dispatchers (monitoring)
// =============================================================================

/// Decoded outbound command (command byte first, report ID stripped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    SetSkadisMode(SetSkadisMode),
    SetWhiteMode(SetWhiteMode),
    SetRgbEffect(SetRgbEffect),
    SetRgbColor(SetRgbColor),
    SetAnimationSpeed(SetAnimationSpeed),
    SetDirection(SetDirection),
    GetVersion,
    GetState,
    Unknown { cmd: u8, data: Vec<u8> },
}

/// Decoded inbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    SkadisMode(SkadisModeResponse),
    WhiteMode(WhiteModeResponse),
    RgbEffect(RgbEffectResponse),
    RgbColor(RgbColorResponse),
    AnimationSpeed(AnimationSpeedResponse),
    Direction { reverse: bool },
    Version(VersionResponse),
    State(StateResponse),
    /// Nothing read (timeout) or an all-zero buffer
    Empty,
    Unknown { cmd: u8, data: Vec<u8> },
}

/// Decode a command packet (without report ID)
pub fn try_parse_command(data: &[u8]) -> ParsedCommand {
    let Some((&cmd, args)) = data.split_first() else {
        return ParsedCommand::Unknown {
            cmd: 0,
            data: vec![],
        };
    };
    let arg = |i: usize| args.get(i).copied();

    match (cmd, arg(0)) {
        (cmd::SET_SKADIS_MODE, Some(a)) => ParsedCommand::SetSkadisMode(SetSkadisMode::new(a != 0)),
        (cmd::SET_WHITE_MODE, Some(a)) => ParsedCommand::SetWhiteMode(SetWhiteMode::new(a != 0)),
        (cmd::SET_RGB_EFFECT, Some(a)) => ParsedCommand::SetRgbEffect(SetRgbEffect::new(a)),
        (cmd::SET_ANIMATION_SPEED, Some(a)) => {
            ParsedCommand::SetAnimationSpeed(SetAnimationSpeed::new(a))
        }
        (cmd::SET_DIRECTION, Some(a)) => ParsedCommand::SetDirection(SetDirection::new(a != 0)),
        (cmd::SET_RGB_COLOR, _) if args.len() >= 3 => {
            ParsedCommand::SetRgbColor(SetRgbColor::new(args[0], args[1], args[2]))
        }
        (cmd::GET_VERSION, _) => ParsedCommand::GetVersion,
        (cmd::GET_STATE, _) => ParsedCommand::GetState,
        _ => ParsedCommand::Unknown {
            cmd,
            data: data.to_vec(),
        },
    }
}

/// Decode a response packet
pub fn try_parse_response(data: &[u8]) -> ParsedResponse {
    if data.is_empty() || data.iter().all(|&b| b == 0) {
        return ParsedResponse::Empty;
    }

    fn typed<R: HidResponse>(data: &[u8], wrap: fn(R) -> ParsedResponse) -> ParsedResponse {
        R::parse(data).map(wrap).unwrap_or_else(|_| ParsedResponse::Unknown {
            cmd: data[0],
            data: data.to_vec(),
        })
    }

    match data[0] {
        cmd::SET_SKADIS_MODE => typed(data, ParsedResponse::SkadisMode),
        cmd::SET_WHITE_MODE => typed(data, ParsedResponse::WhiteMode),
        cmd::SET_RGB_EFFECT => typed(data, ParsedResponse::RgbEffect),
        cmd::SET_RGB_COLOR => typed(data, ParsedResponse::RgbColor),
        cmd::SET_ANIMATION_SPEED => typed(data, ParsedResponse::AnimationSpeed),
        cmd::SET_DIRECTION if data.len() >= 2 => ParsedResponse::Direction {
            reverse: data[1] != 0,
        },
        cmd::GET_VERSION => typed(data, ParsedResponse::Version),
        cmd::GET_STATE => typed(data, ParsedResponse::State),
        other => ParsedResponse::Unknown {
            cmd: other,
            data: data.to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::REPORT_SIZE;

    #[test]
    fn test_set_rgb_color_build() {
        let buf = SetRgbColor::new(128, 255, 200).build().unwrap();
        assert_eq!(buf.len(), REPORT_SIZE);
        assert_eq!(&buf[..5], &[0x00, 0x04, 128, 255, 200]);
        assert!(buf[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_bool_commands_encode_zero_or_one() {
        assert_eq!(SetSkadisMode::new(true).to_data(), vec![1]);
        assert_eq!(SetSkadisMode::new(false).to_data(), vec![0]);
        assert_eq!(SetWhiteMode::new(true).to_data(), vec![1]);
        assert_eq!(SetDirection::new(false).to_data(), vec![0]);
    }

    #[test]
    fn test_query_commands_have_no_args() {
        let buf = QueryState.build().unwrap();
        assert_eq!(buf[1], cmd::GET_STATE);
        assert!(buf[2..].iter().all(|&b| b == 0));
        assert!(QueryVersion.to_data().is_empty());
    }

    #[test]
    fn test_state_response_parse() {
        // Firmware speed 55 means host speed 200
        let mut data = [0u8; 32];
        data[..8].copy_from_slice(&[0x0F, 3, 190, 255, 200, 55, 1, 0]);

        let resp = StateResponse::parse(&data).unwrap();
        assert_eq!(resp.effect, 3);
        assert_eq!(resp.hsv, HsvData { h: 190, s: 255, v: 200 });
        assert_eq!(resp.speed, 200);
        assert!(resp.skadis);
        assert!(!resp.white);
    }

    #[test]
    fn test_state_response_too_short() {
        let err = StateResponse::parse(&[0x0F, 1, 2]).unwrap_err();
        assert_eq!(err, ParseError::TooShort { expected: 8, got: 3 });
    }

    #[test]
    fn test_version_response_parse() {
        let resp = VersionResponse::parse(&[0x0E, 1, 4, 2, 0, 0]).unwrap();
        assert_eq!((resp.major, resp.minor, resp.patch), (1, 4, 2));
    }

    #[test]
    fn test_response_command_mismatch() {
        let err = VersionResponse::parse(&[0x0F, 1, 4, 2]).unwrap_err();
        assert_eq!(
            err,
            ParseError::CommandMismatch {
                expected: 0x0E,
                got: 0x0F
            }
        );
    }

    #[test]
    fn test_speed_response_inverts() {
        let resp = AnimationSpeedResponse::parse(&[0x05, 0]).unwrap();
        assert_eq!(resp.speed, 255);
    }

    #[test]
    fn test_try_parse_command() {
        assert_eq!(
            try_parse_command(&[0x04, 1, 2, 3]),
            ParsedCommand::SetRgbColor(SetRgbColor::new(1, 2, 3))
        );
        assert_eq!(
            try_parse_command(&[0x01, 1]),
            ParsedCommand::SetSkadisMode(SetSkadisMode::new(true))
        );
        assert_eq!(try_parse_command(&[0x0F]), ParsedCommand::GetState);
        assert!(matches!(
            try_parse_command(&[0x04, 1]),
            ParsedCommand::Unknown { cmd: 0x04, .. }
        ));
        assert!(matches!(
            try_parse_command(&[0x77, 9]),
            ParsedCommand::Unknown { cmd: 0x77, .. }
        ));
    }

    #[test]
    fn test_try_parse_response() {
        assert_eq!(try_parse_response(&[]), ParsedResponse::Empty);
        assert_eq!(try_parse_response(&[0u8; 32]), ParsedResponse::Empty);
        assert_eq!(
            try_parse_response(&[0x03, 7]),
            ParsedResponse::RgbEffect(RgbEffectResponse { effect: 7 })
        );
        assert_eq!(
            try_parse_response(&[0x06, 1]),
            ParsedResponse::Direction { reverse: true }
        );
        assert!(matches!(
            try_parse_response(&[0x0F, 1]),
            ParsedResponse::Unknown { cmd: 0x0F, .. }
        ));
    }
}
