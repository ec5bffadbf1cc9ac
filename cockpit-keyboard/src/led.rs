//! RGB lighting types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default animation speed used by the front ends
pub const SPEED_DEFAULT: u8 = 128;

/// RGB effect built into the firmware, by rgblight mode index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RgbEffect {
    Static = 0,
    Breathing = 1,
    RainbowMood = 2,
    RainbowSwirl = 3,
    Snake = 4,
    Knight = 5,
    Christmas = 6,
    StaticGradient = 7,
    RgbTest = 8,
    Alternating = 9,
    Twinkle = 10,
}

impl RgbEffect {
    pub const ALL: [RgbEffect; 11] = [
        Self::Static,
        Self::Breathing,
        Self::RainbowMood,
        Self::RainbowSwirl,
        Self::Snake,
        Self::Knight,
        Self::Christmas,
        Self::StaticGradient,
        Self::RgbTest,
        Self::Alternating,
        Self::Twinkle,
    ];

    /// Get effect from numeric value
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the display name for this effect
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Breathing => "Breathing",
            Self::RainbowMood => "Rainbow Mood",
            Self::RainbowSwirl => "Rainbow Swirl",
            Self::Snake => "Snake",
            Self::Knight => "Knight",
            Self::Christmas => "Christmas",
            Self::StaticGradient => "Static Gradient",
            Self::RgbTest => "RGB Test",
            Self::Alternating => "Alternating",
            Self::Twinkle => "Twinkle",
        }
    }

    /// Next effect, wrapping after the last one
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// Previous effect, wrapping before the first one
    pub fn prev(self) -> Self {
        Self::ALL[(self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RgbEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RgbEffect {
    type Err = String;

    /// Accepts an index ("3") or a name in any case, with spaces, dashes
    /// or underscores ("rainbow-swirl", "Rainbow Swirl")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::from_u8(n)
                .ok_or_else(|| format!("Effect index {n} out of range (0-{})", Self::ALL.len() - 1));
        }
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|e| {
                e.name()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(key.chars())
            })
            .ok_or_else(|| format!("Unknown effect '{s}'"))
    }
}

/// Color in the firmware's 8-bit HSV space (each channel 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Full-saturation, full-value red; the front ends' starting color
    pub const DEFAULT: Self = Self { h: 0, s: 255, v: 255 };

    /// Convert to 8-bit RGB for on-screen previews
    pub fn to_rgb(self) -> (u8, u8, u8) {
        if self.s == 0 {
            return (self.v, self.v, self.v);
        }
        let h = self.h as f32 / 256.0 * 6.0;
        let s = self.s as f32 / 255.0;
        let v = self.v as f32 / 255.0;

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as i32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        (
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

impl Default for Hsv {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSV({}, {}, {})", self.h, self.s, self.v)
    }
}

impl FromStr for Hsv {
    type Err = String;

    /// Parse "h,s,v" with each component 0-255
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [h, sat, v] = parts.as_slice() else {
            return Err(format!("Expected h,s,v but got '{s}'"));
        };
        let channel = |name: &str, value: &str| {
            value
                .parse::<u8>()
                .map_err(|_| format!("{name} must be 0-255, got '{value}'"))
        };
        Ok(Self {
            h: channel("hue", *h)?,
            s: channel("saturation", *sat)?,
            v: channel("value", *v)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_color_is_red() {
        assert_eq!(Hsv::default(), Hsv::DEFAULT);
        assert_eq!(Hsv::default().to_rgb(), (255, 0, 0));
    }

    #[test]
    fn test_effect_indices_match_firmware() {
        assert_eq!(RgbEffect::Static.as_u8(), 0);
        assert_eq!(RgbEffect::Twinkle.as_u8(), 10);
        for (i, e) in RgbEffect::ALL.iter().enumerate() {
            assert_eq!(e.as_u8() as usize, i);
            assert_eq!(RgbEffect::from_u8(i as u8), Some(*e));
        }
        assert_eq!(RgbEffect::from_u8(11), None);
    }

    #[test]
    fn test_effect_parse() {
        assert_eq!("3".parse::<RgbEffect>().unwrap(), RgbEffect::RainbowSwirl);
        assert_eq!("breathing".parse::<RgbEffect>().unwrap(), RgbEffect::Breathing);
        assert_eq!("Rainbow Mood".parse::<RgbEffect>().unwrap(), RgbEffect::RainbowMood);
        assert_eq!("static-gradient".parse::<RgbEffect>().unwrap(), RgbEffect::StaticGradient);
        assert_eq!("RGB_TEST".parse::<RgbEffect>().unwrap(), RgbEffect::RgbTest);
        assert!("11".parse::<RgbEffect>().is_err());
        assert!("disco".parse::<RgbEffect>().is_err());
    }

    #[test]
    fn test_effect_cycle_wraps() {
        assert_eq!(RgbEffect::Twinkle.next(), RgbEffect::Static);
        assert_eq!(RgbEffect::Static.prev(), RgbEffect::Twinkle);
        assert_eq!(RgbEffect::Snake.next(), RgbEffect::Knight);
    }

    #[test]
    fn test_hsv_parse() {
        assert_eq!("128,255,200".parse::<Hsv>().unwrap(), Hsv::new(128, 255, 200));
        assert_eq!(" 0, 0 ,255 ".parse::<Hsv>().unwrap(), Hsv::new(0, 0, 255));
        assert!("256,0,0".parse::<Hsv>().is_err());
        assert!("1,2".parse::<Hsv>().is_err());
        assert!("1,2,3,4".parse::<Hsv>().is_err());
        assert!("a,b,c".parse::<Hsv>().is_err());
    }

    #[test]
    fn test_hsv_to_rgb() {
        assert_eq!(Hsv::new(0, 255, 255).to_rgb(), (255, 0, 0));
        assert_eq!(Hsv::new(0, 0, 200).to_rgb(), (200, 200, 200));
        assert_eq!(Hsv::new(0, 255, 0).to_rgb(), (0, 0, 0));
    }
}
