//! Star color values and presets.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a `#rrggbb` color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3 or 6 hex digits, got {0:?}")]
    InvalidLength(String),
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

/// An opaque RGB color used for every star of a field.
///
/// Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl StarColor {
    /// Default star teal.
    pub const TEAL: StarColor = StarColor::rgb(0x00, 0xe4, 0xdd);
    pub const BLACK: StarColor = StarColor::rgb(0x00, 0x00, 0x00);
    pub const WHITE: StarColor = StarColor::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let digits = input.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(input.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidDigit(input.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorParseError::InvalidLength(input.to_string())),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Mix this color over `background` with the given coverage.
    ///
    /// `alpha` is clamped to `0.0..=1.0`; `0.0` yields the background and
    /// `1.0` yields this color unchanged.
    pub fn blend(self, background: StarColor, alpha: f64) -> StarColor {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        let mix = |fg: u8, bg: u8| {
            (bg as f64 + (fg as f64 - bg as f64) * alpha).round().clamp(0.0, 255.0) as u8
        };
        StarColor::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// Convert to a terminal color.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Default for StarColor {
    fn default() -> Self {
        Self::TEAL
    }
}

impl fmt::Display for StarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for StarColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for StarColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<StarColor> for String {
    fn from(color: StarColor) -> Self {
        color.to_hex()
    }
}

/// Star color presets that can be cycled at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPreset {
    #[default]
    Teal,
    DeepTeal,
    Mint,
    Ice,
    Amber,
    White,
}

impl ColorPreset {
    /// Get the star color for this preset.
    pub fn color(&self) -> StarColor {
        match self {
            ColorPreset::Teal => StarColor::TEAL,
            ColorPreset::DeepTeal => StarColor::rgb(0x0d, 0x94, 0x88),
            ColorPreset::Mint => StarColor::rgb(0x81, 0xda, 0xca),
            ColorPreset::Ice => StarColor::rgb(0xa5, 0xd8, 0xff),
            ColorPreset::Amber => StarColor::rgb(0xff, 0xbf, 0x47),
            ColorPreset::White => StarColor::WHITE,
        }
    }

    /// Cycle to the next preset.
    pub fn next(&self) -> Self {
        match self {
            ColorPreset::Teal => ColorPreset::DeepTeal,
            ColorPreset::DeepTeal => ColorPreset::Mint,
            ColorPreset::Mint => ColorPreset::Ice,
            ColorPreset::Ice => ColorPreset::Amber,
            ColorPreset::Amber => ColorPreset::White,
            ColorPreset::White => ColorPreset::Teal,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            ColorPreset::Teal => "teal",
            ColorPreset::DeepTeal => "deep teal",
            ColorPreset::Mint => "mint",
            ColorPreset::Ice => "ice",
            ColorPreset::Amber => "amber",
            ColorPreset::White => "white",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(StarColor::parse_hex("#00e4dd"), Ok(StarColor::TEAL));
        assert_eq!(StarColor::parse_hex("00E4DD"), Ok(StarColor::TEAL));
        assert_eq!(StarColor::parse_hex("#fff"), Ok(StarColor::WHITE));
        assert!(matches!(
            StarColor::parse_hex("#12345"),
            Err(ColorParseError::InvalidLength(_))
        ));
        assert!(matches!(
            StarColor::parse_hex("#gg0000"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        // multi-byte input must not panic on slicing
        assert!(StarColor::parse_hex("#ééé").is_err());
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(StarColor::TEAL.to_string(), "#00e4dd");
        assert_eq!("#0d9488".parse::<StarColor>().unwrap().to_hex(), "#0d9488");
    }

    #[test]
    fn test_blend() {
        let c = StarColor::rgb(200, 100, 0);
        assert_eq!(c.blend(StarColor::BLACK, 1.0), c);
        assert_eq!(c.blend(StarColor::BLACK, 0.0), StarColor::BLACK);
        assert_eq!(c.blend(StarColor::BLACK, 0.5), StarColor::rgb(100, 50, 0));
        assert_eq!(c.blend(StarColor::BLACK, 7.0), c);
        assert_eq!(c.blend(StarColor::WHITE, f64::NAN), StarColor::WHITE);
    }

    #[test]
    fn test_preset_cycle() {
        let mut preset = ColorPreset::default();
        for _ in 0..6 {
            preset = preset.next();
        }
        assert_eq!(preset, ColorPreset::Teal);
        assert_eq!(ColorPreset::Teal.color(), StarColor::TEAL);
    }
}
