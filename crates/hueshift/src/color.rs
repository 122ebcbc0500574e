//! Hex/RGB colour codec.
//!
//! This module provides the value types the rest of the engine passes around:
//! - [`Colour`] - 8-bit RGB triple with an optional 8-bit alpha
//! - [`Opacity`] - validated opacity fraction rendered as an alpha suffix
//!
//! and the free-standing codec functions [`hex_to_rgb`], [`rgb_to_hex`] and
//! [`opacity_to_hex`].
//!
//! # Example
//!
//! ```rust
//! use hueshift::color::{Colour, hex_to_rgb, rgb_to_hex};
//!
//! let red = hex_to_rgb("#f00").unwrap();
//! assert_eq!(red, Colour::rgb(255, 0, 0));
//! assert_eq!(rgb_to_hex(255, 0, 0).unwrap(), "#ff0000");
//!
//! let translucent = Colour::parse("#7cacf8d6").unwrap();
//! assert_eq!(translucent.a, Some(0xd6));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;

use crate::error::{ColourError, ConfigError};

/// An RGB colour with an optional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

impl Colour {
    /// Creates an opaque colour with no alpha suffix.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    /// Creates a colour that carries an alpha suffix.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Unpacks a `0xRRGGBB` value. Bits above the low 24 are ignored.
    pub const fn from_packed(packed: u32) -> Self {
        Self::rgb(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        )
    }

    /// Packs the RGB channels into `0xRRGGBB`.
    pub const fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Drops the alpha channel.
    pub const fn opaque(self) -> Self {
        Self { a: None, ..self }
    }

    /// Replaces the alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a: Some(a), ..self }
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA`, case-insensitive, with the
    /// leading `#` optional.
    ///
    /// # Errors
    /// Returns [`ColourError::InvalidHex`] for any other shape.
    pub fn parse(s: &str) -> Result<Self, ColourError> {
        let raw = s.trim();
        let hex = raw.strip_prefix('#').unwrap_or(raw);
        let invalid = || ColourError::InvalidHex(raw.to_string());

        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|n| n * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Parses only the leading `#RRGGBB` of a string, ignoring whatever
    /// follows (typically an alpha suffix).
    ///
    /// # Errors
    /// Returns [`ColourError::InvalidHex`] if fewer than six hex digits lead
    /// the string.
    pub fn parse_leading_rgb(s: &str) -> Result<Self, ColourError> {
        let raw = s.trim();
        let hex = raw.strip_prefix('#').unwrap_or(raw);
        match hex.get(..6) {
            Some(head) => Self::parse(head),
            None => Err(ColourError::InvalidHex(raw.to_string())),
        }
    }

    /// Renders `#rrggbb` or `#rrggbbaa` in lowercase.
    pub fn to_hex(&self) -> String {
        match self.a {
            Some(a) => format!("#{:06x}{a:02x}", self.packed()),
            None => format!("#{:06x}", self.packed()),
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ColourVisitor)
    }
}

struct ColourVisitor;

impl Visitor<'_> for ColourVisitor {
    type Value = Colour;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a #RGB, #RRGGBB or #RRGGBBAA hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Colour::parse(v).map_err(E::custom)
    }
}

/// Parses `#RGB` or `#RRGGBB` (leading `#` optional). Alpha is not accepted.
pub fn hex_to_rgb(hex: &str) -> Option<Colour> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    match digits.len() {
        3 | 6 => Colour::parse(digits).ok(),
        _ => None,
    }
}

/// Encodes three channels as `#rrggbb`.
///
/// # Errors
/// Returns [`ColourError::InvalidComponent`] for the first channel outside
/// `0..=255`.
pub fn rgb_to_hex(r: i64, g: i64, b: i64) -> Result<String, ColourError> {
    Ok(checked_rgb(r, g, b)?.to_hex())
}

/// Builds a [`Colour`] from wide channel values, rejecting out-of-range ones.
///
/// # Errors
/// Returns [`ColourError::InvalidComponent`] for the first channel outside
/// `0..=255`.
pub fn checked_rgb(r: i64, g: i64, b: i64) -> Result<Colour, ColourError> {
    let channel = |name: &'static str, value: i64| {
        u8::try_from(value).map_err(|_| ColourError::InvalidComponent {
            channel: name,
            value,
        })
    };
    Ok(Colour::rgb(channel("r", r)?, channel("g", g)?, channel("b", b)?))
}

/// Renders an opacity fraction as a two-digit lowercase alpha suffix.
///
/// Out-of-range input is logged and clamped; it never fails.
pub fn opacity_to_hex(unit: f64) -> String {
    if !(0.0..=1.0).contains(&unit) {
        error!(opacity = unit, "Invalid opacity value");
    }
    format!("{:02x}", unit_to_byte(unit))
}

fn unit_to_byte(unit: f64) -> u8 {
    // NaN saturates to 0 under `as`.
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A validated opacity fraction in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f64);

impl Opacity {
    /// Fully opaque.
    pub const OPAQUE: Self = Self(1.0);

    /// # Errors
    /// Returns [`ConfigError::OpacityOutOfRange`] outside `0.0..=1.0`.
    pub fn new(unit: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&unit) {
            Ok(Self(unit))
        } else {
            Err(ConfigError::OpacityOutOfRange(unit))
        }
    }

    /// Accepts any value, logging (not failing) when it is out of range.
    pub fn lenient(unit: f64) -> Self {
        Self::new(unit).unwrap_or_else(|err| {
            error!(opacity = unit, error = %err, "Invalid opacity value");
            Self(unit.clamp(0.0, 1.0))
        })
    }

    pub const fn value(&self) -> f64 {
        self.0
    }

    /// The alpha byte, `round(value * 255)`.
    pub fn alpha(&self) -> u8 {
        unit_to_byte(self.0)
    }

    /// Two-digit lowercase alpha suffix.
    pub fn hex(&self) -> String {
        format!("{:02x}", self.alpha())
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}
