//! Colour transforms: brightening and two-stop gradient derivation.
//!
//! The output of a transform is an [`Accent`], the value that ends up
//! written into the stylesheet.

use std::fmt;

use tracing::debug;

use crate::color::{Colour, Opacity, checked_rgb};
use crate::config::EngineConfig;
use crate::error::ColourError;
use crate::payload::ChannelMode;

/// The CSS value derived for the selected conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    /// A single hex colour, possibly with an alpha suffix.
    Solid(Colour),
    /// A vertical gradient from `top` (0%) to `bottom` (100%).
    Gradient { top: Colour, bottom: Colour },
}

impl Accent {
    /// Renders the CSS value text.
    pub fn css(&self) -> String {
        match self {
            Self::Solid(colour) => colour.to_hex(),
            Self::Gradient { top, bottom } => {
                format!("linear-gradient(to bottom, {top} 0%, {bottom} 100%)")
            }
        }
    }

    /// Renders the CSS value text for a property with the given channel mode.
    ///
    /// [`ChannelMode::Rgb`] strips the alpha suffix from solid colours.
    pub fn css_for(&self, mode: ChannelMode) -> String {
        match (self, mode) {
            (Self::Solid(colour), ChannelMode::Rgb) => colour.opaque().to_hex(),
            _ => self.css(),
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

impl From<Colour> for Accent {
    fn from(colour: Colour) -> Self {
        Self::Solid(colour)
    }
}

/// Adds `magnitude` to each channel, clamping to `0..=255`. Alpha is dropped.
pub fn brighten(colour: Colour, magnitude: i32) -> Colour {
    let shift = |c: u8| i32::from(c).saturating_add(magnitude).clamp(0, 255) as u8;
    Colour::rgb(shift(colour.r), shift(colour.g), shift(colour.b))
}

/// Derives a gradient whose bottom stop is each channel of `top` divided
/// (floored) by `ratio`.
///
/// # Errors
/// Returns [`ColourError::InvalidComponent`] when the division leaves the
/// byte range, which happens for ratios below 1 on bright colours and for
/// non-positive ratios.
pub fn gradient_from(top: Colour, ratio: f64) -> Result<Accent, ColourError> {
    let top = top.opaque();
    let scale = |c: u8| (f64::from(c) / ratio).floor() as i64;
    let bottom = checked_rgb(scale(top.r), scale(top.g), scale(top.b))?;
    Ok(Accent::Gradient { top, bottom })
}

/// Brightens a colour, applies the configured alpha and optionally turns the
/// result into a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourTransformer {
    magnitude: i32,
    opacity: Opacity,
    gradient_ratio: Option<f64>,
}

impl ColourTransformer {
    /// `gradient_ratio` of `None` disables gradient output.
    pub const fn new(magnitude: i32, opacity: Opacity, gradient_ratio: Option<f64>) -> Self {
        Self {
            magnitude,
            opacity,
            gradient_ratio,
        }
    }

    /// Builds the transformer from config. An invalid opacity is logged and
    /// clamped rather than rejected.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.brightening,
            Opacity::lenient(config.opacity),
            config.gradient.then_some(config.gradient_ratio),
        )
    }

    pub const fn magnitude(&self) -> i32 {
        self.magnitude
    }

    pub const fn opacity(&self) -> Opacity {
        self.opacity
    }

    /// Brightens the leading `#RRGGBB` of `hex` (ignoring any alpha) and
    /// appends the configured alpha suffix.
    ///
    /// # Errors
    /// Returns [`ColourError::InvalidHex`] if `hex` does not start with six
    /// hex digits.
    pub fn brighten_hex(&self, hex: &str) -> Result<String, ColourError> {
        let colour = Colour::parse_leading_rgb(hex)?;
        Ok(self.brighten(colour).to_hex())
    }

    /// Brightens `colour` and attaches the configured alpha.
    pub fn brighten(&self, colour: Colour) -> Colour {
        brighten(colour, self.magnitude).with_alpha(self.opacity.alpha())
    }

    /// Full transform: brighten, then derive a gradient when enabled.
    ///
    /// # Errors
    /// Propagates [`ColourError`] from gradient derivation.
    pub fn derive(&self, colour: Colour) -> Result<Accent, ColourError> {
        let brightened = self.brighten(colour);
        let accent = match self.gradient_ratio {
            Some(ratio) => gradient_from(brightened, ratio)?,
            None => Accent::Solid(brightened),
        };
        debug!(
            transform.input = %colour,
            transform.output = %accent,
            "Derived accent colour"
        );
        Ok(accent)
    }
}

impl Default for ColourTransformer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
