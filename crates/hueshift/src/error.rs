//! Error taxonomy for the recolouring engine.
//!
//! Only [`ColourError`] and [`SurfaceError`] abort an interaction (wrapped in
//! [`EngineError`]). Configuration problems and missing payloads are logged
//! and the engine carries on with whatever it could resolve.

use thiserror::Error;

/// Error produced while encoding or parsing a colour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColourError {
    /// A channel value does not fit in a byte.
    #[error("Invalid colour component: {channel} = {value}")]
    InvalidComponent {
        /// Channel name (`r`, `g` or `b`).
        channel: &'static str,
        /// Offending value.
        value: i64,
    },
    /// A string is not a valid hex colour.
    #[error("Invalid hex colour '{0}'")]
    InvalidHex(String),
}

/// Error validating or loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid opacity value {0} (expected 0.0..=1.0)")]
    OpacityOutOfRange(f64),
    #[error("Invalid gradient ratio {0} (expected > 0)")]
    InvalidGradientRatio(f64),
    #[error("Invalid custom property name '{0}' (expected a leading --)")]
    InvalidPropertyName(String),
    #[error("Colour selection strategy is empty")]
    EmptyStrategy,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Error reading pixels from an avatar surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The conversation element has no avatar image.
    #[error("Conversation has no avatar surface")]
    MissingAvatar,
    /// A 2D pixel-readable context could not be obtained.
    #[error("Pixel surface unavailable: {0}")]
    Unavailable(String),
    /// Reading the pixel data failed.
    #[error("Failed to read pixels: {0}")]
    Read(String),
}

/// Non-fatal patching failure, reported through [`PatchReport`](crate::patch::PatchReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Can't find payload for {0}")]
    PayloadNotFound(String),
}

/// Failure of a single selection + patch interaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Colour(#[from] ColourError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result alias for one engine interaction.
pub type Result<T> = std::result::Result<T, EngineError>;
