#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics and colour arithmetic
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]

//! # Hueshift
//!
//! Recolours a messaging web client to match the avatar of the selected
//! conversation.
//!
//! The engine is split into small pieces that each do one thing:
//! - **Codec** ([`color`]): hex/RGB conversion and opacity suffixes
//! - **Extraction** ([`extract`]): the dominant opaque colour of an RGBA buffer
//! - **Transform** ([`transform`]): brightening and gradient derivation
//! - **Patching** ([`patch`]): exact-literal rewrites of custom properties
//!   inside live style containers
//! - **Selection** ([`policy`]): named strategies that compose the above
//!
//! [`engine::Recolourer`] ties them together for one page. The host supplies
//! the page through two traits: [`patch::StyleSource`] for the style
//! containers and [`surface::AvatarSource`] for the selected conversation.
//!
//! ## Quick Start
//!
//! ```rust
//! use hueshift::{EngineConfig, Recolourer, Theme};
//! use hueshift::memory::{MemoryDocument, MemoryStyle};
//! use hueshift::surface::RgbaBuffer;
//!
//! let page = MemoryDocument::new([":root{--xms-outgoing-bg-color:#ecf3fe;}"]);
//! let avatar = RgbaBuffer::filled(8, 8, [0x20, 0x40, 0x60, 255]);
//!
//! let mut engine: Recolourer<MemoryStyle> = Recolourer::new(EngineConfig::default(), Theme::Light);
//! engine.apply(&page, &avatar).unwrap();
//!
//! assert_eq!(page.text(0), ":root{--xms-outgoing-bg-color:#84a4c440;}");
//! ```

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod memory;
pub mod patch;
pub mod payload;
pub mod policy;
pub mod ready;
pub mod surface;
pub mod theme;
pub mod transform;

// Re-exports
pub use color::{Colour, Opacity, hex_to_rgb, opacity_to_hex, rgb_to_hex};
pub use config::EngineConfig;
pub use engine::Recolourer;
pub use error::{ColourError, ConfigError, EngineError, PatchError, SurfaceError};
pub use extract::{Dominant, dominant_colour};
pub use patch::{PatchMode, PatchReport, StyleContainer, StyleSource, StylesheetPatcher, TrustedCss};
pub use payload::{ChannelMode, PropertyPayload};
pub use policy::{ColourSelectionPolicy, SelectionStrategy};
pub use surface::{AvatarSource, PixelSurface, RgbaBuffer};
pub use theme::{Theme, ThemedColour};
pub use transform::{Accent, ColourTransformer, brighten, gradient_from};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::color::Colour;
    pub use crate::config::EngineConfig;
    pub use crate::engine::Recolourer;
    pub use crate::patch::{StyleContainer, StyleSource, TrustedCss};
    pub use crate::surface::{AvatarSource, PixelSurface};
    pub use crate::theme::Theme;
    pub use crate::transform::Accent;
}
