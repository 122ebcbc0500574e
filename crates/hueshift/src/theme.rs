//! Light/dark classification of the host page.
//!
//! The theme is derived once at start-up from a single computed custom
//! property and only decides which default and override colours apply.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Colour;

/// Host UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Classifies a computed style value: it is dark exactly when it equals
    /// `dark_marker` (trimmed, ASCII case-insensitive).
    pub fn classify(computed: &str, dark_marker: &str) -> Self {
        let theme = if computed.trim().eq_ignore_ascii_case(dark_marker.trim()) {
            Self::Dark
        } else {
            Self::Light
        };
        debug!(theme.computed = computed, theme.detected = %theme, "Theme classified");
        theme
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// A colour with separate light and dark variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemedColour {
    pub light: Colour,
    pub dark: Colour,
}

impl ThemedColour {
    pub const fn new(light: Colour, dark: Colour) -> Self {
        Self { light, dark }
    }

    /// The same colour in both themes.
    pub const fn uniform(colour: Colour) -> Self {
        Self::new(colour, colour)
    }

    pub const fn pick(&self, theme: Theme) -> Colour {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}
