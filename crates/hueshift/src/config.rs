//! Engine configuration.
//!
//! [`EngineConfig::default`] carries the compiled-in constants the engine
//! ships with. Hosts may override any subset from JSON or TOML; missing
//! fields keep their defaults.
//!
//! # Example
//!
//! ```rust
//! use hueshift::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml("brightening = 60\ngradient = true").unwrap();
//! assert_eq!(config.brightening, 60);
//! assert!(config.gradient);
//! assert_eq!(config.strategy, "from-avatar");
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{Colour, Opacity};
use crate::error::ConfigError;
use crate::patch::PatchMode;
use crate::payload::ChannelMode;
use crate::theme::ThemedColour;

/// Strategy name for sampling the conversation avatar.
pub const FROM_AVATAR: &str = "from-avatar";

/// All tunables of the engine and its DOM glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Signed amount added to every channel of the dominant colour.
    pub brightening: i32,
    /// Divisor for the bottom stop of the gradient.
    pub gradient_ratio: f64,
    /// Emit a gradient instead of a solid colour.
    pub gradient: bool,
    /// Opacity fraction rendered as the alpha suffix, `0.0..=1.0`.
    pub opacity: f64,
    /// Name of the colour selection strategy.
    pub strategy: String,
    pub patch_mode: PatchMode,
    /// `tracing` filter directive used by hosts that install a subscriber.
    pub log_filter: String,
    pub selectors: Selectors,
    pub theme_probe: ThemeProbe,
    /// Colour used when no strategy can produce one.
    pub fallback: ThemedColour,
    pub properties: Vec<PropertyConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brightening: 100,
            gradient_ratio: 1.2,
            gradient: false,
            opacity: 0.25,
            strategy: FROM_AVATAR.to_string(),
            patch_mode: PatchMode::Multi,
            log_filter: "info".to_string(),
            selectors: Selectors::default(),
            theme_probe: ThemeProbe::default(),
            fallback: ThemedColour::new(
                Colour::rgb(0xec, 0xf3, 0xfe),
                Colour::rgb(0x7c, 0xac, 0xf8),
            ),
            properties: default_properties(),
        }
    }
}

impl EngineConfig {
    /// Parses a (partial) config from JSON. The result is not validated.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` if parsing fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a (partial) config from TOML. The result is not validated.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` if parsing fails.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Opacity::new(self.opacity)?;
        if !(self.gradient_ratio.is_finite() && self.gradient_ratio > 0.0) {
            return Err(ConfigError::InvalidGradientRatio(self.gradient_ratio));
        }
        if self.strategy.trim().is_empty() {
            return Err(ConfigError::EmptyStrategy);
        }
        if let Some(bad) = self.properties.iter().find(|p| !p.name.starts_with("--")) {
            return Err(ConfigError::InvalidPropertyName(bad.name.clone()));
        }
        Ok(())
    }
}

/// DOM selectors the browser glue relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// One conversation row.
    pub list_item: String,
    /// Message content; its appearance gates start-up.
    pub message_content: String,
    /// Tag name of the style containers.
    pub style_tag: String,
    /// Avatar drawing surface inside a conversation row.
    pub avatar: String,
    /// Class name of the selected row's first child.
    pub selected_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            list_item: "mws-conversation-list-item".to_string(),
            message_content: "mws-message-part-content".to_string(),
            style_tag: "style".to_string(),
            avatar: "canvas".to_string(),
            selected_class: "list-item selected".to_string(),
        }
    }
}

/// Where to read the computed value that decides the theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeProbe {
    pub selector: String,
    pub property: String,
    /// Computed value that means the page is dark.
    pub dark_marker: String,
}

impl Default for ThemeProbe {
    fn default() -> Self {
        Self {
            selector: "mw-conversation-container".to_string(),
            property: "--conv-container-host-bg-color".to_string(),
            dark_marker: "#202124".to_string(),
        }
    }
}

/// One custom property to keep in sync with the accent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// Custom property name, including the leading `--`.
    pub name: String,
    /// Value the page ships with.
    pub default: ThemedColour,
    /// Value to write instead of the accent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<ThemedColour>,
    /// Channels taken from the accent. Inferred from the name when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelMode>,
}

fn default_properties() -> Vec<PropertyConfig> {
    vec![
        PropertyConfig {
            name: "--xms-outgoing-bg-color".to_string(),
            default: ThemedColour::new(
                Colour::rgb(0xec, 0xf3, 0xfe),
                Colour::rgb(0x7c, 0xac, 0xf8),
            ),
            fixed: None,
            channel: Some(ChannelMode::Rgba),
        },
        PropertyConfig {
            name: "--button-active-color".to_string(),
            default: ThemedColour::uniform(Colour::rgb(0x1a, 0x73, 0xe8)),
            fixed: None,
            channel: Some(ChannelMode::Rgb),
        },
        PropertyConfig {
            name: "--xms-outgoing-color".to_string(),
            default: ThemedColour::uniform(Colour::rgb(0x20, 0x21, 0x24)),
            fixed: Some(ThemedColour::new(
                Colour::rgb(0x20, 0x21, 0x24),
                Colour::rgba(0xff, 0xff, 0xff, 0xd6),
            )),
            channel: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.brightening, 100);
        assert!((config.gradient_ratio - 1.2).abs() < f64::EPSILON);
        assert!(!config.gradient);
        assert_eq!(config.properties.len(), 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"opacity": 0.5, "strategy": "custom"}"#).unwrap();
        assert!((config.opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.strategy, "custom");
        assert_eq!(config.selectors, Selectors::default());
    }

    #[test]
    fn test_toml_properties() {
        let toml = r##"
            [[properties]]
            name = "--accent"
            default = { light = "#ffffff", dark = "#000000" }
            channel = "rgb"
        "##;
        let config = EngineConfig::from_toml(toml).unwrap();
        assert_eq!(config.properties.len(), 1);
        assert_eq!(config.properties[0].channel, Some(ChannelMode::Rgb));
        assert_eq!(config.properties[0].default.dark, Colour::rgb(0, 0, 0));
    }

    #[test]
    fn test_bad_colour_fails_to_parse() {
        let json = r##"{"fallback": {"light": "nope", "dark": "#000"}}"##;
        assert!(matches!(
            EngineConfig::from_json(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = EngineConfig {
            opacity: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OpacityOutOfRange(_))
        ));

        let config = EngineConfig {
            gradient_ratio: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGradientRatio(_))
        ));

        let config = EngineConfig {
            strategy: "  ".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyStrategy)));
    }

    #[test]
    fn test_validate_rejects_property_name() {
        let mut config = EngineConfig::default();
        config.properties[0].name = "color".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPropertyName(name)) if name == "color"
        ));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), EngineConfig::default());
    }
}
