//! Tracked custom-property declarations.
//!
//! A [`PropertyPayload`] remembers the literal `name:value;` text last written
//! for one CSS custom property and where that literal sits inside the live
//! style containers. Locations are only trusted until the next rewrite of the
//! same container; the patcher re-verifies them before every splice.

use serde::{Deserialize, Serialize};

use crate::config::PropertyConfig;
use crate::theme::Theme;
use crate::transform::Accent;

/// Which channels of the derived accent a property receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// The accent as derived, alpha suffix included.
    #[default]
    Rgba,
    /// The accent with its alpha suffix stripped.
    Rgb,
}

impl ChannelMode {
    /// Legacy rule: properties whose name mentions `button` take RGB only.
    pub fn infer(name: &str) -> Self {
        if name.contains("button") {
            Self::Rgb
        } else {
            Self::Rgba
        }
    }
}

/// Renders a custom-property declaration literal.
pub fn declaration(name: &str, value: &str) -> String {
    format!("{name}:{value};")
}

/// Byte offsets of a payload literal within one style container.
#[derive(Debug, Clone)]
pub struct Location<C> {
    pub container: C,
    /// Ascending, non-overlapping.
    pub offsets: Vec<usize>,
}

/// One CSS custom property under management.
#[derive(Debug, Clone)]
pub struct PropertyPayload<C> {
    name: String,
    value: String,
    fixed: Option<String>,
    channel: ChannelMode,
    literal: Option<String>,
    locations: Vec<Location<C>>,
}

impl<C> PropertyPayload<C> {
    /// Creates a payload with the value the page is expected to ship with.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            fixed: None,
            channel: ChannelMode::Rgba,
            literal: None,
            locations: Vec::new(),
        }
    }

    /// Pins the property to `value` regardless of the selected accent.
    pub fn with_fixed(mut self, value: impl Into<String>) -> Self {
        self.fixed = Some(value.into());
        self
    }

    pub fn with_channel(mut self, channel: ChannelMode) -> Self {
        self.channel = channel;
        self
    }

    /// Builds the payload for `theme` from its config entry.
    pub fn from_config(config: &PropertyConfig, theme: Theme) -> Self {
        let channel = config
            .channel
            .unwrap_or_else(|| ChannelMode::infer(&config.name));
        let payload = Self::new(&config.name, config.default.pick(theme).to_hex()).with_channel(channel);
        match &config.fixed {
            Some(fixed) => payload.with_fixed(fixed.pick(theme).to_hex()),
            None => payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value currently believed to be in the stylesheet.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn fixed(&self) -> Option<&str> {
        self.fixed.as_deref()
    }

    pub const fn channel(&self) -> ChannelMode {
        self.channel
    }

    /// The cached literal, if one has been rendered yet.
    pub fn cached_literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// The literal to search for, rendering and caching it on first use.
    pub fn literal(&mut self) -> &str {
        self.literal
            .get_or_insert_with(|| declaration(&self.name, &self.value))
    }

    pub fn locations(&self) -> &[Location<C>] {
        &self.locations
    }

    /// True once a scan has recorded at least one location.
    pub fn is_located(&self) -> bool {
        !self.locations.is_empty()
    }

    /// Forgets every recorded location.
    pub fn invalidate(&mut self) {
        self.locations.clear();
    }

    /// The value this property should take for `accent`.
    pub fn resolve(&self, accent: &Accent) -> String {
        self.fixed
            .clone()
            .unwrap_or_else(|| accent.css_for(self.channel))
    }

    pub(crate) fn set_locations(&mut self, locations: Vec<Location<C>>) {
        self.locations = locations;
    }

    pub(crate) fn locations_mut(&mut self) -> &mut [Location<C>] {
        &mut self.locations
    }

    /// Records that `value` is now what the stylesheet holds.
    pub(crate) fn commit(&mut self, value: String) {
        self.literal = Some(declaration(&self.name, &value));
        self.value = value;
    }
}
