//! Named colour selection strategies.
//!
//! A strategy turns a selected conversation into an [`Accent`]. The policy
//! looks strategies up by name and falls back to the themed default colour
//! for names it does not know.

use std::fmt;

use tracing::{debug, warn};

use crate::color::Colour;
use crate::config::{EngineConfig, FROM_AVATAR};
use crate::error::EngineError;
use crate::extract::dominant_colour;
use crate::surface::AvatarSource;
use crate::theme::Theme;
use crate::transform::{Accent, ColourTransformer};

/// What a strategy gets to work with besides the conversation itself.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub transformer: &'a ColourTransformer,
    /// Default colour for the current theme.
    pub fallback: Colour,
}

/// Produces an accent for a selected conversation.
pub trait SelectionStrategy: fmt::Debug {
    /// Name the strategy is registered under.
    fn name(&self) -> &str;

    /// # Errors
    /// Returns [`EngineError`] when the conversation cannot be sampled or the
    /// derived colour cannot be encoded.
    fn select(
        &self,
        source: &dyn AvatarSource,
        ctx: &SelectionContext<'_>,
    ) -> Result<Accent, EngineError>;
}

/// Samples the avatar, takes its dominant colour and runs it through the
/// transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromAvatar;

impl SelectionStrategy for FromAvatar {
    fn name(&self) -> &str {
        FROM_AVATAR
    }

    fn select(
        &self,
        source: &dyn AvatarSource,
        ctx: &SelectionContext<'_>,
    ) -> Result<Accent, EngineError> {
        let surface = source.avatar()?;
        let pixels = surface.read_all()?;
        let dominant = dominant_colour(&pixels);

        match dominant.colour {
            Some(colour) => {
                debug!(
                    select.dominant = %colour,
                    select.count = dominant.count,
                    "Dominant avatar colour"
                );
                Ok(ctx.transformer.derive(colour)?)
            }
            None => {
                warn!("Avatar has no opaque pixels, using default colour");
                Ok(Accent::Solid(ctx.fallback))
            }
        }
    }
}

/// Always answers with the same colour.
#[derive(Debug, Clone)]
pub struct FixedColour {
    name: String,
    colour: Colour,
}

impl FixedColour {
    pub fn new(name: impl Into<String>, colour: Colour) -> Self {
        Self {
            name: name.into(),
            colour,
        }
    }
}

impl SelectionStrategy for FixedColour {
    fn name(&self) -> &str {
        &self.name
    }

    fn select(
        &self,
        _source: &dyn AvatarSource,
        _ctx: &SelectionContext<'_>,
    ) -> Result<Accent, EngineError> {
        Ok(Accent::Solid(self.colour))
    }
}

/// Registry of strategies plus the transformer and fallback they share.
#[derive(Debug)]
pub struct ColourSelectionPolicy {
    strategies: Vec<Box<dyn SelectionStrategy>>,
    transformer: ColourTransformer,
    fallback: Colour,
}

impl ColourSelectionPolicy {
    /// A policy with the built-in [`FromAvatar`] strategy registered.
    pub fn new(transformer: ColourTransformer, fallback: Colour) -> Self {
        Self::empty(transformer, fallback).with_strategy(FromAvatar)
    }

    /// A policy with no strategies; every selection falls back.
    pub const fn empty(transformer: ColourTransformer, fallback: Colour) -> Self {
        Self {
            strategies: Vec::new(),
            transformer,
            fallback,
        }
    }

    pub fn from_config(config: &EngineConfig, theme: Theme) -> Self {
        Self::new(
            ColourTransformer::from_config(config),
            config.fallback.pick(theme),
        )
    }

    /// Registers `strategy`, replacing any strategy with the same name.
    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.strategies.retain(|s| s.name() != strategy.name());
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    pub const fn fallback(&self) -> Colour {
        self.fallback
    }

    pub const fn transformer(&self) -> &ColourTransformer {
        &self.transformer
    }

    /// Runs the strategy registered as `name`, or returns the fallback colour
    /// without touching `source` when there is none.
    ///
    /// # Errors
    /// Propagates the strategy's error.
    pub fn select(&self, name: &str, source: &dyn AvatarSource) -> Result<Accent, EngineError> {
        let Some(strategy) = self.strategies.iter().find(|s| s.name() == name) else {
            warn!(strategy = name, "No selection process provided, using default colour");
            return Ok(Accent::Solid(self.fallback));
        };

        let ctx = SelectionContext {
            transformer: &self.transformer,
            fallback: self.fallback,
        };
        strategy.select(source, &ctx)
    }
}
