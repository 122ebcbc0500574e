//! Per-interaction orchestration: select a colour, then patch it in.

use tracing::{error, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::patch::{PatchReport, StyleContainer, StyleSource, StylesheetPatcher};
use crate::payload::PropertyPayload;
use crate::policy::{ColourSelectionPolicy, SelectionStrategy};
use crate::surface::AvatarSource;
use crate::theme::Theme;
use crate::transform::Accent;

/// One initialised engine instance.
///
/// Owns the payload store; nothing is process-global, so independent
/// instances (one per page, one per test) never see each other's offsets.
#[derive(Debug)]
pub struct Recolourer<C> {
    config: EngineConfig,
    theme: Theme,
    policy: ColourSelectionPolicy,
    patcher: StylesheetPatcher<C>,
    last: Option<Accent>,
}

impl<C: StyleContainer + Clone> Recolourer<C> {
    /// Builds the engine for `theme`.
    ///
    /// Configuration problems are logged, not returned; out-of-range values
    /// degrade (opacity clamps, bad gradient ratios fail per interaction).
    pub fn new(config: EngineConfig, theme: Theme) -> Self {
        if let Err(err) = config.validate() {
            error!(error = %err, "Invalid configuration");
        }

        let policy = ColourSelectionPolicy::from_config(&config, theme);
        let patcher = StylesheetPatcher::new(
            config.patch_mode,
            config
                .properties
                .iter()
                .map(|property| PropertyPayload::from_config(property, theme)),
        );

        info!(
            engine.theme = %theme,
            engine.strategy = %config.strategy,
            engine.properties = config.properties.len(),
            "Engine initialised"
        );

        Self {
            config,
            theme,
            policy,
            patcher,
            last: None,
        }
    }

    /// Registers an extra selection strategy.
    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.policy = self.policy.with_strategy(strategy);
        self
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn policy(&self) -> &ColourSelectionPolicy {
        &self.policy
    }

    pub const fn patcher(&self) -> &StylesheetPatcher<C> {
        &self.patcher
    }

    /// The accent written by the last successful interaction.
    pub const fn last_accent(&self) -> Option<Accent> {
        self.last
    }

    /// Handles one conversation selection: picks the accent with the
    /// configured strategy and writes it into `styles`.
    ///
    /// # Errors
    /// Returns the selection error after logging it. Nothing is written in
    /// that case; the next interaction starts over.
    pub fn apply<S>(&mut self, styles: &S, conversation: &dyn AvatarSource) -> Result<PatchReport, EngineError>
    where
        S: StyleSource<Container = C>,
    {
        match self.policy.select(&self.config.strategy, conversation) {
            Ok(accent) => Ok(self.apply_accent(styles, accent)),
            Err(err) => {
                error!(error = %err, "Could not apply conversation colour");
                Err(err)
            }
        }
    }

    /// Writes an already derived accent.
    pub fn apply_accent<S>(&mut self, styles: &S, accent: Accent) -> PatchReport
    where
        S: StyleSource<Container = C>,
    {
        let report = self.patcher.update(styles, &accent);
        self.last = Some(accent);
        info!(
            engine.accent = %accent,
            engine.patched = report.patched.len(),
            engine.missing = report.missing.len(),
            "Injection loaded"
        );
        report
    }
}
