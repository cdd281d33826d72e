//! Deck configuration
//!
//! Every field has a default so a partial JSON document (or none at all) is a
//! valid configuration.

use crate::error::{DeckError, DeckResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_FRAME_RATE_HZ: f64 = 60.0;
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckConfig {
    pub cursor: CursorConfig,
    pub indicator: IndicatorConfig,
    pub cover: CoverConfig,
    pub player: PlayerConfig,
}

impl DeckConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> DeckResult<Self> {
        let config: DeckConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> DeckResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("Loaded deck config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> DeckResult<()> {
        let factor = self.cursor.smooth_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(DeckError::Config(format!(
                "cursor.smoothFactor must be in (0, 1], got {}",
                factor
            )));
        }
        if !(self.cursor.frame_rate_hz > 0.0 && self.cursor.frame_rate_hz.is_finite()) {
            return Err(DeckError::Config(format!(
                "cursor.frameRateHz must be positive, got {}",
                self.cursor.frame_rate_hz
            )));
        }
        if self.indicator.width == 0 || self.indicator.height == 0 {
            return Err(DeckError::Config(
                "indicator width and height must be non-zero".to_string(),
            ));
        }
        if !self.player.skip_seconds.is_finite() || self.player.skip_seconds < 0.0 {
            return Err(DeckError::Config(format!(
                "player.skipSeconds must be a non-negative number, got {}",
                self.player.skip_seconds
            )));
        }
        Ok(())
    }
}

/// Smoothed cursor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorConfig {
    /// Fraction of the remaining distance closed per frame
    pub smooth_factor: f64,
    /// Display refresh rate the smoothing loop runs at
    pub frame_rate_hz: f64,
}

impl CursorConfig {
    /// Time between smoothing frames
    ///
    /// A rate that is not a positive finite number falls back to 60 Hz, and
    /// the interval never drops below one millisecond.
    pub fn frame_interval(&self) -> Duration {
        let rate = if self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0 {
            self.frame_rate_hz
        } else {
            tracing::warn!(
                "Invalid cursor frame rate {}; using {} Hz",
                self.frame_rate_hz,
                DEFAULT_FRAME_RATE_HZ
            );
            DEFAULT_FRAME_RATE_HZ
        };
        Duration::from_secs_f64(1.0 / rate).max(MIN_FRAME_INTERVAL)
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smooth_factor: 0.1,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}

/// Drop indicator box, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndicatorConfig {
    pub width: u32,
    pub height: u32,
    /// Extra room around the box so the dashed stroke is not clipped
    pub padding: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
            padding: 4,
        }
    }
}

/// Cover art size presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl CoverSize {
    /// Edge length of the square cover box
    pub fn box_px(self) -> u32 {
        match self {
            CoverSize::Sm => 128,
            CoverSize::Md => 256,
            CoverSize::Lg => 384,
        }
    }

    /// Size of the placeholder icon drawn when there is no artwork
    pub fn icon_px(self) -> u32 {
        match self {
            CoverSize::Sm => 32,
            CoverSize::Md => 64,
            CoverSize::Lg => 96,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverConfig {
    pub size: CoverSize,
}

/// Player defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    pub initial_volume: f64,
    /// Step used by skip forward / skip back
    pub skip_seconds: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            skip_seconds: 10.0,
        }
    }
}
