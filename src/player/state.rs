//! Published player state

use crate::player::metadata::TrackMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the player as seen by presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub is_playing: bool,
    pub current_time_seconds: f64,
    pub duration_seconds: f64,
    pub volume: f64,
    pub is_loading: bool,
    pub metadata: TrackMetadata,
    pub audio_url: Option<String>,
    /// Identity of the file `audio_url` and `metadata` belong to
    pub source_id: Option<Uuid>,
}

impl PlayerState {
    pub fn with_volume(volume: f64) -> Self {
        Self {
            volume: clamp_volume(volume).unwrap_or(1.0),
            ..Self::default()
        }
    }

    /// Drop everything tied to the current source; volume is kept
    pub fn clear_source(&mut self) {
        *self = Self {
            volume: self.volume,
            ..Self::default()
        };
    }

    pub fn has_source(&self) -> bool {
        self.audio_url.is_some()
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time_seconds: 0.0,
            duration_seconds: 0.0,
            volume: 1.0,
            is_loading: false,
            metadata: TrackMetadata::default(),
            audio_url: None,
            source_id: None,
        }
    }
}

/// Clamp into `[0, 1]`; NaN has no meaningful volume
pub fn clamp_volume(volume: f64) -> Option<f64> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}
