//! Track metadata and the optional tag reader capability
//!
//! Extraction never fails from the caller's point of view: a missing reader,
//! a reader error or missing fields all resolve to deterministic fallback
//! values derived from the file name.

use crate::error::TagReadError;
use crate::player::source::SourceFile;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Metadata published for the current source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<f64>,
    /// `data:` URI of the embedded cover art
    pub cover: Option<String>,
}

impl TrackMetadata {
    /// Metadata used when no tags are available
    pub fn fallback_for(file: &SourceFile) -> Self {
        Self {
            title: Some(file.stem().to_string()),
            artist: Some(UNKNOWN_ARTIST.to_string()),
            album: Some(UNKNOWN_ALBUM.to_string()),
            duration_seconds: None,
            cover: None,
        }
    }

    /// Fill gaps in the tags with the fallback values
    pub fn from_tags(tags: TagInfo, file: &SourceFile) -> Self {
        let fallback = Self::fallback_for(file);
        Self {
            title: non_empty(tags.title).or(fallback.title),
            artist: non_empty(tags.artist).or(fallback.artist),
            album: non_empty(tags.album).or(fallback.album),
            duration_seconds: tags.duration_seconds.filter(|d| *d > 0.0),
            cover: tags.picture.map(|picture| picture.to_data_uri()),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Embedded picture as returned by a tag reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPicture {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl TagPicture {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Raw tag fields; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_seconds: Option<f64>,
    pub picture: Option<TagPicture>,
}

/// Reads embedded tags from a source file
#[async_trait]
pub trait TagReader: Send + Sync {
    async fn read_tags(&self, file: &SourceFile) -> Result<TagInfo, TagReadError>;
}

/// Resolve metadata for `file`, falling back when there is no reader or it fails
pub async fn extract_metadata(reader: Option<Arc<dyn TagReader>>, file: &SourceFile) -> TrackMetadata {
    let Some(reader) = reader else {
        tracing::debug!("No tag reader configured; using fallback metadata for {}", file.name());
        return TrackMetadata::fallback_for(file);
    };

    match reader.read_tags(file).await {
        Ok(tags) => TrackMetadata::from_tags(tags, file),
        Err(e) => {
            tracing::debug!("Tag extraction failed for {}: {}", file.name(), e);
            TrackMetadata::fallback_for(file)
        }
    }
}
