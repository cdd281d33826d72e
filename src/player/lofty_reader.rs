//! Tag reader backed by lofty

use crate::error::TagReadError;
use crate::player::metadata::{TagInfo, TagPicture, TagReader};
use crate::player::source::SourceFile;
use async_trait::async_trait;
use lofty::picture::{Picture, PictureType};
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use std::path::Path;

/// Reads ID3/Vorbis/MP4/... tags from the file on disk
///
/// Parsing runs on the blocking pool so the event loop is never stalled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TagReader for LoftyTagReader {
    async fn read_tags(&self, file: &SourceFile) -> Result<TagInfo, TagReadError> {
        let path = file.path().to_path_buf();
        tokio::task::spawn_blocking(move || read_tags_blocking(&path))
            .await
            .map_err(|e| TagReadError::Worker(e.to_string()))?
    }
}

fn read_tags_blocking(path: &Path) -> Result<TagInfo, TagReadError> {
    let tagged_file = lofty::read_from_path(path).map_err(|e| TagReadError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let duration = tagged_file.properties().duration();
    let duration_seconds = (!duration.is_zero()).then(|| duration.as_secs_f64());

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        // Untagged audio still has a usable duration.
        return match duration_seconds {
            Some(_) => Ok(TagInfo {
                duration_seconds,
                ..TagInfo::default()
            }),
            None => Err(TagReadError::NoTags(path.display().to_string())),
        };
    };

    Ok(TagInfo {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        duration_seconds,
        picture: choose_cover(tag.pictures()).map(|picture| TagPicture {
            data: picture.data().to_vec(),
            mime_type: picture
                .mime_type()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "image/jpeg".to_string()),
        }),
    })
}

/// Front cover if present, otherwise the first picture
fn choose_cover(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let file = SourceFile::new(dir.path().join("nothing-here.mp3"));

        let result = LoftyTagReader::new().read_tags(&file).await;
        assert!(matches!(result, Err(TagReadError::Unreadable { .. })));
    }

    #[tokio::test]
    async fn test_non_audio_file_is_rejected() {
        let mut tmp = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        tmp.write_all(b"plain bytes with no recognisable container").unwrap();
        let file = SourceFile::new(tmp.path());

        let result = LoftyTagReader::new().read_tags(&file).await;
        assert!(result.is_err());
    }

    /// One second of 8 kHz mono 16-bit silence, no tag chunks
    fn silent_wav() -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let data_len: u32 = sample_rate * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    #[tokio::test]
    async fn test_untagged_audio_keeps_duration() {
        let mut tmp = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        tmp.write_all(&silent_wav()).unwrap();
        tmp.flush().unwrap();
        let file = SourceFile::new(tmp.path());

        let tags = LoftyTagReader::new().read_tags(&file).await.unwrap();
        assert!(tags.title.is_none());
        assert!(tags.picture.is_none());
        let duration = tags.duration_seconds.expect("duration from audio properties");
        assert!((duration - 1.0).abs() < 0.05, "duration = {}", duration);
    }

    #[test]
    fn test_choose_cover_empty() {
        assert!(choose_cover(&[]).is_none());
    }
}
