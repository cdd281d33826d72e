//! Source files and object URLs
//!
//! A [`SourceFile`] is the caller-owned handle to a dropped file. The
//! [`ObjectUrls`] registry hands out process-local `blob:` URLs for such
//! files; each allocation is an [`ObjectUrl`] lease that revokes itself when
//! dropped, so every URL is released exactly once.

use parking_lot::Mutex as ParkingMutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug)]
struct SourceFileInner {
    id: Uuid,
    name: String,
    path: PathBuf,
}

/// Cheaply clonable handle to a user-supplied file
///
/// Two handles are equal when they came from the same `new` call, even if
/// they point at the same path.
#[derive(Debug, Clone)]
pub struct SourceFile {
    inner: Arc<SourceFileInner>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::with_name(path, name)
    }

    /// Handle whose display name differs from the path's file name
    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SourceFileInner {
                id: Uuid::new_v4(),
                name: name.into(),
                path: path.into(),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// File name without its final extension
    ///
    /// `song.mp3` becomes `song`, `a.b.flac` becomes `a.b`; a trailing dot or
    /// a name without an extension is returned unchanged.
    pub fn stem(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(index) if index + 1 < name.len() => &name[..index],
            _ => name,
        }
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for SourceFile {}

const URL_PREFIX: &str = "blob:dropdeck/";

/// Registry of live object URLs
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    entries: Arc<ParkingMutex<HashMap<String, SourceFile>>>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh URL for `file`
    pub fn create(&self, file: &SourceFile) -> ObjectUrl {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        self.entries.lock().insert(url.clone(), file.clone());
        tracing::debug!("Allocated object URL {} for {}", url, file.name());
        ObjectUrl {
            url,
            registry: self.clone(),
        }
    }

    /// File behind a live URL
    pub fn resolve(&self, url: &str) -> Option<SourceFile> {
        self.entries.lock().get(url).cloned()
    }

    /// Release a URL; releasing an unknown or already released URL is a no-op
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.entries.lock().remove(url).is_some();
        if removed {
            tracing::debug!("Revoked object URL {}", url);
        }
        removed
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.entries.lock().contains_key(url)
    }
}

/// Owned allocation from [`ObjectUrls`]; revoked on drop
#[derive(Debug)]
pub struct ObjectUrl {
    url: String,
    registry: ObjectUrls,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
