//! Error types shared across the crate
//!
//! Nothing in the drop zone or the player is fatal to the host. These errors
//! only appear at fallible seams (configuration, the tag reader, the element
//! factory) and are turned into degraded-but-stable state by the callers.

use thiserror::Error;

/// Errors that can occur inside the deck
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to create audio element: {0}")]
    Element(String),

    #[error("Tag read error: {0}")]
    TagRead(#[from] TagReadError),
}

/// Result type for deck operations
pub type DeckResult<T> = Result<T, DeckError>;

/// Failure reported by a metadata tag reader
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagReadError {
    #[error("No tags found in {0}")]
    NoTags(String),

    #[error("Unreadable file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Tag reader task failed: {0}")]
    Worker(String),
}
