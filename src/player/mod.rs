//! Audio source management
//!
//! Turns a dropped file into a playable source: object URL allocation, tag
//! based metadata with a deterministic fallback, the platform element
//! lifecycle and the transport controls.

pub mod element;
pub mod lofty_reader;
pub mod manager;
pub mod metadata;
pub mod source;
pub mod state;

pub use element::{AudioBackend, AudioElement, ElementEvent, ElementEventSink};
pub use lofty_reader::LoftyTagReader;
pub use manager::AudioSourceManager;
pub use metadata::{extract_metadata, TagInfo, TagPicture, TagReader, TrackMetadata};
pub use source::{ObjectUrl, ObjectUrls, SourceFile};
pub use state::{clamp_volume, PlayerState};
