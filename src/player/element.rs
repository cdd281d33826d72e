//! Playable element interface
//!
//! The host platform supplies the actual audio playback object. The manager
//! creates one element per bound source through an [`AudioBackend`] and
//! receives its asynchronous notifications through an [`ElementEventSink`].

use crate::error::DeckResult;
use std::sync::Arc;

/// Notifications raised by a playable element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementEvent {
    /// Duration is known and playback can start
    LoadedMetadata { duration_seconds: f64 },
    /// Playback position advanced
    TimeUpdate { current_time_seconds: f64 },
    /// Playback reached the end of the source
    Ended,
    /// The source could not be loaded or decoded
    Error { message: String },
}

impl std::fmt::Display for ElementEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementEvent::LoadedMetadata { .. } => write!(f, "loadedmetadata"),
            ElementEvent::TimeUpdate { .. } => write!(f, "timeupdate"),
            ElementEvent::Ended => write!(f, "ended"),
            ElementEvent::Error { .. } => write!(f, "error"),
        }
    }
}

/// Platform audio object bound to a single source URL
pub trait AudioElement: Send {
    /// Start or resume playback
    fn play(&mut self) -> DeckResult<()>;

    fn pause(&mut self);

    /// Move the playback position; the platform clamps to `[0, duration]`
    fn set_current_time(&mut self, seconds: f64);

    /// Volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);
}

/// Factory for playable elements
pub trait AudioBackend: Send + Sync {
    /// Create an element for `url`
    ///
    /// The element must report its notifications through `events` for as
    /// long as it lives. It may do so from any thread.
    fn create_element(&self, url: &str, events: ElementEventSink) -> DeckResult<Box<dyn AudioElement>>;
}

type Deliver = Arc<dyn Fn(u64, ElementEvent) + Send + Sync>;

/// Channel from an element back to the manager that created it
///
/// Each sink is tagged with the source generation it was issued for; events
/// from an element whose generation is no longer current are dropped.
#[derive(Clone)]
pub struct ElementEventSink {
    generation: u64,
    deliver: Deliver,
}

impl ElementEventSink {
    pub fn new(generation: u64, deliver: impl Fn(u64, ElementEvent) + Send + Sync + 'static) -> Self {
        Self {
            generation,
            deliver: Arc::new(deliver),
        }
    }

    pub fn emit(&self, event: ElementEvent) {
        (self.deliver)(self.generation, event);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for ElementEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementEventSink")
            .field("generation", &self.generation)
            .finish()
    }
}
