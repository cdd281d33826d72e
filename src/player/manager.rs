//! Audio source manager
//!
//! Owns the single playable element bound to the current file, the object
//! URL it plays from, and the state published to presentation.
//!
//! Every `set_source` call starts a new generation. Loads, element events and
//! state publishes carry the generation they were issued for and are dropped
//! once a newer call has been made, so a slow tag read for an old file can
//! never overwrite the state of a newer one.

use crate::config::PlayerConfig;
use crate::player::element::{AudioBackend, AudioElement, ElementEvent, ElementEventSink};
use crate::player::metadata::{extract_metadata, TagReader, TrackMetadata};
use crate::player::source::{ObjectUrl, ObjectUrls, SourceFile};
use crate::player::state::{clamp_volume, PlayerState};
use crate::store::Store;
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Slot {
    element: Option<Box<dyn AudioElement>>,
    url: Option<ObjectUrl>,
    load_task: Option<JoinHandle<()>>,
}

struct Inner {
    urls: ObjectUrls,
    backend: Arc<dyn AudioBackend>,
    tag_reader: Option<Arc<dyn TagReader>>,
    generation: AtomicU64,
    // Lock order: slot before state. Element calls never happen inside a
    // state update, since elements may report events synchronously.
    slot: ParkingMutex<Slot>,
    state: Store<PlayerState>,
    skip_seconds: f64,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Pause and drop the bound element, then release its URL
    fn detach(slot: &mut Slot) {
        if let Some(mut element) = slot.element.take() {
            element.pause();
        }
        slot.url.take();
    }

    async fn load(self: Arc<Self>, file: SourceFile, generation: u64) {
        tracing::info!("Loading audio source {} (generation {})", file.name(), generation);

        let url = self.urls.create(&file);
        let metadata = extract_metadata(self.tag_reader.clone(), &file).await;

        let mut slot = self.slot.lock();
        if !self.is_current(generation) {
            tracing::debug!("Discarding stale load of {} (generation {})", file.name(), generation);
            return;
        }

        Self::detach(&mut slot);

        // Publish before the element exists: it may report metadata-ready
        // while it is being created, and that must land on top of this state.
        let audio_url = url.as_str().to_string();
        let published = self.state.update_if(|state| {
            if !self.is_current(generation) {
                return false;
            }
            state.clear_source();
            state.is_loading = true;
            state.audio_url = Some(audio_url.clone());
            state.metadata = metadata;
            state.source_id = Some(file.id());
            true
        });
        if !published {
            tracing::debug!("Discarding stale load of {} (generation {})", file.name(), generation);
            return;
        }

        let sink = self.event_sink(generation);
        let mut element = match self.backend.create_element(&audio_url, sink) {
            Ok(element) => element,
            Err(e) => {
                drop(slot);
                drop(url);
                tracing::error!("Error loading audio {}: {}", file.name(), e);
                self.state.update_if(|state| {
                    if !self.is_current(generation) {
                        return false;
                    }
                    state.clear_source();
                    true
                });
                return;
            }
        };

        let volume = self.state.read(|state| state.volume);
        element.set_volume(volume);

        slot.element = Some(element);
        slot.url = Some(url);
        drop(slot);

        tracing::info!("Bound audio source {} to {}", file.name(), audio_url);
    }

    fn event_sink(self: &Arc<Self>, generation: u64) -> ElementEventSink {
        let weak: Weak<Inner> = Arc::downgrade(self);
        ElementEventSink::new(generation, move |generation, event| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_element_event(generation, event);
            }
        })
    }

    fn handle_element_event(&self, generation: u64, event: ElementEvent) {
        let applied = self.state.update_if(|state| {
            if !self.is_current(generation) {
                return false;
            }
            match &event {
                ElementEvent::LoadedMetadata { duration_seconds } => {
                    state.duration_seconds = *duration_seconds;
                    state.is_loading = false;
                    if state.metadata.duration_seconds.is_none() {
                        state.metadata.duration_seconds = Some(*duration_seconds);
                    }
                }
                ElementEvent::TimeUpdate {
                    current_time_seconds,
                } => {
                    state.current_time_seconds = *current_time_seconds;
                }
                ElementEvent::Ended => {
                    state.is_playing = false;
                    state.current_time_seconds = 0.0;
                }
                ElementEvent::Error { .. } => {
                    state.is_loading = false;
                }
            }
            true
        });

        if !applied {
            tracing::trace!("Ignoring {} from a detached element", event);
            return;
        }

        match event {
            ElementEvent::Error { message } => {
                tracing::error!("Error loading audio: {}", message);
            }
            ElementEvent::LoadedMetadata { duration_seconds } => {
                tracing::debug!("Audio metadata ready, duration {:.2}s", duration_seconds);
            }
            _ => {}
        }
    }

    fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.slot.lock();
        if let Some(task) = slot.load_task.take() {
            task.abort();
        }
        Self::detach(&mut slot);
    }
}

/// Lifecycle owner for one playable audio source
///
/// Dropping the manager pauses playback, cancels any pending load and
/// releases the object URL.
pub struct AudioSourceManager {
    inner: Arc<Inner>,
}

impl AudioSourceManager {
    /// Manager without a tag reader; metadata always uses the fallback
    pub fn new(backend: Arc<dyn AudioBackend>, config: &PlayerConfig) -> Self {
        Self::with_collaborators(backend, None, ObjectUrls::new(), config)
    }

    pub fn with_collaborators(
        backend: Arc<dyn AudioBackend>,
        tag_reader: Option<Arc<dyn TagReader>>,
        urls: ObjectUrls,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                urls,
                backend,
                tag_reader,
                generation: AtomicU64::new(0),
                slot: ParkingMutex::new(Slot::default()),
                state: Store::new(PlayerState::with_volume(config.initial_volume)),
                skip_seconds: config.skip_seconds,
            }),
        }
    }

    /// Replace the current file
    ///
    /// `None` tears down the current source and resets the state. A file is
    /// loaded in the background: URL allocation, tag extraction, then the
    /// new element is bound and published. Must be called from within a
    /// tokio runtime for the load to run.
    pub fn set_source(&self, file: Option<SourceFile>) {
        let inner = &self.inner;
        let mut generation = 0;
        inner.state.update(|state| {
            generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            match &file {
                Some(_) => state.is_loading = true,
                None => state.clear_source(),
            }
        });

        let mut slot = inner.slot.lock();
        if let Some(task) = slot.load_task.take() {
            task.abort();
        }

        let Some(file) = file else {
            Inner::detach(&mut slot);
            tracing::info!("Audio source cleared");
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                slot.load_task = Some(runtime.spawn(inner.clone().load(file, generation)));
            }
            Err(_) => {
                drop(slot);
                tracing::error!("No async runtime available; cannot load {}", file.name());
                inner.state.update_if(|state| {
                    if !inner.is_current(generation) {
                        return false;
                    }
                    state.is_loading = false;
                    true
                });
            }
        }
    }

    /// Start or resume playback; no-op without a bound source
    pub fn play(&self) {
        let result = {
            let mut slot = self.inner.slot.lock();
            match slot.element.as_mut() {
                Some(element) => element.play(),
                None => return,
            }
        };

        match result {
            Ok(()) => self.inner.state.update(|state| state.is_playing = true),
            Err(e) => tracing::warn!("Playback did not start: {}", e),
        }
    }

    pub fn pause(&self) {
        {
            let mut slot = self.inner.slot.lock();
            match slot.element.as_mut() {
                Some(element) => element.pause(),
                None => return,
            }
        }
        self.inner.state.update(|state| state.is_playing = false);
    }

    pub fn toggle_play(&self) {
        if self.inner.state.read(|state| state.is_playing) {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playback position
    ///
    /// The value is not validated here; the element clamps it. The published
    /// position is updated right away and corrected by the next time update.
    pub fn seek(&self, time_seconds: f64) {
        {
            let mut slot = self.inner.slot.lock();
            match slot.element.as_mut() {
                Some(element) => element.set_current_time(time_seconds),
                None => return,
            }
        }
        self.inner
            .state
            .update(|state| state.current_time_seconds = time_seconds);
    }

    /// Seek forward by the configured skip step
    pub fn skip_forward(&self) {
        self.skip_by(self.inner.skip_seconds);
    }

    /// Seek back by the configured skip step
    pub fn skip_back(&self) {
        self.skip_by(-self.inner.skip_seconds);
    }

    fn skip_by(&self, delta: f64) {
        let (current, duration) = self
            .inner
            .state
            .read(|state| (state.current_time_seconds, state.duration_seconds));

        let mut target = (current + delta).max(0.0);
        if duration > 0.0 {
            target = target.min(duration);
        }
        self.seek(target);
    }

    /// Set the volume, clamped to `[0, 1]`
    ///
    /// The volume is remembered without a source and applied to the next
    /// element that gets bound.
    pub fn set_volume(&self, volume: f64) {
        let Some(volume) = clamp_volume(volume) else {
            tracing::warn!("Ignoring NaN volume");
            return;
        };

        if let Some(element) = self.inner.slot.lock().element.as_mut() {
            element.set_volume(volume);
        }
        self.inner.state.update(|state| state.volume = volume);
    }

    /// Pause and rewind to the start
    pub fn stop(&self) {
        {
            let mut slot = self.inner.slot.lock();
            match slot.element.as_mut() {
                Some(element) => {
                    element.pause();
                    element.set_current_time(0.0);
                }
                None => return,
            }
        }
        self.inner.state.update(|state| {
            state.is_playing = false;
            state.current_time_seconds = 0.0;
        });
    }

    pub fn state(&self) -> PlayerState {
        self.inner.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.inner.state.subscribe()
    }

    pub fn metadata(&self) -> TrackMetadata {
        self.inner.state.read(|state| state.metadata.clone())
    }

    pub fn is_playing(&self) -> bool {
        self.inner.state.read(|state| state.is_playing)
    }

    pub fn has_element(&self) -> bool {
        self.inner.slot.lock().element.is_some()
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.inner.urls
    }
}

impl Drop for AudioSourceManager {
    fn drop(&mut self) {
        self.inner.teardown();
        tracing::debug!("Audio source manager torn down");
    }
}
