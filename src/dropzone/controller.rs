//! Drop zone controller
//!
//! Listens for drag events at document scope, drives the cursor tracker
//! while a drag session is active, and hands the first dropped file to the
//! acceptance callback.

use crate::config::DeckConfig;
use crate::dropzone::events::{
    DefaultAction, DocumentEvent, EventContext, EventKind, EventTarget, ListenerGuard,
};
use crate::dropzone::indicator::{IndicatorGeometry, IndicatorPlacement};
use crate::player::source::SourceFile;
use crate::processing::{CursorPosition, CursorTracker};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Drag session phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragPhase {
    #[default]
    Idle,
    Tracking,
}

/// Callback receiving the accepted file
pub type FileAcceptedCallback = Arc<dyn Fn(SourceFile) + Send + Sync>;

struct DropZoneShared {
    tracker: CursorTracker,
    phase: Store<DragPhase>,
    geometry: IndicatorGeometry,
    on_file_accepted: FileAcceptedCallback,
}

impl DropZoneShared {
    fn handle(&self, event: &DocumentEvent, context: &EventContext) -> DefaultAction {
        match event {
            DocumentEvent::DragOver { client_x, client_y } => {
                self.tracker.update(*client_x, *client_y);
                if self.phase.get() == DragPhase::Idle {
                    self.tracker.start(*client_x, *client_y);
                    self.phase.set(DragPhase::Tracking);
                    tracing::debug!("Drag session started at ({}, {})", client_x, client_y);
                }
                DefaultAction::Prevent
            }
            DocumentEvent::DragLeave { target } => {
                // Crossing into a child fires dragleave on the child; only
                // leaving the zone itself ends the session.
                if *target == context.current_target {
                    self.end_session("drag left the zone");
                }
                DefaultAction::Allow
            }
            DocumentEvent::MouseLeave => {
                self.end_session("pointer left the window");
                DefaultAction::Allow
            }
            DocumentEvent::Drop { files, .. } => {
                self.end_session("drop");
                self.accept_first(files);
                DefaultAction::Prevent
            }
        }
    }

    fn end_session(&self, reason: &str) {
        self.tracker.stop();
        let ended = self.phase.update_if(|phase| {
            if *phase == DragPhase::Tracking {
                *phase = DragPhase::Idle;
                true
            } else {
                false
            }
        });
        if ended {
            tracing::debug!("Drag session ended: {}", reason);
        }
    }

    fn accept_first(&self, files: &[SourceFile]) {
        let Some(first) = files.first() else {
            tracing::debug!("Drop carried no files; ignoring");
            return;
        };

        if files.len() > 1 {
            tracing::debug!("Drop carried {} files; only the first is accepted", files.len());
        }

        tracing::info!("Accepted dropped file: {}", first.name());
        (self.on_file_accepted)(first.clone());
    }
}

/// Mounted drop zone
///
/// Dropping the controller removes its document listeners and cancels the
/// cursor frame loop.
pub struct DropZone {
    shared: Arc<DropZoneShared>,
    listeners: Option<ListenerGuard>,
}

impl DropZone {
    /// Register document-level listeners and start in the idle phase
    ///
    /// Only one drop zone per document is supported.
    pub fn mount<F>(target: Arc<dyn EventTarget>, config: &DeckConfig, on_file_accepted: F) -> Self
    where
        F: Fn(SourceFile) + Send + Sync + 'static,
    {
        if target.listener_count(EventKind::DragOver) > 0 {
            tracing::warn!("Document already has dragover listeners; nested drop zones are unsupported");
        }

        let shared = Arc::new(DropZoneShared {
            tracker: CursorTracker::new(&config.cursor),
            phase: Store::new(DragPhase::Idle),
            geometry: IndicatorGeometry::new(&config.indicator),
            on_file_accepted: Arc::new(on_file_accepted),
        });

        let mut listeners = ListenerGuard::new(target);
        for kind in [
            EventKind::DragOver,
            EventKind::DragLeave,
            EventKind::MouseLeave,
            EventKind::Drop,
        ] {
            let handler = shared.clone();
            listeners.listen(kind, Arc::new(move |event: &DocumentEvent, context: &EventContext| {
                handler.handle(event, context)
            }));
        }

        tracing::info!("Drop zone mounted ({} listeners)", listeners.len());

        Self {
            shared,
            listeners: Some(listeners),
        }
    }

    pub fn is_dragging_over(&self) -> bool {
        self.shared.phase.get() == DragPhase::Tracking
    }

    pub fn phase(&self) -> DragPhase {
        self.shared.phase.get()
    }

    /// Follow phase changes, e.g. to show or hide the overlay
    pub fn subscribe(&self) -> watch::Receiver<DragPhase> {
        self.shared.phase.subscribe()
    }

    /// Smoothed cursor position for the indicator
    pub fn cursor_position(&self) -> CursorPosition {
        self.shared.tracker.current_position()
    }

    pub fn tracker(&self) -> &CursorTracker {
        &self.shared.tracker
    }

    /// Where to draw the indicator, or `None` outside a drag session
    pub fn indicator_placement(&self) -> Option<IndicatorPlacement> {
        if !self.is_dragging_over() {
            return None;
        }
        Some(self.shared.geometry.placement(self.cursor_position()))
    }

    pub fn indicator_transform(&self) -> Option<String> {
        if !self.is_dragging_over() {
            return None;
        }
        Some(self.shared.geometry.css_transform(self.cursor_position()))
    }
}

impl Drop for DropZone {
    fn drop(&mut self) {
        self.listeners.take();
        self.shared.tracker.stop();
        tracing::info!("Drop zone unmounted");
    }
}
