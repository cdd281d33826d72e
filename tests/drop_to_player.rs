use dropdeck::dropzone::{DefaultAction, Document, DocumentEvent};
use dropdeck::player::{AudioBackend, AudioElement, ElementEvent, ElementEventSink, ObjectUrls};
use dropdeck::{AudioSourceManager, DeckConfig, DeckResult, DropZone, SourceFile};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct SilentElement;

impl AudioElement for SilentElement {
    fn play(&mut self) -> DeckResult<()> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn set_current_time(&mut self, _seconds: f64) {}
    fn set_volume(&mut self, _volume: f64) {}
}

#[derive(Default)]
struct SilentBackend {
    sinks: Mutex<Vec<ElementEventSink>>,
}

impl AudioBackend for SilentBackend {
    fn create_element(&self, _url: &str, events: ElementEventSink) -> DeckResult<Box<dyn AudioElement>> {
        self.sinks.lock().push(events);
        Ok(Box::new(SilentElement))
    }
}

#[tokio::test]
async fn dropped_file_becomes_playable_source() {
    let config = DeckConfig::default();
    let document = Arc::new(Document::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let zone = DropZone::mount(document.clone(), &config, move |file| {
        let _ = tx.send(file);
    });

    let backend = Arc::new(SilentBackend::default());
    let urls = ObjectUrls::new();
    let manager = AudioSourceManager::with_collaborators(backend.clone(), None, urls.clone(), &config.player);

    assert_eq!(
        document.dispatch(&DocumentEvent::DragOver {
            client_x: 300.0,
            client_y: 200.0,
        }),
        DefaultAction::Prevent
    );
    assert!(zone.is_dragging_over());

    let dropped = vec![
        SourceFile::new("/music/Side A.mp3"),
        SourceFile::new("/music/Side B.mp3"),
    ];
    document.dispatch(&DocumentEvent::Drop {
        files: dropped,
        client_x: 300.0,
        client_y: 200.0,
    });
    assert!(!zone.is_dragging_over());

    let file = rx.recv().await.expect("file accepted");
    assert!(rx.try_recv().is_err());
    manager.set_source(Some(file.clone()));

    let mut states = manager.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if states.borrow_and_update().audio_url.is_some() {
                return states.borrow().clone();
            }
            states.changed().await.unwrap();
        }
    })
    .await
    .expect("source bound");

    assert_eq!(state.metadata.title.as_deref(), Some("Side A"));
    assert_eq!(state.source_id, Some(file.id()));

    let sink = backend.sinks.lock().last().cloned().unwrap();
    sink.emit(ElementEvent::LoadedMetadata {
        duration_seconds: 200.0,
    });
    manager.play();
    assert!(manager.is_playing());

    drop(manager);
    drop(zone);
    assert_eq!(urls.live_count(), 0);
    assert_eq!(document.total_listeners(), 0);
}
