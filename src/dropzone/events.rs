//! Document-level drag events and listener registration
//!
//! Hosts forward native drag events into a [`Document`]. Listeners are
//! registered per [`EventKind`] and owned by a [`ListenerGuard`], which
//! removes every listener it registered when it is dropped.

use crate::player::source::SourceFile;
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque identity of a node in the host's element tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragOver,
    DragLeave,
    MouseLeave,
    Drop,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::DragOver => write!(f, "dragover"),
            EventKind::DragLeave => write!(f, "dragleave"),
            EventKind::MouseLeave => write!(f, "mouseleave"),
            EventKind::Drop => write!(f, "drop"),
        }
    }
}

/// Drag events as forwarded by the host, coordinates in client pixels
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    DragOver { client_x: f64, client_y: f64 },
    /// `target` is the node the pointer left
    DragLeave { target: NodeId },
    /// Pointer left the window entirely
    MouseLeave,
    Drop { files: Vec<SourceFile>, client_x: f64, client_y: f64 },
}

impl DocumentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DocumentEvent::DragOver { .. } => EventKind::DragOver,
            DocumentEvent::DragLeave { .. } => EventKind::DragLeave,
            DocumentEvent::MouseLeave => EventKind::MouseLeave,
            DocumentEvent::Drop { .. } => EventKind::Drop,
        }
    }
}

/// Dispatch context handed to listeners alongside the event
#[derive(Debug, Clone, Copy)]
pub struct EventContext {
    /// Node the listener is attached to
    pub current_target: NodeId,
}

/// What the host should do with the platform's default handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Allow,
    /// Suppress the default (e.g. the webview navigating to a dropped file)
    Prevent,
}

pub type Listener = Arc<dyn Fn(&DocumentEvent, &EventContext) -> DefaultAction + Send + Sync>;

/// Something listeners can be attached to
pub trait EventTarget: Send + Sync {
    /// Node that listeners on this target see as `current_target`
    fn root(&self) -> NodeId;

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Returns false if the listener was not registered
    fn remove_listener(&self, id: ListenerId) -> bool;

    fn listener_count(&self, kind: EventKind) -> usize;
}

/// In-process document: the root of the host's element tree
pub struct Document {
    root: NodeId,
    next_node: AtomicU64,
    next_listener: AtomicU64,
    listeners: ParkingMutex<Vec<(ListenerId, EventKind, Listener)>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            root: NodeId(0),
            next_node: AtomicU64::new(1),
            next_listener: AtomicU64::new(1),
            listeners: ParkingMutex::new(Vec::new()),
        }
    }

    /// Allocate an id for a host element below the root
    pub fn create_node(&self) -> NodeId {
        NodeId(self.next_node.fetch_add(1, Ordering::Relaxed))
    }

    /// Deliver an event to every listener registered for its kind
    ///
    /// Listeners run outside the registry lock, so they may register or
    /// remove listeners themselves. Returns `Prevent` if any listener asked
    /// for it.
    pub fn dispatch(&self, event: &DocumentEvent) -> DefaultAction {
        let kind = event.kind();
        let matching: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        let context = EventContext {
            current_target: self.root,
        };

        let mut action = DefaultAction::Allow;
        for listener in matching {
            if listener(event, &context) == DefaultAction::Prevent {
                action = DefaultAction::Prevent;
            }
        }
        action
    }

    /// Total number of registered listeners across all kinds
    pub fn total_listeners(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTarget for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, kind, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _, _)| *existing != id);
        listeners.len() != before
    }

    fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.lock().iter().filter(|(_, k, _)| *k == kind).count()
    }
}

/// Scoped listener registration
///
/// Every listener added through the guard is removed exactly once, when the
/// guard is dropped.
pub struct ListenerGuard {
    target: Arc<dyn EventTarget>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    pub fn new(target: Arc<dyn EventTarget>) -> Self {
        Self {
            target,
            ids: Vec::new(),
        }
    }

    pub fn listen(&mut self, kind: EventKind, listener: Listener) -> &mut Self {
        let id = self.target.add_listener(kind, listener);
        self.ids.push(id);
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            if !self.target.remove_listener(id) {
                tracing::warn!("Listener {:?} was already removed", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_listener(counter: Arc<AtomicUsize>, action: DefaultAction) -> Listener {
        Arc::new(move |_event: &DocumentEvent, _ctx: &EventContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            action
        })
    }

    #[test]
    fn test_dispatch_only_reaches_matching_kind() {
        let document = Document::new();
        let hits = Arc::new(AtomicUsize::new(0));
        document.add_listener(EventKind::Drop, counting_listener(hits.clone(), DefaultAction::Allow));

        document.dispatch(&DocumentEvent::MouseLeave);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        document.dispatch(&DocumentEvent::Drop {
            files: vec![],
            client_x: 0.0,
            client_y: 0.0,
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_any_prevent_wins() {
        let document = Document::new();
        let hits = Arc::new(AtomicUsize::new(0));
        document.add_listener(EventKind::DragOver, counting_listener(hits.clone(), DefaultAction::Allow));
        document.add_listener(EventKind::DragOver, counting_listener(hits.clone(), DefaultAction::Prevent));

        let action = document.dispatch(&DocumentEvent::DragOver {
            client_x: 1.0,
            client_y: 2.0,
        });
        assert_eq!(action, DefaultAction::Prevent);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listeners_see_root_as_current_target() {
        let document = Document::new();
        let child = document.create_node();
        assert_ne!(child, document.root());

        let seen = Arc::new(ParkingMutex::new(None));
        let seen_clone = seen.clone();
        document.add_listener(
            EventKind::DragLeave,
            Arc::new(move |event: &DocumentEvent, ctx: &EventContext| {
                if let DocumentEvent::DragLeave { target } = event {
                    *seen_clone.lock() = Some((*target, ctx.current_target));
                }
                DefaultAction::Allow
            }),
        );

        document.dispatch(&DocumentEvent::DragLeave { target: child });
        assert_eq!(*seen.lock(), Some((child, document.root())));
    }

    #[test]
    fn test_guard_removes_listeners_on_drop() {
        let document = Arc::new(Document::new());
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let mut guard = ListenerGuard::new(document.clone());
            guard
                .listen(EventKind::DragOver, counting_listener(hits.clone(), DefaultAction::Prevent))
                .listen(EventKind::Drop, counting_listener(hits.clone(), DefaultAction::Prevent));
            assert_eq!(guard.len(), 2);
            assert_eq!(document.total_listeners(), 2);
        }

        assert_eq!(document.total_listeners(), 0);
        let action = document.dispatch(&DocumentEvent::MouseLeave);
        assert_eq!(action, DefaultAction::Allow);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_unknown_listener() {
        let document = Document::new();
        let id = document.add_listener(EventKind::MouseLeave, Arc::new(|_: &DocumentEvent, _: &EventContext| DefaultAction::Allow));
        assert!(document.remove_listener(id));
        assert!(!document.remove_listener(id));
    }
}
