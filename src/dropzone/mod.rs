//! Drag-and-drop file intake
//!
//! Document-level drag listeners, the drop zone state machine and the
//! geometry of the drop indicator drawn under the smoothed cursor.

pub mod controller;
pub mod events;
pub mod indicator;

pub use controller::{DragPhase, DropZone, FileAcceptedCallback};
pub use events::{
    DefaultAction, Document, DocumentEvent, EventContext, EventKind, EventTarget, Listener,
    ListenerGuard, ListenerId, NodeId,
};
pub use indicator::{IndicatorGeometry, IndicatorPlacement};
