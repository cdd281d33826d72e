//! Cursor processing for drag feedback
//!
//! This module contains the exponential smoothing step and the live tracker
//! that runs it once per display refresh during a drag session.

pub mod cursor_smoothing;
pub mod tracker;

pub use cursor_smoothing::{CursorPosition, SmoothCursor, DEFAULT_SMOOTH_FACTOR};
pub use tracker::CursorTracker;
