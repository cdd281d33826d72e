//! Exponential cursor smoothing
//!
//! The rendered cursor closes a fixed fraction of the remaining distance to
//! the raw pointer position on every frame. There is no velocity state, so
//! the follow never overshoots.

use serde::{Deserialize, Serialize};

/// 2D point in client (viewport) pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

impl CursorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &CursorPosition) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Default fraction of the remaining distance closed per frame
pub const DEFAULT_SMOOTH_FACTOR: f64 = 0.1;

/// Raw target plus smoothed current position
#[derive(Debug, Clone)]
pub struct SmoothCursor {
    target: CursorPosition,
    current: CursorPosition,
    smooth_factor: f64,
}

impl SmoothCursor {
    /// Create a cursor at the origin
    ///
    /// `smooth_factor` is clamped into (0, 1]; a non-positive value would
    /// never converge.
    pub fn new(smooth_factor: f64) -> Self {
        let smooth_factor = if smooth_factor > 0.0 {
            smooth_factor.min(1.0)
        } else {
            DEFAULT_SMOOTH_FACTOR
        };
        Self {
            target: CursorPosition::default(),
            current: CursorPosition::default(),
            smooth_factor,
        }
    }

    /// Snap both target and current to `(x, y)`
    pub fn reset(&mut self, x: f64, y: f64) {
        self.target = CursorPosition::new(x, y);
        self.current = self.target;
    }

    /// Move the target only; the current position catches up on later steps
    pub fn set_target(&mut self, x: f64, y: f64) {
        self.target = CursorPosition::new(x, y);
    }

    /// Advance one frame: `current += (target - current) * smooth_factor`
    pub fn step(&mut self) -> CursorPosition {
        self.current.x += (self.target.x - self.current.x) * self.smooth_factor;
        self.current.y += (self.target.y - self.current.y) * self.smooth_factor;
        self.current
    }

    pub fn target(&self) -> CursorPosition {
        self.target
    }

    pub fn current(&self) -> CursorPosition {
        self.current
    }

    pub fn smooth_factor(&self) -> f64 {
        self.smooth_factor
    }

    /// Remaining distance between the rendered and raw positions
    pub fn offset(&self) -> f64 {
        self.current.distance_to(&self.target)
    }
}

impl Default for SmoothCursor {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTH_FACTOR)
    }
}
