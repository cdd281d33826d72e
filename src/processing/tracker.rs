//! Live cursor tracking for drag feedback
//!
//! `CursorTracker` owns a [`SmoothCursor`] and, while a drag session is
//! active, a per-frame task that advances it. The task re-arms itself only
//! while the tracking flag is set and is aborted synchronously by `stop`.

use crate::config::CursorConfig;
use crate::processing::cursor_smoothing::{CursorPosition, SmoothCursor};
use parking_lot::Mutex as ParkingMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct CursorTracker {
    cursor: Arc<ParkingMutex<SmoothCursor>>,
    is_tracking: Arc<AtomicBool>,
    frame_task: ParkingMutex<Option<JoinHandle<()>>>,
    frame_interval: Duration,
}

impl CursorTracker {
    pub fn new(config: &CursorConfig) -> Self {
        Self {
            cursor: Arc::new(ParkingMutex::new(SmoothCursor::new(config.smooth_factor))),
            is_tracking: Arc::new(AtomicBool::new(false)),
            frame_task: ParkingMutex::new(None),
            frame_interval: config.frame_interval(),
        }
    }

    /// Begin a session with both positions snapped to `(x, y)`
    pub fn start(&self, x: f64, y: f64) {
        self.cursor.lock().reset(x, y);

        if self.is_tracking.swap(true, Ordering::SeqCst) {
            return;
        }

        self.spawn_frame_loop();
        tracing::debug!("Cursor tracking started at ({}, {})", x, y);
    }

    /// Move the raw target; the rendered position follows on later frames
    pub fn update(&self, x: f64, y: f64) {
        self.cursor.lock().set_target(x, y);
    }

    /// End the session and cancel any pending frame
    pub fn stop(&self) {
        let was_tracking = self.is_tracking.swap(false, Ordering::SeqCst);

        if let Some(handle) = self.frame_task.lock().take() {
            handle.abort();
        }

        if was_tracking {
            tracing::debug!("Cursor tracking stopped");
        }
    }

    /// Advance one frame by hand
    ///
    /// For hosts that drive their own refresh instead of running the frame
    /// task. Does nothing while tracking is inactive.
    pub fn tick(&self) -> Option<CursorPosition> {
        if !self.is_tracking() {
            return None;
        }
        Some(self.cursor.lock().step())
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking.load(Ordering::SeqCst)
    }

    pub fn current_position(&self) -> CursorPosition {
        self.cursor.lock().current()
    }

    pub fn target_position(&self) -> CursorPosition {
        self.cursor.lock().target()
    }

    /// Whether a frame task is currently scheduled
    pub fn has_frame_loop(&self) -> bool {
        self.frame_task
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn spawn_frame_loop(&self) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime available; cursor frames must be driven with tick()");
                return;
            }
        };

        let cursor = self.cursor.clone();
        let is_tracking = self.is_tracking.clone();
        let frame_interval = self.frame_interval;

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; frames start one refresh later.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !is_tracking.load(Ordering::SeqCst) {
                    break;
                }
                cursor.lock().step();
            }
        });

        if let Some(previous) = self.frame_task.lock().replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for CursorTracker {
    fn drop(&mut self) {
        self.is_tracking.store(false, Ordering::SeqCst);
        if let Some(handle) = self.frame_task.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> CursorTracker {
        CursorTracker::new(&CursorConfig::default())
    }

    #[test]
    fn test_update_before_start_keeps_origin() {
        let tracker = tracker();
        tracker.update(250.0, 250.0);

        assert!(!tracker.is_tracking());
        assert_eq!(tracker.current_position(), CursorPosition::default());
        assert_eq!(tracker.tick(), None);
        assert_eq!(tracker.current_position(), CursorPosition::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_frame_rate_still_tracks() {
        let tracker = CursorTracker::new(&CursorConfig {
            smooth_factor: 0.1,
            frame_rate_hz: 0.0,
        });
        tracker.start(0.0, 0.0);
        assert!(tracker.has_frame_loop());

        tracker.update(100.0, 0.0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(tracker.current_position().x > 0.0);

        tracker.stop();
        assert!(!tracker.has_frame_loop());
    }

    #[test]
    fn test_start_without_runtime_uses_manual_ticks() {
        let tracker = tracker();
        tracker.start(10.0, 10.0);
        assert!(tracker.is_tracking());
        assert!(!tracker.has_frame_loop());

        tracker.update(110.0, 10.0);
        let pos = tracker.tick().unwrap();
        assert!((pos.x - 20.0).abs() < 1e-9);
        assert_eq!(pos.y, 10.0);

        tracker.stop();
        assert_eq!(tracker.tick(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_loop_follows_target() {
        let tracker = tracker();
        tracker.start(0.0, 0.0);
        assert_eq!(tracker.current_position(), CursorPosition::new(0.0, 0.0));
        assert!(tracker.has_frame_loop());

        tracker.update(100.0, 50.0);
        tokio::time::sleep(Duration::from_millis(500)).await;

        let pos = tracker.current_position();
        assert!(pos.x > 0.0 && pos.x < 100.0, "x = {}", pos.x);
        assert!(pos.y > 0.0 && pos.y < 50.0, "y = {}", pos.y);
        assert_eq!(tracker.target_position(), CursorPosition::new(100.0, 50.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_frame_loop() {
        let tracker = tracker();
        tracker.start(0.0, 0.0);
        tracker.update(1000.0, 1000.0);
        tokio::time::sleep(Duration::from_millis(100)).await;

        tracker.stop();
        assert!(!tracker.is_tracking());
        assert!(!tracker.has_frame_loop());

        let frozen = tracker.current_position();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(tracker.current_position(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_snaps_to_new_position() {
        let tracker = tracker();
        tracker.start(0.0, 0.0);
        tracker.update(500.0, 500.0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        tracker.stop();

        tracker.start(40.0, 60.0);
        assert_eq!(tracker.current_position(), CursorPosition::new(40.0, 60.0));
        assert_eq!(tracker.target_position(), CursorPosition::new(40.0, 60.0));
        assert!(tracker.has_frame_loop());
    }
}
