//! Externally set parameters shared between the embedding caller and the worker.
//!
//! The caller only ever writes small values (brightness, three targets, stop);
//! the worker reads a snapshot at the top of each frame. A write landing
//! mid-frame is simply picked up one frame later.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::controller::BandTargets;

/// Values the caller may change while the worker runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Base brightness passed through to the renderer
    pub brightness: f32,

    /// Requested band amplitudes
    pub targets: BandTargets,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<ControlState>,
    stop: AtomicBool,
}

/// Cloneable handle onto the shared control state
#[derive(Debug, Clone)]
pub struct Controls {
    shared: Arc<Shared>,
}

impl Controls {
    pub fn new(initial: ControlState) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(initial),
                stop: AtomicBool::new(false),
            }),
        }
    }

    pub fn set_brightness(&self, brightness: f32) {
        self.shared.state.lock().brightness = brightness;
    }

    /// Set the target amplitude of each band (low, mid, high frequency noise)
    pub fn set_mountain_height(&self, low: f64, mid: f64, high: f64) {
        self.shared.state.lock().targets = BandTargets { low, mid, high };
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> ControlState {
        *self.shared.state.lock()
    }

    /// Ask the worker to finish its current frame and exit
    pub fn request_stop(&self) {
        self.shared.stop.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.shared.stop.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> Controls {
        Controls::new(ControlState {
            brightness: 0.9,
            targets: BandTargets::default(),
        })
    }

    #[test]
    fn test_writes_visible_through_clones() {
        let controls = controls();
        let worker_view = controls.clone();

        controls.set_brightness(0.3);
        controls.set_mountain_height(1.0, 2.0, 3.0);

        let snapshot = worker_view.snapshot();
        assert_eq!(snapshot.brightness, 0.3);
        assert_eq!(
            snapshot.targets,
            BandTargets {
                low: 1.0,
                mid: 2.0,
                high: 3.0
            }
        );
    }

    #[test]
    fn test_stop_flag() {
        let controls = controls();
        assert!(!controls.stop_requested());
        controls.clone().request_stop();
        assert!(controls.stop_requested());
    }
}
