//! Frame pacing for the worker loop.
//!
//! Sleeps off whatever is left of the frame budget, then reports the full
//! time since the previous frame as the delta.

use std::thread;
use std::time::{Duration, Instant};

/// Blocking frame limiter
#[derive(Debug)]
pub struct FramePacer {
    /// Time budget per frame
    frame_budget: Duration,
    /// Start of the previous frame
    last_frame: Instant,
}

impl FramePacer {
    /// Create a pacer for `target_fps` frames per second
    pub fn new(target_fps: f32) -> Self {
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(0.001))),
            last_frame: Instant::now(),
        }
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Sleep until the frame budget is used up; returns the delta time in seconds
    pub fn wait_for_next_frame(&mut self) -> f32 {
        let pause = remaining(self.frame_budget, self.last_frame.elapsed());
        if !pause.is_zero() {
            thread::sleep(pause);
        }

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }
}

/// Budget left after `elapsed`, never negative
pub fn remaining(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}
