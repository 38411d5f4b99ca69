//! Per-band amplitude smoothing.
//!
//! Each noise band's amplitude is driven toward an externally requested
//! target by a fixed-gain PID update, one step per frame. The slight
//! overshoot-and-settle of the feedback form makes the terrain "breathe"
//! when targets jump instead of snapping to the new height.

use crate::params::ControllerGains;

/// Discrete-time PID controller producing a smoothed amplitude
#[derive(Debug, Clone)]
pub struct AmplitudeController {
    gains: ControllerGains,
    target: f64,
    value: f64,
    total_error: f64,
    last_error: f64,
}

impl AmplitudeController {
    /// Create a controller resting at `gains.initial_value` with a zero target
    pub fn new(gains: ControllerGains) -> Self {
        Self {
            gains,
            target: 0.0,
            value: gains.initial_value,
            total_error: 0.0,
            last_error: 0.0,
        }
    }

    /// Set the desired steady-state output; takes effect on the next `step()`
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current smoothed output
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Advance one frame.
    ///
    /// The integral term sees the error sum including this step's error, and
    /// the sum is decayed by `retention` afterwards. No clamping is applied:
    /// bounded targets are the caller's responsibility.
    pub fn step(&mut self) {
        let error = self.target - self.value;
        self.total_error += error;

        let p = self.gains.kp * error;
        let i = self.gains.ki * self.total_error;
        let d = self.gains.kd * (error - self.last_error);

        self.last_error = error;
        self.total_error *= self.gains.retention;
        self.value += p + i + d;
    }
}

/// Frequency band selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// Every band, lowest frequency first
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];
}

/// Target amplitudes for the three bands
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandTargets {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// The three independent band controllers stepped together every frame
#[derive(Debug, Clone)]
pub struct BandControllers {
    pub low: AmplitudeController,
    pub mid: AmplitudeController,
    pub high: AmplitudeController,
}

impl BandControllers {
    pub fn new(gains: ControllerGains) -> Self {
        Self {
            low: AmplitudeController::new(gains),
            mid: AmplitudeController::new(gains),
            high: AmplitudeController::new(gains),
        }
    }

    pub fn band(&self, band: Band) -> &AmplitudeController {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }

    pub fn set_targets(&mut self, targets: BandTargets) {
        self.low.set_target(targets.low);
        self.mid.set_target(targets.mid);
        self.high.set_target(targets.high);
    }

    pub fn step(&mut self) {
        self.low.step();
        self.mid.step();
        self.high.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(controller: &mut AmplitudeController, steps: usize) -> Vec<f64> {
        (0..steps)
            .map(|_| {
                controller.step();
                controller.value()
            })
            .collect()
    }

    #[test]
    fn test_set_target_has_no_immediate_effect() {
        let mut controller = AmplitudeController::new(ControllerGains::default());
        controller.set_target(5.0);
        assert_eq!(controller.value(), 0.0);
        assert_eq!(controller.target(), 5.0);
    }

    #[test]
    fn test_first_step_matches_gains() {
        let gains = ControllerGains::default();
        let mut controller = AmplitudeController::new(gains);
        controller.set_target(1.0);
        controller.step();

        // error = 1, integral sum = 1, derivative = 1 - 0
        let expected = gains.kp + gains.ki + gains.kd;
        assert!((controller.value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_converges_to_constant_target() {
        let mut controller = AmplitudeController::new(ControllerGains::default());
        controller.set_target(1.0);
        let trajectory = run(&mut controller, 300);

        assert!((controller.value() - 1.0).abs() < 1e-6);
        // Bounded on the way there
        assert!(trajectory.iter().all(|v| v.is_finite() && v.abs() < 2.0));
    }

    #[test]
    fn test_overshoots_before_settling() {
        let mut controller = AmplitudeController::new(ControllerGains::default());
        controller.set_target(1.0);
        let trajectory = run(&mut controller, 50);

        let peak = trajectory.iter().copied().fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "expected overshoot, peak was {peak}");
    }

    #[test]
    fn test_replay_is_deterministic() {
        let targets = [0.0, 2.5, 2.5, 0.3, 7.0, 1.0, 1.0, 0.0];
        let replay = || {
            let mut controller = AmplitudeController::new(ControllerGains::default());
            let mut out = Vec::new();
            for &target in &targets {
                controller.set_target(target);
                out.extend(run(&mut controller, 25));
            }
            out
        };

        let first = replay();
        let second = replay();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_retargeting_settles_again() {
        let mut controller = AmplitudeController::new(ControllerGains::default());
        controller.set_target(3.0);
        run(&mut controller, 200);
        controller.set_target(-0.5);
        run(&mut controller, 300);
        assert!((controller.value() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_band_controllers_are_independent() {
        let mut bands = BandControllers::new(ControllerGains::default());
        bands.set_targets(BandTargets {
            low: 1.0,
            mid: 0.0,
            high: -1.0,
        });
        bands.step();

        assert!(bands.band(Band::Low).value() > 0.0);
        assert_eq!(bands.band(Band::Mid).value(), 0.0);
        assert!(bands.band(Band::High).value() < 0.0);
        assert_eq!(bands.band(Band::High).target(), -1.0);
    }
}
