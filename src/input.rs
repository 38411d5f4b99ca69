//! Keyboard state collected from window events, read once per frame.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed.insert(key);
            }
            ElementState::Released => {
                self.pressed.remove(&key);
            }
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// +1 when only `positive` is held, -1 when only `negative` is, else 0
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        match (self.is_pressed(positive), self.is_pressed(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// Forget every held key (focus lost)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_pressed(KeyCode::KeyW));

        input.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_axis_cancels_out() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyR, ElementState::Pressed);
        assert_eq!(input.axis(KeyCode::KeyR, KeyCode::KeyF), 1.0);

        input.handle_key(KeyCode::KeyF, ElementState::Pressed);
        assert_eq!(input.axis(KeyCode::KeyR, KeyCode::KeyF), 0.0);

        input.clear();
        assert_eq!(input.axis(KeyCode::KeyR, KeyCode::KeyF), 0.0);
    }
}
