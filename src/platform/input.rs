//! Keyboard state to movement axis

use crate::sim::InputAxis;

/// One-shot commands triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePause,
    Restart,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyA" | "ArrowLeft" => Some(Direction::Left),
            "KeyD" | "ArrowRight" => Some(Direction::Right),
            "KeyW" | "ArrowUp" => Some(Direction::Up),
            "KeyS" | "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Held direction keys, by physical key code
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: [bool; 4],
}

impl KeyState {
    /// Record a key press; returns a command for non-repeating control keys
    pub fn key_down(&mut self, code: &str, repeat: bool) -> Option<KeyCommand> {
        if let Some(dir) = Direction::from_code(code) {
            self.held[dir as usize] = true;
            return None;
        }
        if repeat {
            return None;
        }
        match code {
            "Escape" => Some(KeyCommand::TogglePause),
            "KeyR" => Some(KeyCommand::Restart),
            _ => None,
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(dir) = Direction::from_code(code) {
            self.held[dir as usize] = false;
        }
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        self.held = [false; 4];
    }

    pub fn axis(&self) -> InputAxis {
        let [left, right, up, down] = self.held;
        InputAxis::from_keys(left, right, up, down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_share_directions() {
        let mut keys = KeyState::default();
        keys.key_down("KeyD", false);
        assert_eq!(keys.axis(), InputAxis::new(1.0, 0.0));
        keys.key_down("ArrowLeft", false);
        assert!(keys.axis().is_zero());
        keys.key_up("KeyD");
        assert_eq!(keys.axis(), InputAxis::new(-1.0, 0.0));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut keys = KeyState::default();
        keys.key_down("KeyW", false);
        keys.key_down("KeyA", false);
        let a = keys.axis();
        assert!((a.as_vec2().length() - 1.0).abs() < 1e-6);
        keys.clear();
        assert!(keys.axis().is_zero());
    }

    #[test]
    fn test_commands_ignore_repeats() {
        let mut keys = KeyState::default();
        assert_eq!(keys.key_down("Escape", false), Some(KeyCommand::TogglePause));
        assert_eq!(keys.key_down("Escape", true), None);
        assert_eq!(keys.key_down("KeyR", false), Some(KeyCommand::Restart));
        assert_eq!(keys.key_down("KeyS", false), None);
    }
}
