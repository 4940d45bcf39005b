//! Client input capture: directional keys become movement intents.

use macroquad::prelude::*;
use shared::Direction;
use std::time::{Duration, Instant};

/// Minimum spacing between repeated intents for a held key.
const REPEAT_INTERVAL: Duration = Duration::from_millis(16);

/// Samples the four movement keys and decides when an intent should go on
/// the wire. Any key outside the movement set is ignored without error.
pub struct InputManager {
    current: Option<Direction>,
    last_sent: Instant,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            current: None,
            last_sent: Instant::now(),
        }
    }

    /// Returns the direction to send, if any: on a fresh press immediately,
    /// and on the repeat cadence while the key stays held.
    pub fn update(&mut self) -> Option<Direction> {
        let held = Self::sample_keys();

        let changed = held != self.current;
        self.current = held;

        let due = self.last_sent.elapsed() >= REPEAT_INTERVAL;
        if held.is_some() && (changed || due) {
            self.last_sent = Instant::now();
            return held;
        }

        None
    }

    // WASD and arrow keys; first match wins when several are held
    fn sample_keys() -> Option<Direction> {
        if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
            Some(Direction::Up)
        } else if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
            Some(Direction::Down)
        } else if is_key_down(KeyCode::A) || is_key_down(KeyCode::Left) {
            Some(Direction::Left)
        } else if is_key_down(KeyCode::D) || is_key_down(KeyCode::Right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_manager_creation() {
        let manager = InputManager::new();
        assert_eq!(manager.current, None);
    }
}
