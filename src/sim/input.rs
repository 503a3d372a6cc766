//! Per-step input record and edge detection
//!
//! The simulation never reads devices. Adapters report key state to an
//! `InputTracker`, which turns it into one `TickInput` per fixed step.

use serde::{Deserialize, Serialize};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held: accelerate along the heading
    pub thrust: bool,
    /// Held: turn counter-clockwise
    pub rotate_left: bool,
    /// Held: turn clockwise
    pub rotate_right: bool,
    /// Edge: fire one bullet
    pub fire: bool,
    /// Edge: jump to a random position
    pub hyperspace: bool,
    /// Edge: toggle pause
    pub pause: bool,
}

impl TickInput {
    /// Rotation direction for this tick (-1, 0 or +1)
    pub fn rotation(&self) -> f64 {
        match (self.rotate_left, self.rotate_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Drop the one-shot edges after they were consumed
    pub fn clear_edges(&mut self) {
        self.fire = false;
        self.hyperspace = false;
        self.pause = false;
    }
}

/// Logical keys the core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Thrust,
    RotateLeft,
    RotateRight,
    Fire,
    Hyperspace,
    Pause,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct KeySet {
    thrust: bool,
    rotate_left: bool,
    rotate_right: bool,
    fire: bool,
    hyperspace: bool,
    pause: bool,
}

impl KeySet {
    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Thrust => &mut self.thrust,
            Key::RotateLeft => &mut self.rotate_left,
            Key::RotateRight => &mut self.rotate_right,
            Key::Fire => &mut self.fire,
            Key::Hyperspace => &mut self.hyperspace,
            Key::Pause => &mut self.pause,
        }
    }
}

/// Tracks held keys and derives "just pressed" edges.
///
/// Call `end_frame` once the frame's steps have consumed their snapshots;
/// until then a held key keeps reporting as freshly pressed.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: KeySet,
    previous: KeySet,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, down: bool) {
        *self.held.slot(key) = down;
    }

    pub fn press(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set_key(key, false);
    }

    /// Immutable input record for the next fixed step
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            thrust: self.held.thrust,
            rotate_left: self.held.rotate_left,
            rotate_right: self.held.rotate_right,
            fire: self.held.fire && !self.previous.fire,
            hyperspace: self.held.hyperspace && !self.previous.hyperspace,
            pause: self.held.pause && !self.previous.pause,
        }
    }

    /// Remember the current keys so the next snapshot can see new presses
    pub fn end_frame(&mut self) {
        self.previous = self.held;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_direction() {
        let mut input = TickInput::default();
        assert_eq!(input.rotation(), 0.0);
        input.rotate_left = true;
        assert_eq!(input.rotation(), -1.0);
        input.rotate_right = true;
        assert_eq!(input.rotation(), 0.0);
        input.rotate_left = false;
        assert_eq!(input.rotation(), 1.0);
    }

    #[test]
    fn test_edges_fire_once_per_press() {
        let mut tracker = InputTracker::new();
        tracker.press(Key::Fire);
        tracker.press(Key::Thrust);

        let first = tracker.snapshot();
        assert!(first.fire);
        assert!(first.thrust);
        tracker.end_frame();

        // Still held next frame: thrust continues, fire does not repeat
        let second = tracker.snapshot();
        assert!(!second.fire);
        assert!(second.thrust);
        tracker.end_frame();

        tracker.release(Key::Fire);
        tracker.end_frame();
        tracker.press(Key::Fire);
        assert!(tracker.snapshot().fire);
    }

    #[test]
    fn test_clear_edges_keeps_held_keys() {
        let mut input = TickInput {
            thrust: true,
            fire: true,
            pause: true,
            hyperspace: true,
            ..Default::default()
        };
        input.clear_edges();
        assert_eq!(
            input,
            TickInput {
                thrust: true,
                ..Default::default()
            }
        );
    }
}
