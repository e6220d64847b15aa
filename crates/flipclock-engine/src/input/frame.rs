use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Input deltas since the last frame.
///
/// [`InputState`](super::InputState) holds what is currently down; this
/// holds what changed.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// True if anything in this frame counts as user activity.
    pub fn has_activity(&self) -> bool {
        self.events.iter().any(InputEvent::is_activity)
    }
}
