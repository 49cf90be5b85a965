use std::collections::HashSet;

use sdl2::keyboard::Keycode;

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
}

/// Context provided to the update phase of a frame.
pub struct UpdateContext<'a> {
    pub keyboard: &'a KeyboardState,
    pub delta_time: f32,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new `UpdateContext` from the given keyboard state and delta time.
    pub fn new(keyboard: &'a KeyboardState, delta_time: f32) -> Self {
        Self {
            keyboard,
            delta_time,
        }
    }
}
