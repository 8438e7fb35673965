use bevy::prelude::*;

use crate::{
    cursor::Viewport,
    frame::{Key, WindowInput},
};

pub const CLOSE_KEY: KeyCode = KeyCode::Escape;

pub fn key_code(key: Key) -> KeyCode {
    match key {
        Key::PitchForward => KeyCode::KeyW,
        Key::PitchBack => KeyCode::KeyS,
        Key::YawLeft => KeyCode::KeyA,
        Key::YawRight => KeyCode::KeyD,
        Key::ZoomIn => KeyCode::KeyR,
        Key::ZoomOut => KeyCode::KeyF,
        Key::PlacePositive => KeyCode::KeyP,
        Key::PlaceNegative => KeyCode::KeyN,
    }
}

/// One frame's view of bevy's keyboard, primary window and clock.
pub struct BevyWindowInput<'a> {
    pub keys: &'a ButtonInput<KeyCode>,
    /// `None` once the primary window has been closed.
    pub window: Option<&'a Window>,
    pub elapsed: f64,
    close_requested: bool,
}

impl<'a> BevyWindowInput<'a> {
    pub fn new(keys: &'a ButtonInput<KeyCode>, window: Option<&'a Window>, elapsed: f64) -> Self {
        BevyWindowInput {
            keys,
            window,
            elapsed,
            close_requested: false,
        }
    }
}

impl WindowInput for BevyWindowInput<'_> {
    // Bevy has already pumped the event loop before systems run.
    fn poll_events(&mut self) {
        self.close_requested = self.window.is_none() || self.keys.just_pressed(CLOSE_KEY);
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keys.pressed(key_code(key))
    }

    fn cursor_position(&self) -> Option<(f64, f64)> {
        self.window
            .and_then(|w| w.cursor_position())
            .map(|c| (c.x as f64, c.y as f64))
    }

    fn viewport(&self) -> Viewport {
        let (width, height) = self
            .window
            .map_or((0.0, 0.0), |w| (w.width() as f64, w.height() as f64));
        Viewport {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_onto_bindings() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyN);
        let input = BevyWindowInput::new(&keys, None, 0.0);
        assert!(input.is_key_down(Key::PitchForward));
        assert!(input.is_key_down(Key::PlaceNegative));
        assert!(!input.is_key_down(Key::PlacePositive));
        assert!(!input.is_key_down(Key::ZoomIn));
    }

    #[test]
    fn escape_requests_close() {
        let mut keys = ButtonInput::<KeyCode>::default();
        let window = Window::default();
        let mut input = BevyWindowInput::new(&keys, Some(&window), 1.0);
        input.poll_events();
        assert!(!input.should_close());

        keys.press(CLOSE_KEY);
        let mut input = BevyWindowInput::new(&keys, Some(&window), 1.0);
        input.poll_events();
        assert!(input.should_close());
    }

    #[test]
    fn missing_window_closes_with_empty_viewport() {
        let keys = ButtonInput::<KeyCode>::default();
        let mut input = BevyWindowInput::new(&keys, None, 2.5);
        input.poll_events();
        assert!(input.should_close());
        assert_eq!(input.cursor_position(), None);
        assert_eq!(input.viewport().width, 0.0);
        assert_eq!(input.elapsed_time(), 2.5);
    }
}
