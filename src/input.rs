use iced::keyboard::{Key, key};
use iced::{Point, Size, mouse};

/// Keyboard shortcuts understood by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    ToggleAutoRotate,
    ForceAutoRotate,
}

pub(crate) fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Named(key::Named::Space) => Some(KeyAction::ToggleAutoRotate),
        Key::Named(key::Named::Escape) => Some(KeyAction::ForceAutoRotate),
        _ => None,
    }
}

/// Maps a viewport position to [-1, 1] on both axes, y pointing up.
pub(crate) fn normalize_pointer(position: Point, size: Size) -> (f32, f32) {
    if size.width <= 0.0 || size.height <= 0.0 {
        return (0.0, 0.0);
    }
    let x = (position.x / size.width) * 2.0 - 1.0;
    let y = 1.0 - (position.y / size.height) * 2.0;
    (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
}

/// Pointer bookkeeping kept between canvas events.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub(crate) is_right_mouse_pressed: bool,
    pub(crate) last_position: Option<Point>,
}

impl InputState {
    pub(crate) fn update_mouse_state(&mut self, button: mouse::Button, pressed: bool) {
        if button == mouse::Button::Right {
            self.is_right_mouse_pressed = pressed;
        }
    }
}
