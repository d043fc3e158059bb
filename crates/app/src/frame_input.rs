//! Keyboard state collection for one rendered frame.

use macroquad::prelude::{KeyCode, is_key_down, is_key_pressed};

const PRESS_KEYS: [KeyCode; 15] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::S,
    KeyCode::I,
    KeyCode::F,
    KeyCode::P,
    KeyCode::T,
    KeyCode::J,
    KeyCode::E,
    KeyCode::A,
    KeyCode::Escape,
    KeyCode::Space,
    KeyCode::R,
];

const HOLD_KEYS: [KeyCode; 6] = [
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Space,
    KeyCode::LeftShift,
];

#[derive(Default)]
pub struct KeyFrame {
    pub pressed: Vec<KeyCode>,
    pub down: Vec<KeyCode>,
}

pub fn capture_key_frame() -> KeyFrame {
    KeyFrame {
        pressed: PRESS_KEYS.into_iter().filter(|key| is_key_pressed(*key)).collect(),
        down: HOLD_KEYS.into_iter().filter(|key| is_key_down(*key)).collect(),
    }
}
