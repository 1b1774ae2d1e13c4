use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current cursor position (relative to window)
    cursor_position: Option<(f32, f32)>,
    /// Window size in physical pixels
    window_size: (f32, f32),
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            cursor_position: None,
            window_size: (width as f32, height as f32),
        }
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_button(button, event.state);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
            }
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused
                self.pressed_keys.clear();
            }
            _ => {}
        }
    }

    /// Track a new window size for look normalization
    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width as f32, height as f32);
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Button::MoveUp),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Button::MoveDown),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Button::MoveLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Button::MoveRight),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Turbo),
            KeyCode::KeyR => Some(Button::Recenter),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    /// Cursor offset from the window centre as a fraction of the window size
    fn look_delta(&self) -> (f32, f32) {
        let (width, height) = self.window_size;
        match self.cursor_position {
            Some((x, y)) if width > 0.0 && height > 0.0 => (x / width - 0.5, y / height - 0.5),
            _ => (0.0, 0.0),
        }
    }
}
