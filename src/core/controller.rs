use serde::{Deserialize, Serialize};

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Turbo,
    Recenter,
    Escape,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Analog look input, normalized to roughly [-0.5, 0.5] on each axis
    fn look_delta(&self) -> (f32, f32);
}

/// What the camera reads from input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_turbo: bool,
    pub look_delta_x: f32,
    pub look_delta_y: f32,
}

impl InputSnapshot {
    /// Sample the controller state for the current frame
    pub fn capture<C: Controller + ?Sized>(controller: &C) -> Self {
        let (look_delta_x, look_delta_y) = controller.look_delta();

        Self {
            move_up: controller.is_down(Button::MoveUp),
            move_down: controller.is_down(Button::MoveDown),
            move_left: controller.is_down(Button::MoveLeft),
            move_right: controller.is_down(Button::MoveRight),
            move_turbo: controller.is_down(Button::Turbo),
            look_delta_x,
            look_delta_y,
        }
    }

    /// True when a key is held on both the drag and the turn axis
    pub const fn is_diagonal(&self) -> bool {
        (self.move_up || self.move_down) && (self.move_left || self.move_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = vec![
            Button::MoveUp,
            Button::MoveDown,
            Button::MoveLeft,
            Button::MoveRight,
            Button::Turbo,
            Button::Recenter,
            Button::Escape,
        ];

        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 7);
    }

    // Test mock controller implementation
    struct MockController {
        pressed: Vec<Button>,
        look: (f32, f32),
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn look_delta(&self) -> (f32, f32) {
            self.look
        }
    }

    #[test]
    fn test_capture_reads_buttons_and_look() {
        let controller = MockController {
            pressed: vec![Button::MoveUp, Button::Turbo],
            look: (0.25, -0.125),
        };

        let snapshot = InputSnapshot::capture(&controller);
        assert!(snapshot.move_up);
        assert!(snapshot.move_turbo);
        assert!(!snapshot.move_down);
        assert!(!snapshot.move_left);
        assert!(!snapshot.move_right);
        assert_eq!(snapshot.look_delta_x, 0.25);
        assert_eq!(snapshot.look_delta_y, -0.125);
    }

    #[test]
    fn test_capture_ignores_non_movement_buttons() {
        let controller = MockController {
            pressed: vec![Button::Recenter, Button::Escape],
            look: (0.0, 0.0),
        };

        assert_eq!(InputSnapshot::capture(&controller), InputSnapshot::default());
    }

    #[test]
    fn test_diagonal_detection() {
        let up_left = InputSnapshot {
            move_up: true,
            move_left: true,
            ..Default::default()
        };
        let down_right = InputSnapshot {
            move_down: true,
            move_right: true,
            ..Default::default()
        };
        let strafe = InputSnapshot {
            move_left: true,
            move_right: true,
            ..Default::default()
        };

        assert!(up_left.is_diagonal());
        assert!(down_right.is_diagonal());
        assert!(!strafe.is_diagonal());
        assert!(!InputSnapshot::default().is_diagonal());
    }

    #[test]
    fn test_snapshot_deserializes_partial_json() {
        let snapshot: InputSnapshot =
            serde_json::from_str(r#"{"move_left": true, "look_delta_x": 0.1}"#).unwrap();
        assert!(snapshot.move_left);
        assert!(!snapshot.move_up);
        assert_eq!(snapshot.look_delta_x, 0.1);
        assert_eq!(snapshot.look_delta_y, 0.0);
    }
}
