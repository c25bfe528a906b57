/// Logical input action identifier
///
/// Actions, not physical keys: the camera and app code query these and the
/// input adapter decides which physical key or mouse button maps to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Forward,
    Backward,
    Left,
    Right,
    Ascend,
    Descend,
    /// Speed modifier for first-person movement
    Boost,
    SelectFirstPerson,
    SelectThirdPerson,
    SelectOrbital,
    SpotYawLeft,
    SpotYawRight,
    SpotPitchUp,
    SpotPitchDown,
    /// Primary mouse button, drives orbital dragging
    Orbit,
    Quit,
}

/// Controller - polled input-device state consumed once per frame
///
/// Covers discrete action-down queries plus the mouse cursor surface the
/// orbital camera needs (position get/set, visibility set). Cursor positions
/// are in physical window pixels.
pub trait Controller {
    /// Check if the action's button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Current cursor position, if the cursor has entered the window
    fn cursor_position(&self) -> Option<(f32, f32)>;

    /// Warp the cursor to a window position
    fn set_cursor_position(&mut self, x: f32, y: f32);

    /// Show or hide the cursor
    fn set_cursor_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_equality() {
        assert_eq!(Button::Forward, Button::Forward);
        assert_eq!(Button::Orbit, Button::Orbit);
        assert_ne!(Button::Forward, Button::Backward);
    }

    #[test]
    fn test_button_hash() {
        let mut set = HashSet::new();
        set.insert(Button::Forward);
        set.insert(Button::Boost);
        set.insert(Button::Orbit);

        assert!(set.contains(&Button::Forward));
        assert!(set.contains(&Button::Orbit));
        assert!(!set.contains(&Button::Backward));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_button_hash_duplicates() {
        let mut set = HashSet::new();
        set.insert(Button::Forward);
        set.insert(Button::Forward);

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = vec![
            Button::Forward,
            Button::Backward,
            Button::Left,
            Button::Right,
            Button::Ascend,
            Button::Descend,
            Button::Boost,
            Button::SelectFirstPerson,
            Button::SelectThirdPerson,
            Button::SelectOrbital,
            Button::SpotYawLeft,
            Button::SpotYawRight,
            Button::SpotPitchUp,
            Button::SpotPitchDown,
            Button::Orbit,
            Button::Quit,
        ];

        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 16);
    }
}
