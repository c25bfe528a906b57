use std::collections::HashSet;
use std::sync::Arc;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use super::controller::{Button, Controller};

/// Adapter that bridges Winit events to the Controller trait
///
/// Holds the window so cursor warps and visibility changes requested through
/// the trait reach the windowing system.
pub struct WinitController {
    window: Arc<Window>,
    /// Currently pressed logical buttons
    pressed: HashSet<Button>,
    /// Current cursor position (physical pixels, relative to window)
    cursor_position: Option<(f32, f32)>,
}

impl WinitController {
    /// Create a new WinitController with no pressed buttons
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pressed: HashSet::new(),
            cursor_position: None,
        }
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        match event.state {
                            ElementState::Pressed => {
                                self.pressed.insert(button);
                            }
                            ElementState::Released => {
                                self.pressed.remove(&button);
                            }
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    match state {
                        ElementState::Pressed => {
                            self.pressed.insert(btn);
                        }
                        ElementState::Released => {
                            self.pressed.remove(&btn);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Some((position.x as f32, position.y as f32));
            }
            _ => {}
        }
    }

    /// Map Winit KeyCode to a logical Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::Forward),
            KeyCode::KeyS => Some(Button::Backward),
            KeyCode::KeyA => Some(Button::Left),
            KeyCode::KeyD => Some(Button::Right),
            KeyCode::Space => Some(Button::Ascend),
            KeyCode::ControlLeft => Some(Button::Descend),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Boost),
            KeyCode::Digit1 => Some(Button::SelectFirstPerson),
            KeyCode::Digit2 => Some(Button::SelectThirdPerson),
            KeyCode::Digit3 => Some(Button::SelectOrbital),
            KeyCode::ArrowLeft => Some(Button::SpotYawLeft),
            KeyCode::ArrowRight => Some(Button::SpotYawRight),
            KeyCode::ArrowUp => Some(Button::SpotPitchUp),
            KeyCode::ArrowDown => Some(Button::SpotPitchDown),
            KeyCode::Escape => Some(Button::Quit),
            _ => None,
        }
    }

    /// Map Winit MouseButton to a logical Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::Orbit),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn cursor_position(&self) -> Option<(f32, f32)> {
        self.cursor_position
    }

    fn set_cursor_position(&mut self, x: f32, y: f32) {
        // Some platforms (notably Wayland) refuse cursor warps; the orbital
        // camera degrades to absolute-position dragging in that case.
        if let Err(e) = self
            .window
            .set_cursor_position(PhysicalPosition::new(f64::from(x), f64::from(y)))
        {
            log::debug!("cursor warp unavailable: {e}");
            return;
        }
        // The matching CursorMoved event arrives later; update the cache now
        // so same-frame reads observe the warped position.
        self.cursor_position = Some((x, y));
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }
}
