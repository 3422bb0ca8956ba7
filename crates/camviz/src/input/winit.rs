//! winit adapter.

use ::winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use ::winit::keyboard::{KeyCode, PhysicalKey};
use glam::Vec2;

use super::{FrameInput, InputEvent, InputSource, Key, MouseButton};

/// Maps a physical key code to a camviz key, if camviz uses it.
#[must_use]
pub fn map_key_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::Space => Key::Space,
        KeyCode::Enter => Key::Return,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::KeyA => Key::Char('a'),
        KeyCode::KeyB => Key::Char('b'),
        KeyCode::KeyC => Key::Char('c'),
        KeyCode::KeyD => Key::Char('d'),
        KeyCode::KeyE => Key::Char('e'),
        KeyCode::KeyF => Key::Char('f'),
        KeyCode::KeyG => Key::Char('g'),
        KeyCode::KeyH => Key::Char('h'),
        KeyCode::KeyI => Key::Char('i'),
        KeyCode::KeyJ => Key::Char('j'),
        KeyCode::KeyK => Key::Char('k'),
        KeyCode::KeyL => Key::Char('l'),
        KeyCode::KeyM => Key::Char('m'),
        KeyCode::KeyN => Key::Char('n'),
        KeyCode::KeyO => Key::Char('o'),
        KeyCode::KeyP => Key::Char('p'),
        KeyCode::KeyQ => Key::Char('q'),
        KeyCode::KeyR => Key::Char('r'),
        KeyCode::KeyS => Key::Char('s'),
        KeyCode::KeyT => Key::Char('t'),
        KeyCode::KeyU => Key::Char('u'),
        KeyCode::KeyV => Key::Char('v'),
        KeyCode::KeyW => Key::Char('w'),
        KeyCode::KeyX => Key::Char('x'),
        KeyCode::KeyY => Key::Char('y'),
        KeyCode::KeyZ => Key::Char('z'),
        KeyCode::Digit0 => Key::Digit(0),
        KeyCode::Digit1 => Key::Digit(1),
        KeyCode::Digit2 => Key::Digit(2),
        KeyCode::Digit3 => Key::Digit(3),
        KeyCode::Digit4 => Key::Digit(4),
        KeyCode::Digit5 => Key::Digit(5),
        KeyCode::Digit6 => Key::Digit(6),
        KeyCode::Digit7 => Key::Digit(7),
        KeyCode::Digit8 => Key::Digit(8),
        KeyCode::Digit9 => Key::Digit(9),
        _ => return None,
    };
    Some(key)
}

/// Maps a winit mouse button. Back/forward and extra buttons are ignored.
#[must_use]
pub fn map_mouse_button(button: ::winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        ::winit::event::MouseButton::Left => Some(MouseButton::Primary),
        ::winit::event::MouseButton::Right => Some(MouseButton::Secondary),
        ::winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Collects winit window events between frames.
///
/// Feed every [`WindowEvent`] to [`WinitInput::handle_window_event`], then call
/// [`InputSource::poll`] once per frame. Wheel steps arrive as a button press
/// immediately followed by its release.
#[derive(Debug, Clone)]
pub struct WinitInput {
    pointer: Vec2,
    focused: bool,
    pending: Vec<InputEvent>,
}

impl Default for WinitInput {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitInput {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pointer: Vec2::ZERO,
            focused: true,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Translates one window event. Returns whether it was used.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_mouse_button(*button) else {
                    return false;
                };
                self.button(button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.wheel(dy);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                let Some(key) = map_key_code(code) else {
                    return false;
                };
                self.key(key, event.state == ElementState::Pressed, event.repeat);
            }
            WindowEvent::Focused(focused) => self.focused = *focused,
            WindowEvent::CloseRequested => self.quit(),
            _ => return false,
        }
        true
    }

    pub fn cursor_moved(&mut self, position: Vec2) {
        self.pointer = position;
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pending.push(InputEvent::ButtonDown {
                button,
                position: self.pointer,
            });
        } else {
            self.pending.push(InputEvent::ButtonUp { button });
        }
    }

    /// One wheel step per call; positive `dy` scrolls forward.
    pub fn wheel(&mut self, dy: f32) {
        let button = if dy > 0.0 {
            MouseButton::WheelForward
        } else if dy < 0.0 {
            MouseButton::WheelBackward
        } else {
            return;
        };
        self.button(button, true);
        self.button(button, false);
    }

    /// Key auto-repeat is dropped; held keys are tracked from the first press.
    pub fn key(&mut self, key: Key, pressed: bool, repeat: bool) {
        match (pressed, repeat) {
            (true, false) => self.pending.push(InputEvent::KeyDown(key)),
            (false, _) => self.pending.push(InputEvent::KeyUp(key)),
            (true, true) => {}
        }
    }

    pub fn quit(&mut self) {
        self.pending.push(InputEvent::Quit);
    }
}

impl InputSource for WinitInput {
    fn poll(&mut self) -> FrameInput {
        FrameInput {
            pointer: self.pointer,
            window_focused: self.focused,
            events: std::mem::take(&mut self.pending),
        }
    }
}
