//! Input event model.
//!
//! Hosts feed camviz one [`FrameInput`] per frame: the pointer position, the
//! window focus flag and the discrete events received since the last frame.
//! Any windowing library can produce it; [`WinitInput`] does so for winit.

mod control;
mod dispatcher;
mod winit;

pub use self::control::control;
pub use self::dispatcher::{Dispatcher, DragState, Flow, MotionType};
pub use self::winit::{map_key_code, map_mouse_button, WinitInput};

use std::collections::VecDeque;

use camviz_core::SpeedTier;
use glam::Vec2;

/// Pointer buttons, with wheel steps delivered as button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    WheelForward,
    WheelBackward,
}

/// Keys camviz reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Up,
    Down,
    Left,
    Right,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftShift,
    RightShift,
    Space,
    Return,
    PageUp,
    PageDown,
    /// Letter keys, lowercase.
    Char(char),
    /// Number row keys.
    Digit(u8),
}

/// A discrete input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonDown { button: MouseButton, position: Vec2 },
    ButtonUp { button: MouseButton },
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

/// Everything sampled for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in window pixels, origin at the top-left.
    pub pointer: Vec2,
    /// Whether the window currently has input focus.
    pub window_focused: bool,
    /// Discrete events in arrival order.
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    /// A focused frame with no events.
    #[must_use]
    pub fn at(pointer: Vec2) -> Self {
        Self {
            pointer,
            window_focused: true,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn unfocused(mut self) -> Self {
        self.window_focused = false;
        self
    }
}

/// Source of per-frame input.
pub trait InputSource {
    /// Returns the input gathered since the previous call.
    fn poll(&mut self) -> FrameInput;
}

/// Replays a fixed sequence of frames, then reports a quit.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<FrameInput>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> FrameInput {
        self.frames
            .pop_front()
            .unwrap_or_else(|| FrameInput::default().with_event(InputEvent::Quit))
    }
}

/// Keys currently held down, maintained from key events in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    held: Vec<Key>,
}

impl KeyState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the held set from one event. Non-key events are ignored.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => self.press(key),
            InputEvent::KeyUp(key) => self.release(key),
            _ => {}
        }
    }

    pub fn press(&mut self, key: Key) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.retain(|&k| k != key);
    }

    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Speed tier from the control keys; right control wins over left.
    #[must_use]
    pub fn tier(&self) -> SpeedTier {
        if self.is_down(Key::RightCtrl) {
            SpeedTier::Fast
        } else if self.is_down(Key::LeftCtrl) {
            SpeedTier::Slow
        } else {
            SpeedTier::Normal
        }
    }

    /// Wheel rolls the camera instead of moving it.
    #[must_use]
    pub fn roll_modifier(&self) -> bool {
        self.is_down(Key::RightAlt)
    }

    /// Faster 2D zoom.
    #[must_use]
    pub fn fast_zoom(&self) -> bool {
        self.is_down(Key::RightShift)
    }

    /// Faster 2D pan.
    #[must_use]
    pub fn fast_pan(&self) -> bool {
        self.is_down(Key::RightCtrl)
    }

    /// Releases everything. The dispatcher calls this while the window is
    /// unfocused, since key-ups sent elsewhere never reach it.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}
