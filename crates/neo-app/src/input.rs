//! Mouse and keyboard mapping.
//!
//! [`PointerTracker`] turns raw winit mouse events into viewport
//! [`Gesture`]s: left drag orbits, right (or middle) drag pans, the wheel
//! zooms. [`action_for_key`] maps keys to control commands.

use glam::Vec2;
use neo_orbit::{ControlCommand, Gesture, KindFilter};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
    rotating: bool,
    panning: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. Returns the drag gesture, if any.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<Gesture> {
        let new_pos = Vec2::new(x as f32, y as f32);
        let delta = self.position.map(|old| new_pos - old);
        self.position = Some(new_pos);

        let d = delta.filter(|d| *d != Vec2::ZERO)?;
        if self.rotating {
            Some(Gesture::Rotate { dx: d.x, dy: d.y })
        } else if self.panning {
            Some(Gesture::Pan { dx: d.x, dy: d.y })
        } else {
            None
        }
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process a `MouseWheel` event. Positive lines zoom in.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) -> Option<Gesture> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        (lines != 0.0).then_some(Gesture::Zoom { lines })
    }

    /// Forget the cursor so re-entry does not produce a jump.
    pub fn on_cursor_left(&mut self) {
        self.position = None;
        self.rotating = false;
        self.panning = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }
}

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    Control(ControlCommand),
    ResetCamera,
}

pub fn action_for_key(key: KeyCode) -> Option<KeyAction> {
    let command = match key {
        KeyCode::Space => ControlCommand::TogglePause,
        KeyCode::KeyR => ControlCommand::ResetSpeed,
        KeyCode::ArrowUp | KeyCode::Equal => ControlCommand::NextPreset,
        KeyCode::ArrowDown | KeyCode::Minus => ControlCommand::PrevPreset,
        KeyCode::KeyN => ControlCommand::Reverse,
        KeyCode::Digit1 => ControlCommand::SetFilter(KindFilter::All),
        KeyCode::Digit2 => ControlCommand::SetFilter(KindFilter::Asteroid),
        KeyCode::Digit3 => ControlCommand::SetFilter(KindFilter::Comet),
        KeyCode::Backspace => ControlCommand::ResetTime,
        KeyCode::KeyC => return Some(KeyAction::ResetCamera),
        _ => return None,
    };
    Some(KeyAction::Control(command))
}
