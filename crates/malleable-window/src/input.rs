//! Translation of winit input into canvas events.
//!
//! Positions are converted to logical pixels. Wheel deltas follow the DOM
//! convention where a positive `delta_y` means the user scrolled down.

use malleable_canvas::{
    KeyCode, KeyEvent, Modifiers, MouseButton, Point, PointerEvent, WheelEvent,
};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Logical pixels scrolled per wheel line.
pub const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(Point),
    PointerUp(Point),
    Wheel(WheelEvent),
    Key(KeyEvent),
}

#[derive(Debug, Clone)]
pub struct InputTranslator {
    cursor: Point,
    modifiers: Modifiers,
    scale_factor: f64,
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl InputTranslator {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            cursor: Point::default(),
            modifiers: Modifiers::default(),
            scale_factor,
        }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = Point::new(position.x / self.scale_factor, position.y / self.scale_factor);
        InputEvent::PointerMove(self.cursor)
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            cmd: state.super_key(),
        };
    }

    pub fn mouse_input(&self, state: ElementState, button: WinitButton) -> Option<InputEvent> {
        let button = match button {
            WinitButton::Left => MouseButton::Left,
            WinitButton::Right => MouseButton::Right,
            WinitButton::Middle => MouseButton::Middle,
            _ => return None,
        };
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown(PointerEvent {
                position: self.cursor,
                button,
            }),
            ElementState::Released if button == MouseButton::Left => {
                InputEvent::PointerUp(self.cursor)
            }
            ElementState::Released => return None,
        })
    }

    pub fn mouse_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let (dx, dy) = match delta {
            MouseScrollDelta::LineDelta(x, y) => {
                (x as f64 * PIXELS_PER_LINE, y as f64 * PIXELS_PER_LINE)
            }
            MouseScrollDelta::PixelDelta(p) => (p.x / self.scale_factor, p.y / self.scale_factor),
        };
        InputEvent::Wheel(WheelEvent {
            position: self.cursor,
            delta_x: -dx,
            delta_y: -dy,
            modifiers: self.modifiers,
        })
    }

    /// Key presses only; releases are not routed.
    pub fn key(&self, key: &Key, state: ElementState) -> Option<InputEvent> {
        if state != ElementState::Pressed {
            return None;
        }
        let key = match key {
            Key::Named(NamedKey::Escape) => KeyCode::Escape,
            Key::Named(NamedKey::Enter) => KeyCode::Enter,
            Key::Named(NamedKey::Backspace) => KeyCode::Backspace,
            Key::Named(NamedKey::Space) => KeyCode::Char(' '),
            Key::Character(s) => s.chars().next().map_or(KeyCode::Other, KeyCode::Char),
            _ => KeyCode::Other,
        };
        Some(InputEvent::Key(KeyEvent {
            key,
            modifiers: self.modifiers,
        }))
    }
}
