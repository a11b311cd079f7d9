//! Input events delivered by the host event loop.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Shift, Ctrl or Cmd extend the selection instead of replacing it.
    pub fn is_multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Platform command modifier (Ctrl, or Cmd on macOS).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer-down, move or up event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Movement since the previous pointer event, in screen pixels.
    #[serde(default)]
    pub movement: Vec2,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Left-button event at a screen position.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            movement: Vec2::ZERO,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.movement.is_finite()
    }
}

/// A scroll-wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Cursor position in screen coordinates.
    pub position: Point,
    /// Scroll delta; only the sign of `y` is used for zooming.
    pub delta: Vec2,
}

impl WheelEvent {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.delta.is_finite()
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Unified input event routed by the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
}
