//! Tool system for the board.
//!
//! A tool is a [`ToolKind`] plus the [`DragHandlers`] it installs into the
//! board's drag pipeline. Tools without a move handler fall back to panning
//! when the active tool is [`ToolKind::Pan`].

mod draw;
mod resize;
mod select;

pub use resize::resize_handlers;

use crate::elements::{ElementKind, TextDefaults};
use crate::input::PointerEvent;
use crate::state::BoardState;
use crate::update::BoardUpdate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hit tolerance around elements, in screen pixels.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pan,
    Select,
    Rect,
    Text,
    PostitSquare,
    Circle,
}

impl ToolKind {
    /// Element kind drawn by this tool, if it is a drawing tool.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            ToolKind::Rect => Some(ElementKind::Rect),
            ToolKind::Text => Some(ElementKind::Text),
            ToolKind::PostitSquare => Some(ElementKind::PostitSquare),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Pan | ToolKind::Select => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pan => "pan",
            ToolKind::Select => "select",
            ToolKind::Rect => "rect",
            ToolKind::Text => "text",
            ToolKind::PostitSquare => "postit_square",
            ToolKind::Circle => "circle",
        }
    }

    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Pan,
            ToolKind::Select,
            ToolKind::Rect,
            ToolKind::Text,
            ToolKind::PostitSquare,
            ToolKind::Circle,
        ]
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::all()
            .iter()
            .copied()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| format!("Unknown tool: {s}"))
    }
}

/// A drag handler: a pure function of the event and the board state that
/// returns the partial state to apply.
pub type DragHandlerFn = Arc<dyn Fn(&PointerEvent, &BoardState) -> BoardUpdate + Send + Sync>;

/// The three handler slots a tool may fill.
#[derive(Clone, Default)]
pub struct DragHandlers {
    pub on_start: Option<DragHandlerFn>,
    pub on_move: Option<DragHandlerFn>,
    pub on_end: Option<DragHandlerFn>,
}

impl DragHandlers {
    /// No handlers installed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PointerEvent, &BoardState) -> BoardUpdate + Send + Sync + 'static,
    {
        self.on_start = Some(Arc::new(handler));
        self
    }

    pub fn on_move<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PointerEvent, &BoardState) -> BoardUpdate + Send + Sync + 'static,
    {
        self.on_move = Some(Arc::new(handler));
        self
    }

    pub fn on_end<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PointerEvent, &BoardState) -> BoardUpdate + Send + Sync + 'static,
    {
        self.on_end = Some(Arc::new(handler));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_start.is_none() && self.on_move.is_none() && self.on_end.is_none()
    }
}

impl fmt::Debug for DragHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragHandlers")
            .field("on_start", &self.on_start.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

/// Settings the built-in tools create elements with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolDefaults {
    pub text: TextDefaults,
    /// Side length of an element created by a click without drag,
    /// in unscaled units.
    pub element_size: f64,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            text: TextDefaults::default(),
            element_size: 200.0,
        }
    }
}

/// Built-in handlers for a tool.
pub fn handlers_for(tool: ToolKind, defaults: ToolDefaults) -> DragHandlers {
    match (tool, tool.element_kind()) {
        (ToolKind::Select, _) => select::select_handlers(),
        (_, Some(kind)) => draw::draw_handlers(kind, defaults),
        _ => DragHandlers::new(),
    }
}
