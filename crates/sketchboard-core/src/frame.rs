//! Render boundary: a read-only view of the board for one frame.

use crate::elements::{Element, ElementId};
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Rect, Vec2};
use serde::Serialize;

/// An element paired with its selection state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameElement {
    pub element: Element,
    pub selected: bool,
}

/// Everything the view layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Elements in paint order.
    pub elements: Vec<FrameElement>,
    pub viewport: Viewport,
    /// Visible board region.
    pub view_box: Rect,
    /// Background grid offset in screen pixels.
    pub grid_position: Vec2,
    /// In-progress marquee selection, in board coordinates.
    pub marquee: Option<Rect>,
    pub tool: ToolKind,
    /// Element whose text overlay is open.
    pub text_editor: Option<ElementId>,
    pub undo_is_possible: bool,
    pub redo_is_possible: bool,
}

impl RenderFrame {
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.element.id())
            .collect()
    }

    pub fn element(&self, id: ElementId) -> Option<&FrameElement> {
        self.elements.iter().find(|e| e.element.id() == id)
    }
}
