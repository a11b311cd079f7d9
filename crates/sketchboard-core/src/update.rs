//! Partial board state returned by drag handlers.

use crate::elements::ElementId;
use crate::state::BoardState;
use crate::store::{ElementStore, SelectionStore};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

/// A partial state update. `None` fields leave the board untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardUpdate {
    pub viewport: Option<Viewport>,
    pub elements: Option<ElementStore>,
    pub selection: Option<SelectionStore>,
    pub current_element: Option<Option<ElementId>>,
    pub dragging: Option<bool>,
    pub drag_start: Option<Point>,
    pub marquee: Option<Option<Rect>>,
}

impl BoardUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_elements(mut self, elements: ElementStore) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn with_selection(mut self, selection: SelectionStore) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_current_element(mut self, id: Option<ElementId>) -> Self {
        self.current_element = Some(id);
        self
    }

    pub fn with_dragging(mut self, dragging: bool) -> Self {
        self.dragging = Some(dragging);
        self
    }

    pub fn with_drag_start(mut self, drag_start: Point) -> Self {
        self.drag_start = Some(drag_start);
        self
    }

    pub fn with_marquee(mut self, marquee: Option<Rect>) -> Self {
        self.marquee = Some(marquee);
        self
    }

    /// True if applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if the update touches elements or selection.
    pub fn touches_snapshot(&self) -> bool {
        self.elements.is_some() || self.selection.is_some()
    }

    /// Merge `other` over `self`; fields set in `other` win.
    pub fn merge(self, other: BoardUpdate) -> BoardUpdate {
        BoardUpdate {
            viewport: other.viewport.or(self.viewport),
            elements: other.elements.or(self.elements),
            selection: other.selection.or(self.selection),
            current_element: other.current_element.or(self.current_element),
            dragging: other.dragging.or(self.dragging),
            drag_start: other.drag_start.or(self.drag_start),
            marquee: other.marquee.or(self.marquee),
        }
    }

    /// Write every set field into `state`.
    pub fn apply_to(self, state: &mut BoardState) {
        if let Some(viewport) = self.viewport {
            state.viewport = viewport;
        }
        if let Some(elements) = self.elements {
            state.elements = elements;
        }
        if let Some(selection) = self.selection {
            state.selection = selection;
        }
        if let Some(current_element) = self.current_element {
            state.current_element = current_element;
        }
        if let Some(dragging) = self.dragging {
            state.session.dragging = dragging;
        }
        if let Some(drag_start) = self.drag_start {
            state.session.drag_start = drag_start;
        }
        if let Some(marquee) = self.marquee {
            state.session.marquee = marquee;
        }
        state.selection.reconcile(&state.elements);
    }
}
