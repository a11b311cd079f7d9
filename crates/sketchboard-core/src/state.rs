//! Board state passed to every operation and drag handler.

use crate::elements::{Element, ElementId};
use crate::error::{BoardResult, PatchApplyError};
use crate::store::{ElementStore, SelectionStore};
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transient pointer-gesture state. Never part of a history snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionSession {
    pub dragging: bool,
    /// Screen position where the current drag started.
    pub drag_start: Point,
    /// Marquee rectangle (board coordinates) of an in-progress multi-select.
    pub marquee: Option<Rect>,
}

/// The diffable part of the board: elements plus their selection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedSnapshot {
    pub elements: ElementStore,
    pub selection_state: SelectionStore,
}

impl CombinedSnapshot {
    /// Serialize into the tree the diff engine works on.
    pub fn to_value(&self) -> BoardResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a snapshot from a patched tree.
    pub fn from_value(value: Value) -> Result<Self, PatchApplyError> {
        serde_json::from_value(value).map_err(|e| PatchApplyError::Malformed(e.to_string()))
    }
}

/// Everything an operation or drag handler can observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    pub elements: ElementStore,
    pub selection: SelectionStore,
    pub viewport: Viewport,
    pub tool: ToolKind,
    pub session: InteractionSession,
    /// Element the active gesture operates on.
    pub current_element: Option<ElementId>,
    /// Copy of the element whose text is being edited.
    pub text_editor: Option<Element>,
}

impl BoardState {
    /// Create an empty board state with the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Owned copy of the diffable part of the state.
    pub fn snapshot(&self) -> CombinedSnapshot {
        CombinedSnapshot {
            elements: self.elements.clone(),
            selection_state: self.selection.clone(),
        }
    }

    pub fn snapshot_value(&self) -> BoardResult<Value> {
        self.snapshot().to_value()
    }

    /// Replace the diffable part of the state.
    pub fn restore(&mut self, snapshot: CombinedSnapshot) {
        self.elements = snapshot.elements;
        self.selection = snapshot.selection_state;
        if let Some(id) = self.current_element {
            if !self.elements.contains(id) {
                self.current_element = None;
            }
        }
    }
}
