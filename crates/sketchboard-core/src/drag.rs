//! Three-phase pointer drag pipeline.
//!
//! Each phase is a pure function of the installed [`DragHandlers`], the
//! event and the board state, returning the partial state to commit. The
//! pipeline only routes events and decides merge precedence; what a drag
//! does is up to the handlers of the active tool.

use crate::input::PointerEvent;
use crate::state::BoardState;
use crate::tools::{DragHandlers, ToolKind};
use crate::update::BoardUpdate;
use kurbo::Point;

/// Pointer down: start dragging, then merge the start handler over the
/// defaults. The handler sees the state as it was before the press.
pub fn drag_start(handlers: &DragHandlers, event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let defaults = BoardUpdate::new()
        .with_dragging(true)
        .with_drag_start(event.position);

    match &handlers.on_start {
        Some(handler) => defaults.merge(handler(event, state)),
        None => defaults,
    }
}

/// Pointer move. Returns `None` when nothing should happen: the pointer is
/// not dragging, or no move handler is installed and the tool does not pan.
pub fn drag_move(
    handlers: &DragHandlers,
    event: &PointerEvent,
    state: &BoardState,
) -> Option<BoardUpdate> {
    if !state.session.dragging {
        return None;
    }
    match &handlers.on_move {
        Some(handler) => Some(handler(event, state)),
        None if state.tool == ToolKind::Pan => {
            Some(BoardUpdate::new().with_viewport(state.viewport.panned(event.movement)))
        }
        None => None,
    }
}

/// Pointer up: stop dragging and clear the gesture target, then merge the
/// end handler over the defaults.
pub fn drag_end(handlers: &DragHandlers, event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let defaults = BoardUpdate::new()
        .with_dragging(false)
        .with_drag_start(Point::ZERO)
        .with_current_element(None);

    match &handlers.on_end {
        Some(handler) => defaults.merge(handler(event, state)),
        None => defaults,
    }
}
