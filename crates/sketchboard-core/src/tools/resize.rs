//! Resize overlay: dragging grows or shrinks the selection from its
//! bottom-right corner.

use super::DragHandlers;
use crate::elements::ElementKind;
use crate::input::PointerEvent;
use crate::state::BoardState;
use crate::update::BoardUpdate;

/// Smallest side an element can be resized to, in screen pixels.
pub const MIN_RESIZE_SIDE: f64 = 4.0;

/// Handlers for the resize overlay. Only the move phase is customized.
pub fn resize_handlers() -> DragHandlers {
    DragHandlers::new().on_move(resize_move)
}

fn resize_move(event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let delta = state.viewport.scale_movement(event.movement);
    let min_side = MIN_RESIZE_SIDE * state.viewport.scale();
    let mut elements = state.elements.clone();

    for id in state.selection.selected() {
        let Some(element) = elements.get_mut(id) else {
            continue;
        };
        let square = element.kind() == ElementKind::PostitSquare;
        let styles = element.styles_mut();
        let mut width = (styles.width + delta.x).max(min_side);
        let mut height = (styles.height + delta.y).max(min_side);
        if square {
            width = width.max(height);
            height = width;
        }
        styles.width = width;
        styles.height = height;
    }
    BoardUpdate::new().with_elements(elements)
}
