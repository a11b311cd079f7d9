//! Drawing tools: drag out a new element, or click for a default-sized one.

use super::{DragHandlers, ToolDefaults};
use crate::elements::{Element, ElementKind};
use crate::input::PointerEvent;
use crate::state::BoardState;
use crate::update::BoardUpdate;
use kurbo::{Point, Rect};

pub(super) fn draw_handlers(kind: ElementKind, defaults: ToolDefaults) -> DragHandlers {
    DragHandlers::new()
        .on_start(move |event, state| draw_start(kind, defaults, event, state))
        .on_move(move |event, state| draw_move(kind, event, state))
        .on_end(move |event, state| draw_end(kind, defaults, event, state))
}

fn draw_start(
    kind: ElementKind,
    defaults: ToolDefaults,
    event: &PointerEvent,
    state: &BoardState,
) -> BoardUpdate {
    let viewport = &state.viewport;
    let origin = viewport.screen_to_board(event.position);
    let element = Element::create(
        kind,
        Rect::from_points(origin, origin),
        viewport.scale(),
        defaults.text,
    );
    let id = element.id();

    let mut elements = state.elements.clone();
    elements.insert(element);
    let mut selection = state.selection.clone();
    selection.reconcile(&elements);
    selection.set_current(id, true, false);

    BoardUpdate::new()
        .with_elements(elements)
        .with_selection(selection)
        .with_current_element(Some(id))
}

fn draw_move(kind: ElementKind, event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let Some(id) = state.current_element else {
        return BoardUpdate::new();
    };
    let viewport = &state.viewport;
    let origin = viewport.screen_to_board(state.session.drag_start);
    let corner = viewport.screen_to_board(event.position);

    let mut elements = state.elements.clone();
    let Some(element) = elements.get_mut(id) else {
        return BoardUpdate::new();
    };
    element.styles_mut().set_rect(drawn_rect(kind, origin, corner));
    BoardUpdate::new().with_elements(elements)
}

fn draw_end(
    kind: ElementKind,
    defaults: ToolDefaults,
    _event: &PointerEvent,
    state: &BoardState,
) -> BoardUpdate {
    let Some(id) = state.current_element else {
        return BoardUpdate::new();
    };
    let scale = state.viewport.scale();
    let mut elements = state.elements.clone();
    let Some(element) = elements.get_mut(id) else {
        return BoardUpdate::new();
    };

    let bounds = element.bounds();
    // Less than a screen pixel in both directions counts as a click
    if bounds.width() < scale && bounds.height() < scale {
        let side = defaults.element_size * scale;
        let corner = Point::new(bounds.x0 + side, bounds.y0 + side);
        element
            .styles_mut()
            .set_rect(drawn_rect(kind, bounds.origin(), corner));
        return BoardUpdate::new().with_elements(elements);
    }
    BoardUpdate::new()
}

/// Rectangle spanned by a drag. Post-its stay square, anchored at the origin.
fn drawn_rect(kind: ElementKind, origin: Point, corner: Point) -> Rect {
    if kind != ElementKind::PostitSquare {
        return Rect::from_points(origin, corner);
    }
    let side = (corner.x - origin.x).abs().max((corner.y - origin.y).abs());
    let corner = Point::new(
        origin.x + side.copysign(corner.x - origin.x),
        origin.y + side.copysign(corner.y - origin.y),
    );
    Rect::from_points(origin, corner)
}
