//! Select tool: click to select, drag to move the selection, drag on empty
//! space to marquee-select.

use super::{DragHandlers, HIT_TOLERANCE};
use crate::input::PointerEvent;
use crate::state::BoardState;
use crate::update::BoardUpdate;
use kurbo::Rect;

pub(super) fn select_handlers() -> DragHandlers {
    DragHandlers::new()
        .on_start(select_start)
        .on_move(select_move)
        .on_end(select_end)
}

fn select_start(event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let viewport = &state.viewport;
    let point = viewport.screen_to_board(event.position);
    let tolerance = HIT_TOLERANCE * viewport.scale();
    let multi = event.modifiers.is_multi_select();
    let mut selection = state.selection.clone();

    match state.elements.element_at_point(point, tolerance) {
        Some(id) => {
            // Pressing an already selected element keeps the group so it can be dragged
            if multi {
                let selected = !selection.is_selected(id);
                selection.set_current(id, selected, true);
            } else if !selection.is_selected(id) {
                selection.set_current(id, true, false);
            }
            let current = selection.is_selected(id).then_some(id);
            BoardUpdate::new()
                .with_selection(selection)
                .with_current_element(current)
                .with_marquee(None)
        }
        None => {
            if !multi {
                selection.clear();
            }
            BoardUpdate::new()
                .with_selection(selection)
                .with_current_element(None)
                .with_marquee(Some(Rect::from_points(point, point)))
        }
    }
}

fn select_move(event: &PointerEvent, state: &BoardState) -> BoardUpdate {
    let viewport = &state.viewport;

    if state.current_element.is_some() {
        let delta = viewport.scale_movement(event.movement);
        let mut elements = state.elements.clone();
        for id in state.selection.selected() {
            if let Some(element) = elements.get_mut(id) {
                element.styles_mut().translate(delta);
            }
        }
        return BoardUpdate::new().with_elements(elements);
    }

    if state.session.marquee.is_some() {
        let origin = viewport.screen_to_board(state.session.drag_start);
        let marquee = Rect::from_points(origin, viewport.screen_to_board(event.position));
        let mut selection = state.selection.clone();
        let hits = state.elements.elements_in_rect(marquee);
        if event.modifiers.is_multi_select() {
            for id in hits {
                selection.set_selected(id, true);
            }
        } else {
            selection.select_only(&hits);
        }
        return BoardUpdate::new()
            .with_selection(selection)
            .with_marquee(Some(marquee));
    }

    BoardUpdate::new()
}

fn select_end(_event: &PointerEvent, _state: &BoardState) -> BoardUpdate {
    BoardUpdate::new().with_marquee(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, ElementId, ElementKind, TextDefaults};
    use crate::input::Modifiers;
    use crate::viewport::Viewport;
    use kurbo::{Point, Vec2};

    fn board_with_two() -> (BoardState, ElementId, ElementId) {
        let mut state = BoardState::new(Viewport::with_zoom_level(1));
        let a = Element::create(
            ElementKind::Rect,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            1.0,
            TextDefaults::default(),
        );
        let b = Element::create(
            ElementKind::Circle,
            Rect::new(200.0, 0.0, 300.0, 100.0),
            1.0,
            TextDefaults::default(),
        );
        let (a_id, b_id) = (a.id(), b.id());
        state.elements.insert(a);
        state.elements.insert(b);
        state.selection.reconcile(&state.elements);
        (state, a_id, b_id)
    }

    #[test]
    fn test_click_selects_exclusively() {
        let (mut state, a, b) = board_with_two();
        state.selection.set_selected(a, true);

        let update = select_start(&PointerEvent::at(Point::new(250.0, 50.0)), &state);
        assert_eq!(update.current_element, Some(Some(b)));
        let selection = update.selection.unwrap();
        assert_eq!(selection.selected(), vec![b]);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut state, a, b) = board_with_two();
        state.selection.set_selected(a, true);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };

        let event = PointerEvent::at(Point::new(250.0, 50.0)).with_modifiers(shift);
        let selection = select_start(&event, &state).selection.unwrap();
        assert!(selection.is_selected(a));
        assert!(selection.is_selected(b));

        let event = PointerEvent::at(Point::new(50.0, 50.0)).with_modifiers(shift);
        let update = select_start(&event, &state);
        assert!(!update.selection.unwrap().is_selected(a));
        assert_eq!(update.current_element, Some(None));
    }

    #[test]
    fn test_empty_click_starts_marquee() {
        let (mut state, a, _) = board_with_two();
        state.selection.set_selected(a, true);

        let update = select_start(&PointerEvent::at(Point::new(500.0, 500.0)), &state);
        assert_eq!(update.selection.unwrap().selected_count(), 0);
        assert!(update.marquee.unwrap().is_some());
    }

    #[test]
    fn test_drag_moves_selection_scaled() {
        let (mut state, a, _) = board_with_two();
        state.viewport = Viewport::with_zoom_level(2);
        state.selection.set_selected(a, true);
        state.current_element = Some(a);

        let event = PointerEvent::at(Point::ZERO).with_movement(Vec2::new(5.0, 5.0));
        let elements = select_move(&event, &state).elements.unwrap();
        let styles = elements.get(a).unwrap().styles();
        assert!((styles.x - 10.0).abs() < f64::EPSILON);
        assert!((styles.y - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let (mut state, a, b) = board_with_two();
        state.session.drag_start = Point::new(-10.0, -10.0);
        state.session.marquee = Some(Rect::ZERO);

        let update = select_move(&PointerEvent::at(Point::new(400.0, 50.0)), &state);
        let selection = update.selection.unwrap();
        assert_eq!(selection.selected().len(), 2);
        assert!(selection.is_selected(a) && selection.is_selected(b));
        assert_eq!(
            update.marquee,
            Some(Some(Rect::new(-10.0, -10.0, 400.0, 50.0)))
        );
    }
}
