//! End-to-end behavior of the board controller.

use kurbo::{Point, Rect, Size, Vec2};
use pretty_assertions::assert_eq;
use sketchboard_core::{
    Board, BoardConfig, BoardUpdate, DragHandlers, ElementId, ElementKind, ElementProperty,
    InputEvent, Modifiers, PointerEvent, PropertyValue, ToolKind, Viewport, WheelEvent,
    patch,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn board_at(zoom: u32) -> Board {
    Board::new(BoardConfig {
        initial_zoom_level: zoom,
        ..BoardConfig::default()
    })
}

fn add(board: &mut Board, kind: ElementKind, x: f64, y: f64) -> ElementId {
    board
        .create_element(kind, Rect::new(x, y, x + 100.0, y + 100.0))
        .unwrap()
}

fn position(board: &Board, id: ElementId) -> (f64, f64) {
    let styles = board.element(id).unwrap().styles();
    (styles.x, styles.y)
}

#[test]
fn test_zoom_anchors_cursor() {
    let mut board = board_at(1);
    board
        .zoom(&WheelEvent {
            position: Point::new(100.0, 0.0),
            delta: Vec2::new(0.0, 1.0),
        })
        .unwrap();
    assert_eq!(board.viewport().zoom_level, 2);
    assert!((board.viewport().offset.x + 100.0).abs() < f64::EPSILON);
    assert!(board.viewport().offset.y.abs() < f64::EPSILON);
}

#[test]
fn test_zoom_anchoring_holds_for_any_cursor() {
    let cursors = [
        Point::new(0.0, 0.0),
        Point::new(13.5, 977.0),
        Point::new(640.0, 360.0),
        Point::new(1919.0, 1.0),
    ];
    for zoom in [1_u32, 2, 7, 100] {
        for cursor in cursors {
            for delta in [-3.0, 0.0, 0.5, 12.0] {
                let before = Viewport {
                    offset: Vec2::new(-250.0, 42.0),
                    zoom_level: zoom,
                };
                let after = before.zoomed(&WheelEvent {
                    position: cursor,
                    delta: Vec2::new(0.0, delta),
                });
                let anchored = before.screen_to_board(cursor) - after.screen_to_board(cursor);
                assert!(anchored.hypot() < 1e-9, "drifted at zoom {zoom}, {cursor:?}");
                assert!(after.zoom_level >= 1);
            }
        }
    }
}

#[test]
fn test_zoom_never_below_one() {
    let mut board = board_at(1);
    for _ in 0..5 {
        board
            .zoom(&WheelEvent {
                position: Point::new(50.0, 50.0),
                delta: Vec2::new(0.0, -1.0),
            })
            .unwrap();
    }
    assert_eq!(board.viewport().zoom_level, 1);
    assert_eq!(board.viewport().offset, Vec2::ZERO);
}

#[test]
fn test_exclusive_selection_scenario() {
    let mut board = board_at(1);
    let a = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    let b = add(&mut board, ElementKind::Text, 200.0, 0.0);

    board.set_current_element(a, true, false).unwrap();
    board.set_current_element(b, true, false).unwrap();
    assert!(!board.selection().is_selected(a));
    assert!(board.selection().is_selected(b));
}

#[test]
fn test_selection_exclusivity_over_sequences() {
    let mut board = board_at(1);
    let ids: Vec<ElementId> = (0..5)
        .map(|i| add(&mut board, ElementKind::Rect, f64::from(i) * 150.0, 0.0))
        .collect();

    for step in 0..40_usize {
        let id = ids[(step * 7) % ids.len()];
        let selected = step % 3 != 0;
        board.set_current_element(id, selected, false).unwrap();
        assert!(board.selection().selected_count() <= 1);
    }
}

#[test]
fn test_move_undo_redo_scenario() {
    let mut board = board_at(2);
    let id = add(&mut board, ElementKind::Rect, 10.0, 20.0);
    board.set_current_element(id, true, false).unwrap();

    board.update_position(Vec2::new(5.0, 5.0)).unwrap();
    assert_eq!(position(&board, id), (20.0, 30.0));

    assert!(board.undo().unwrap());
    assert_eq!(position(&board, id), (10.0, 20.0));

    assert!(board.redo().unwrap());
    assert_eq!(position(&board, id), (20.0, 30.0));
}

#[test]
fn test_non_finite_move_keeps_history_replayable() {
    let mut board = board_at(1);
    let id = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    board.set_current_element(id, true, false).unwrap();
    board.update_position(Vec2::new(4.0, 0.0)).unwrap();

    assert!(board.update_position(Vec2::new(f64::NAN, 0.0)).is_err());
    assert!(
        board
            .pointer_move(&PointerEvent::at(Point::ZERO).with_movement(Vec2::new(f64::NAN, 1.0)))
            .is_err()
    );
    assert_eq!(position(&board, id), (4.0, 0.0));

    assert!(board.undo().unwrap());
    assert_eq!(position(&board, id), (0.0, 0.0));
    assert!(board.redo().unwrap());
    assert_eq!(position(&board, id), (4.0, 0.0));
    assert!(!board.redo_is_possible());
}

#[test]
fn test_undo_restores_snapshots_exactly() {
    let mut board = board_at(3);
    let mut snapshots = vec![board.state().snapshot()];

    let a = add(&mut board, ElementKind::PostitSquare, 0.0, 0.0);
    snapshots.push(board.state().snapshot());
    let b = add(&mut board, ElementKind::Circle, 300.0, 0.0);
    snapshots.push(board.state().snapshot());
    board.set_current_element(a, true, false).unwrap();
    snapshots.push(board.state().snapshot());
    board.set_current_element(b, true, true).unwrap();
    snapshots.push(board.state().snapshot());
    board.update_position(Vec2::new(-4.0, 9.0)).unwrap();
    snapshots.push(board.state().snapshot());
    board
        .update_element_property(a, ElementProperty::Opacity, PropertyValue::Number(0.5))
        .unwrap();
    snapshots.push(board.state().snapshot());
    board.remove_selected().unwrap();
    snapshots.push(board.state().snapshot());

    let history = board.history();
    assert_eq!(history.undo_len(), snapshots.len() - 1);
    assert_eq!(history.undo_len(), history.updates_len());

    for expected in snapshots.iter().rev().skip(1) {
        assert!(board.undo().unwrap());
        assert_eq!(&board.state().snapshot(), expected);
        assert_eq!(board.history().undo_len(), board.history().updates_len());
    }
    assert!(!board.undo().unwrap());
    assert!(!board.undo_is_possible());

    for expected in snapshots.iter().skip(1) {
        assert!(board.redo().unwrap());
        assert_eq!(&board.state().snapshot(), expected);
    }
    assert!(!board.redo_is_possible());
}

#[test]
fn test_fresh_edit_clears_redo() {
    let mut board = board_at(1);
    let id = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    board.set_current_element(id, true, false).unwrap();
    board.update_position(Vec2::new(1.0, 1.0)).unwrap();

    board.undo().unwrap();
    assert!(board.redo_is_possible());

    board.update_position(Vec2::new(2.0, 0.0)).unwrap();
    assert!(!board.redo_is_possible());
    assert_eq!(board.history().undo_len(), board.history().updates_len());
}

#[test]
fn test_forward_and_inverse_patch_laws() {
    let mut board = board_at(2);
    let id = add(&mut board, ElementKind::Text, 0.0, 0.0);
    let before = board.state().snapshot_value().unwrap();

    board.set_current_element(id, true, false).unwrap();
    board.update_position(Vec2::new(3.0, -7.0)).unwrap();
    board.set_element_height(id, "12.5").unwrap();
    let after = board.state().snapshot_value().unwrap();

    let forward = patch::diff(&before, &after);
    let inverse = patch::diff(&after, &before);
    assert_eq!(patch::apply(&forward, &before).unwrap(), after);
    assert_eq!(patch::apply(&inverse, &after).unwrap(), before);
}

#[test]
fn test_drag_move_handler_overrides_pan() {
    let mut board = board_at(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    board.select_tool(ToolKind::Pan);
    board.set_drag_handlers(DragHandlers::new().on_move(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        BoardUpdate::new()
    }));

    let down = PointerEvent::at(Point::new(10.0, 10.0));
    let moved = PointerEvent::at(Point::new(30.0, 10.0)).with_movement(Vec2::new(20.0, 0.0));
    board.pointer_down(&down).unwrap();
    board.pointer_move(&moved).unwrap();
    board.pointer_up(&moved).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(board.viewport().offset, Vec2::ZERO);
}

#[test]
fn test_pan_tool_drags_viewport() {
    let mut board = board_at(2);
    board.activate_tool(ToolKind::Pan);

    board.pointer_down(&PointerEvent::at(Point::new(10.0, 10.0))).unwrap();
    assert!(board.is_dragging());
    board
        .pointer_move(&PointerEvent::at(Point::new(15.0, 7.0)).with_movement(Vec2::new(5.0, -3.0)))
        .unwrap();
    board.pointer_up(&PointerEvent::at(Point::new(15.0, 7.0))).unwrap();

    assert!(!board.is_dragging());
    assert_eq!(board.viewport().offset, Vec2::new(-10.0, 6.0));
    assert!(!board.undo_is_possible());
}

#[test]
fn test_move_without_drag_does_nothing() {
    let mut board = board_at(1);
    board
        .pointer_move(&PointerEvent::at(Point::new(5.0, 5.0)).with_movement(Vec2::new(5.0, 5.0)))
        .unwrap();
    assert_eq!(board.viewport().offset, Vec2::ZERO);
}

#[test]
fn test_select_tool_drag_is_one_history_entry() {
    let mut board = board_at(1);
    let id = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    board.activate_tool(ToolKind::Select);
    let depth = board.history().undo_len();

    board.pointer_down(&PointerEvent::at(Point::new(50.0, 50.0))).unwrap();
    for step in 1..=4 {
        let at = Point::new(50.0 + f64::from(step) * 5.0, 50.0);
        board
            .pointer_move(&PointerEvent::at(at).with_movement(Vec2::new(5.0, 0.0)))
            .unwrap();
        assert!(!board.undo_is_possible());
    }
    board.pointer_up(&PointerEvent::at(Point::new(70.0, 50.0))).unwrap();

    assert_eq!(position(&board, id), (20.0, 0.0));
    assert!(board.selection().is_selected(id));
    assert_eq!(board.history().undo_len(), depth + 1);

    board.undo().unwrap();
    assert_eq!(position(&board, id), (0.0, 0.0));
    assert!(!board.selection().is_selected(id));
}

#[test]
fn test_marquee_multi_select() {
    let mut board = board_at(1);
    let a = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    let b = add(&mut board, ElementKind::Circle, 150.0, 0.0);
    let far = add(&mut board, ElementKind::Text, 1000.0, 1000.0);
    board.activate_tool(ToolKind::Select);

    board.pointer_down(&PointerEvent::at(Point::new(-20.0, -20.0))).unwrap();
    board
        .pointer_move(&PointerEvent::at(Point::new(300.0, 50.0)).with_movement(Vec2::new(320.0, 70.0)))
        .unwrap();
    let frame = board.frame(Size::new(800.0, 600.0));
    assert_eq!(frame.marquee, Some(Rect::new(-20.0, -20.0, 300.0, 50.0)));
    board.pointer_up(&PointerEvent::at(Point::new(300.0, 50.0))).unwrap();

    assert!(board.selection().is_selected(a));
    assert!(board.selection().is_selected(b));
    assert!(!board.selection().is_selected(far));
    assert_eq!(board.frame(Size::new(800.0, 600.0)).marquee, None);
}

#[test]
fn test_shift_click_extends_selection() {
    let mut board = board_at(1);
    let a = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    let b = add(&mut board, ElementKind::Rect, 200.0, 0.0);
    board.activate_tool(ToolKind::Select);

    let click = |board: &mut Board, at: Point, modifiers: Modifiers| {
        let event = PointerEvent::at(at).with_modifiers(modifiers);
        board.pointer_down(&event).unwrap();
        board.pointer_up(&event).unwrap();
    };
    click(&mut board, Point::new(50.0, 50.0), Modifiers::default());
    click(
        &mut board,
        Point::new(250.0, 50.0),
        Modifiers {
            shift: true,
            ..Modifiers::default()
        },
    );
    assert_eq!(board.selection().selected_count(), 2);

    click(&mut board, Point::new(250.0, 50.0), Modifiers::default());
    assert!(board.selection().is_selected(a));
    assert!(board.selection().is_selected(b));
}

#[test]
fn test_draw_tool_creates_scaled_element() {
    let mut board = board_at(2);
    board.activate_tool(ToolKind::Rect);

    board.pointer_down(&PointerEvent::at(Point::new(10.0, 10.0))).unwrap();
    board
        .pointer_move(&PointerEvent::at(Point::new(60.0, 35.0)).with_movement(Vec2::new(50.0, 25.0)))
        .unwrap();
    board.pointer_up(&PointerEvent::at(Point::new(60.0, 35.0))).unwrap();

    assert_eq!(board.elements().len(), 1);
    let element = board.elements().ordered()[0];
    assert_eq!(element.bounds(), Rect::new(20.0, 20.0, 120.0, 70.0));
    assert_eq!(element.styles().font_size, Some(48.0));
    assert!(board.selection().is_selected(element.id()));
    assert_eq!(board.history().undo_len(), 1);

    board.undo().unwrap();
    assert!(board.elements().is_empty());
}

#[test]
fn test_undo_ignored_mid_gesture() {
    let mut board = board_at(1);
    let id = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    board.activate_tool(ToolKind::Select);

    board.pointer_down(&PointerEvent::at(Point::new(10.0, 10.0))).unwrap();
    assert!(!board.undo().unwrap());
    assert!(board.element(id).is_some());
    board.pointer_up(&PointerEvent::at(Point::new(10.0, 10.0))).unwrap();
    assert!(board.undo_is_possible());
}

#[test]
fn test_events_route_through_handle_event() {
    let mut board = board_at(1);
    let script = [
        InputEvent::Key(sketchboard_core::KeyEvent::new("r", Modifiers::default())),
        InputEvent::PointerDown(PointerEvent::at(Point::new(0.0, 0.0))),
        InputEvent::PointerUp(PointerEvent::at(Point::new(0.0, 0.0))),
        InputEvent::Wheel(WheelEvent {
            position: Point::ZERO,
            delta: Vec2::new(0.0, 1.0),
        }),
    ];
    for event in &script {
        board.handle_event(event).unwrap();
    }

    assert_eq!(board.tool(), ToolKind::Rect);
    assert_eq!(board.elements().len(), 1);
    let bounds = board.elements().ordered()[0].bounds();
    assert!((bounds.width() - 200.0).abs() < f64::EPSILON);
    assert_eq!(board.viewport().zoom_level, 2);

    let undo = sketchboard_core::KeyEvent::new(
        "z",
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        },
    );
    board.handle_event(&InputEvent::Key(undo)).unwrap();
    assert!(board.elements().is_empty());
}

#[test]
fn test_resize_overlay_handlers() {
    let mut board = board_at(2);
    let id = add(&mut board, ElementKind::Rect, 0.0, 0.0);
    board.set_current_element(id, true, false).unwrap();
    board.select_tool(ToolKind::Select);
    board.set_drag_handlers(sketchboard_core::tools::resize_handlers());

    board.pointer_down(&PointerEvent::at(Point::new(50.0, 50.0))).unwrap();
    board
        .pointer_move(&PointerEvent::at(Point::new(60.0, 55.0)).with_movement(Vec2::new(10.0, 5.0)))
        .unwrap();
    board.pointer_up(&PointerEvent::at(Point::new(60.0, 55.0))).unwrap();

    let styles = board.element(id).unwrap().styles();
    assert!((styles.width - 120.0).abs() < f64::EPSILON);
    assert!((styles.height - 110.0).abs() < f64::EPSILON);
    assert_eq!(board.viewport().offset, Vec2::ZERO);

    board.undo().unwrap();
    assert!((board.element(id).unwrap().styles().width - 100.0).abs() < f64::EPSILON);
}
