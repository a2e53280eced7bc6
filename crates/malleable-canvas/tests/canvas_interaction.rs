use anyhow::Result;
use malleable_canvas::frame::{MIN_FRAME_HEIGHT, MIN_FRAME_WIDTH};
use malleable_canvas::geometry::{ZOOM_MAX, ZOOM_MIN};
use malleable_canvas::viewport::CLICK_THRESHOLD;
use malleable_canvas::{
    Action, CanvasController, InteractionMode, KeyCode, KeyEvent, Listener, Modifiers, Point,
    PointerEvent, Rect, ViewportState, WheelEvent,
};
use proptest::prelude::*;

/// 1600x1000 viewport; frame sits at (160, 100, 1280, 800).
fn canvas() -> CanvasController {
    let mut c = CanvasController::new(1600.0, 1000.0);
    c.set_content_visible(true);
    c
}

fn click(c: &mut CanvasController, x: f64, y: f64) -> Vec<Action> {
    let mut actions = c.on_pointer_down(&PointerEvent::primary(x, y));
    actions.extend(c.on_pointer_up(Point::new(x, y)));
    actions
}

fn interactive() -> CanvasController {
    let mut c = canvas();
    click(&mut c, 800.0, 500.0);
    click(&mut c, 800.0, 500.0);
    assert_eq!(c.mode(), InteractionMode::EmbeddedInteractive);
    c
}

fn mode_changes(actions: &[Action]) -> Vec<(InteractionMode, InteractionMode)> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::ModeChanged(t) => Some((t.from, t.to)),
            _ => None,
        })
        .collect()
}

#[test]
fn frame_starts_centered() {
    let c = canvas();
    assert_eq!(c.frame().rect, Rect::new(160.0, 100.0, 1280.0, 800.0));
    assert_eq!(c.viewport_state(), ViewportState::default());
    assert_eq!(c.mode(), InteractionMode::Normal);
}

#[test]
fn click_outside_deselects() {
    let mut c = canvas();
    click(&mut c, 800.0, 500.0);
    assert_eq!(c.mode(), InteractionMode::Selected);

    let actions = click(&mut c, 50.0, 50.0);
    assert_eq!(
        mode_changes(&actions),
        vec![(InteractionMode::Selected, InteractionMode::Normal)]
    );
    assert!(!c.frame().selected);
}

#[test]
fn drag_over_frame_pans_without_selecting() {
    let mut c = canvas();
    c.on_pointer_down(&PointerEvent::primary(800.0, 500.0));
    c.on_pointer_move(Point::new(803.0, 500.0));
    c.on_pointer_move(Point::new(810.0, 500.0));
    let actions = c.on_pointer_up(Point::new(804.0, 500.0));
    assert!(mode_changes(&actions).is_empty());
    assert_eq!(c.mode(), InteractionMode::Normal);
    assert_eq!(c.viewport_state().pan_x, 10.0);
}

#[test]
fn escape_leaves_interaction() {
    let mut c = interactive();
    let key = |key| KeyEvent {
        key,
        modifiers: Modifiers::default(),
    };
    assert_eq!(c.on_key(&key(KeyCode::Char('x'))), vec![Action::Passthrough]);

    let actions = c.on_key(&key(KeyCode::Escape));
    assert_eq!(
        mode_changes(&actions),
        vec![(InteractionMode::EmbeddedInteractive, InteractionMode::Selected)]
    );
    assert!(c.overlay().hit_testing());
    assert!(c.frame().selected);

    // No listener remains once the mode is left.
    assert!(c.on_key(&key(KeyCode::Escape)).is_empty());
}

#[test]
fn pointer_down_outside_leaves_interaction_without_panning() {
    let mut c = interactive();
    let before = c.viewport_state();
    let actions = c.on_pointer_down(&PointerEvent::primary(20.0, 20.0));
    assert_eq!(c.mode(), InteractionMode::Selected);
    let Some(Action::ModeChanged(t)) = actions.first() else {
        panic!("expected a mode change, got {actions:?}");
    };
    assert!(t.removed.contains(&Listener::DocumentPointerDown));

    c.on_pointer_move(Point::new(200.0, 200.0));
    c.on_pointer_up(Point::new(200.0, 200.0));
    assert_eq!(c.viewport_state(), before);
}

#[test]
fn moving_onto_background_leaves_interaction() {
    let mut c = interactive();
    assert_eq!(c.on_pointer_move(Point::new(900.0, 600.0)), vec![Action::Passthrough]);
    let actions = c.on_pointer_move(Point::new(1500.0, 950.0));
    assert_eq!(
        mode_changes(&actions),
        vec![(InteractionMode::EmbeddedInteractive, InteractionMode::Selected)]
    );
}

#[test]
fn wheel_over_content_is_forwarded_while_interactive() {
    let mut c = interactive();
    let wheel = |x, y| WheelEvent {
        position: Point::new(x, y),
        delta_x: 0.0,
        delta_y: 40.0,
        modifiers: Modifiers::default(),
    };
    assert_eq!(c.on_wheel(&wheel(800.0, 500.0)), vec![Action::Passthrough]);
    assert_eq!(c.viewport_state(), ViewportState::default());

    c.on_wheel(&wheel(50.0, 50.0));
    assert_eq!(c.viewport_state().pan_y, -40.0);
}

#[test]
fn handle_drag_resizes_in_world_units() -> Result<()> {
    let mut c = canvas();
    click(&mut c, 800.0, 500.0);

    // Zoom out to 50% around the origin: frame now at (80, 50, 640, 400) on screen.
    c.on_wheel(&WheelEvent {
        position: Point::new(0.0, 0.0),
        delta_x: 0.0,
        delta_y: 50.0,
        modifiers: Modifiers {
            ctrl: true,
            ..Default::default()
        },
    });
    assert_eq!(c.viewport_state().zoom, 0.5);

    // West edge handle at screen x = 80.
    c.on_pointer_down(&PointerEvent::primary(80.0, 250.0));
    let actions = c.on_pointer_move(Point::new(105.0, 250.0));
    let Some(Action::FrameChanged { rect, .. }) = actions.first() else {
        anyhow::bail!("expected frame change, got {actions:?}");
    };
    assert_eq!(*rect, Rect::new(210.0, 100.0, 1230.0, 800.0));

    c.on_pointer_move(Point::new(5000.0, 250.0));
    c.on_pointer_up(Point::new(5000.0, 250.0));
    let r = c.frame().rect;
    assert_eq!((r.x + r.w, r.w), (1440.0, MIN_FRAME_WIDTH));
    assert_eq!(c.mode(), InteractionMode::Selected);
    Ok(())
}

#[test]
fn recenter_restores_full_zoom() {
    let mut c = canvas();
    c.on_pointer_down(&PointerEvent::primary(10.0, 10.0));
    c.on_pointer_move(Point::new(300.0, -200.0));
    c.on_pointer_up(Point::new(300.0, -200.0));

    match &c.recenter()[..] {
        [Action::RenderTransform {
            viewport,
            zoom_label,
            ..
        }] => {
            assert_eq!(*viewport, ViewportState::default());
            assert_eq!(zoom_label, "100%");
        }
        other => panic!("unexpected actions: {other:?}"),
    }
}

fn arb_handle() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["n", "s", "e", "w", "ne", "nw", "se", "sw"])
}

proptest! {
    #[test]
    fn wheel_zoom_keeps_world_point_under_cursor(
        x in 0.0..1600.0f64,
        y in 0.0..1000.0f64,
        wheel in prop::collection::vec(-500.0..500.0f64, 1..12),
    ) {
        let mut c = canvas();
        let cursor = Point::new(x, y);
        for delta_y in wheel {
            let before = c.viewport_state().screen_to_world(cursor);
            c.on_wheel(&WheelEvent {
                position: cursor,
                delta_x: 0.0,
                delta_y,
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            });
            let vp = c.viewport_state();
            let after = vp.screen_to_world(cursor);
            prop_assert!((before.x - after.x).abs() < 1e-6);
            prop_assert!((before.y - after.y).abs() < 1e-6);
            prop_assert!((ZOOM_MIN..=ZOOM_MAX).contains(&vp.zoom));
        }
    }

    #[test]
    fn resize_sequence_never_breaks_minimum(
        steps in prop::collection::vec((arb_handle(), -3000.0..3000.0f64, -3000.0..3000.0f64), 1..20),
    ) {
        let mut c = canvas();
        click(&mut c, 800.0, 500.0);
        let origin = Point::new(800.0, 500.0);
        for (handle, dx, dy) in steps {
            prop_assert!(c.begin_resize(handle, origin).is_ok());
            let to = Point::new(origin.x + dx, origin.y + dy);
            c.on_pointer_move(to);
            c.on_pointer_up(to);
            let r = c.frame().rect;
            prop_assert!(r.w >= MIN_FRAME_WIDTH && r.h >= MIN_FRAME_HEIGHT, "{}: {:?}", handle, r);
        }
    }

    #[test]
    fn press_release_is_a_click_only_below_threshold(dx in -12.0..12.0f64, dy in -12.0..12.0f64) {
        let mut c = canvas();
        let release = Point::new(800.0 + dx, 500.0 + dy);
        c.on_pointer_down(&PointerEvent::primary(800.0, 500.0));
        c.on_pointer_move(release);
        c.on_pointer_up(release);

        let moved = c.viewport_state();
        prop_assert!((moved.pan_x - dx).abs() < 1e-9 && (moved.pan_y - dy).abs() < 1e-9);
        let is_click = dx.abs() < CLICK_THRESHOLD && dy.abs() < CLICK_THRESHOLD;
        let expected = if is_click { InteractionMode::Selected } else { InteractionMode::Normal };
        prop_assert_eq!(c.mode(), expected);
    }
}
