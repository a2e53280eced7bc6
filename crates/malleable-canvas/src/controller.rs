//! Canvas controller: owns viewport, frame, gesture and interaction mode, and
//! turns input events into render actions for the host.

use tracing::{debug, warn};

use crate::error::{CanvasError, Result};
use crate::frame::{Frame, SelectionOutline};
use crate::geometry::{Edges, Point, Rect, ViewportState};
use crate::gesture::{Gesture, GestureSlot};
use crate::hit::{FrameHitTester, HitTarget, Overlay};
use crate::interaction::{
    ClickTarget, DocumentEvent, InteractionMachine, InteractionMode, ModeTransition,
};
use crate::scene::{KeyEvent, MouseButton, PointerEvent, WheelEvent};
use crate::viewport::{self, Release, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
    Resize(Edges),
}

/// Side effects the host must apply after an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// World transform changed. Carries everything derived from it.
    RenderTransform {
        viewport: ViewportState,
        zoom_label: String,
        selection: Option<SelectionOutline>,
    },
    /// Frame geometry or selection changed.
    FrameChanged {
        rect: Rect,
        selection: Option<SelectionOutline>,
    },
    ModeChanged(ModeTransition),
    /// The event belongs to the content surface; forward it unchanged.
    Passthrough,
    SetCursor(Cursor),
}

pub struct CanvasController {
    viewport: Viewport,
    frame: Frame,
    gesture: GestureSlot,
    mode: InteractionMachine,
    overlay: Overlay,
    content_visible: bool,
    cursor: Cursor,
}

impl CanvasController {
    /// Controller for a viewport of the given size, with the frame centred in it.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            frame: Frame::centered(width, height),
            gesture: GestureSlot::default(),
            mode: InteractionMachine::default(),
            overlay: Overlay::default(),
            content_visible: false,
            cursor: Cursor::Grab,
        }
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode.mode()
    }

    pub fn gesture(&self) -> &Gesture {
        self.gesture.current()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    /// Content has been pushed to (or cleared from) the frame.
    pub fn set_content_visible(&mut self, visible: bool) {
        self.content_visible = visible;
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.set_size(width, height);
    }

    pub fn render_transform(&self) -> Action {
        let viewport = self.viewport.state();
        Action::RenderTransform {
            zoom_label: viewport.zoom_label(),
            selection: self.frame.selection_outline(&viewport),
            viewport,
        }
    }

    fn frame_changed(&self) -> Action {
        Action::FrameChanged {
            rect: self.frame.rect,
            selection: self.frame.selection_outline(&self.viewport.state()),
        }
    }

    /// Zoom to 100% with the frame centred.
    pub fn recenter(&mut self) -> Vec<Action> {
        self.viewport.center_on(self.frame.rect);
        vec![self.render_transform()]
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) -> Vec<Action> {
        if self.mode() == InteractionMode::EmbeddedInteractive
            && self.target_at(event.position) == HitTarget::Frame
        {
            return vec![Action::Passthrough];
        }
        self.viewport.on_wheel(event);
        vec![self.render_transform()]
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Vec<Action> {
        let position = event.position;
        let mut actions = Vec::new();

        // The document listener sees every button, so any press outside the
        // content leaves interaction before the button filter applies.
        if self.mode() == InteractionMode::EmbeddedInteractive {
            let on_frame = self.target_at(position) == HitTarget::Frame;
            if on_frame && self.frame.handle_at(position, &self.viewport.state()).is_none() {
                if event.button != MouseButton::Left {
                    return vec![Action::Passthrough];
                }
                return match self.gesture.begin(Gesture::ContentInteractive) {
                    Ok(()) => vec![Action::Passthrough],
                    Err(err) => {
                        warn!(%err, "ignoring pointer down");
                        Vec::new()
                    }
                };
            }
            if let Some(t) = self.mode.dispatch(DocumentEvent::PointerDown { on_frame }) {
                actions.extend(self.apply_transition(t));
            }
        }

        if event.button != MouseButton::Left {
            return actions;
        }
        if let Some(edges) = self.frame.handle_at(position, &self.viewport.state()) {
            self.start(
                Gesture::Resizing {
                    edges,
                    origin: position,
                    start: self.frame.rect,
                },
                &mut actions,
            );
        } else if actions.is_empty() {
            self.start(
                Gesture::Panning {
                    origin: position,
                    start: self.viewport.state(),
                },
                &mut actions,
            );
        }
        actions
    }

    /// A press somewhere in the window outside the canvas area. Only the
    /// document listener of interactive mode reacts to it, and it never
    /// starts a gesture.
    pub fn on_document_pointer_down(&mut self) -> Vec<Action> {
        if self.mode() != InteractionMode::EmbeddedInteractive {
            return Vec::new();
        }
        self.mode
            .dispatch(DocumentEvent::PointerDown { on_frame: false })
            .map(|t| self.apply_transition(t))
            .unwrap_or_default()
    }

    pub fn on_pointer_move(&mut self, position: Point) -> Vec<Action> {
        let gesture = *self.gesture.current();
        match gesture {
            Gesture::Panning { origin, start } => {
                self.viewport.drag(start, origin, position);
                vec![self.render_transform()]
            }
            Gesture::Resizing {
                edges,
                origin,
                start,
            } => {
                self.frame.resize_from(
                    start,
                    edges,
                    position.x - origin.x,
                    position.y - origin.y,
                    self.viewport.state().zoom,
                );
                vec![self.frame_changed()]
            }
            Gesture::ContentInteractive => vec![Action::Passthrough],
            Gesture::None => self.hover(position),
        }
    }

    pub fn on_pointer_up(&mut self, position: Point) -> Vec<Action> {
        match self.gesture.end() {
            Gesture::Panning { origin, .. } => {
                let mut actions = Vec::new();
                self.set_cursor(Cursor::Grab, &mut actions);
                if let Release::Click(at) = viewport::classify_release(origin, position) {
                    actions.extend(self.click(at));
                }
                actions
            }
            Gesture::Resizing { .. } => {
                let mut actions = Vec::new();
                self.set_cursor(Cursor::Grab, &mut actions);
                actions
            }
            Gesture::ContentInteractive => vec![Action::Passthrough],
            Gesture::None => Vec::new(),
        }
    }

    /// Keys reach the canvas only through the document listener installed
    /// while content is interactive.
    pub fn on_key(&mut self, event: &KeyEvent) -> Vec<Action> {
        if self.mode() != InteractionMode::EmbeddedInteractive {
            return Vec::new();
        }
        match self.mode.dispatch(DocumentEvent::KeyDown(event.key)) {
            Some(t) => self.apply_transition(t),
            None => vec![Action::Passthrough],
        }
    }

    /// Start resizing through a named handle (`"n"`, `"se"`, ...).
    pub fn begin_resize(&mut self, handle: &str, cursor: Point) -> Result<Vec<Action>> {
        let edges: Edges = handle.parse()?;
        if !self.frame.selected {
            return Err(CanvasError::NotSelected);
        }
        self.gesture.begin(Gesture::Resizing {
            edges,
            origin: cursor,
            start: self.frame.rect,
        })?;
        let mut actions = Vec::new();
        self.set_cursor(Cursor::Resize(edges), &mut actions);
        Ok(actions)
    }

    /// Leave any selection or interaction and return to `Normal`.
    pub fn reset_mode(&mut self) -> Vec<Action> {
        self.mode
            .reset()
            .map(|t| self.apply_transition(t))
            .unwrap_or_default()
    }

    fn start(&mut self, gesture: Gesture, actions: &mut Vec<Action>) {
        let cursor = match gesture {
            Gesture::Resizing { edges, .. } => Cursor::Resize(edges),
            _ => Cursor::Grabbing,
        };
        match self.gesture.begin(gesture) {
            Ok(()) => self.set_cursor(cursor, actions),
            Err(err) => warn!(%err, "ignoring pointer down"),
        }
    }

    fn hover(&mut self, position: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode() == InteractionMode::EmbeddedInteractive {
            let target = self.target_at(position);
            let event = DocumentEvent::PointerMove {
                on_background: target == HitTarget::Background,
            };
            match self.mode.dispatch(event) {
                Some(t) => actions.extend(self.apply_transition(t)),
                None => return vec![Action::Passthrough],
            }
        }
        let cursor = match self.frame.handle_at(position, &self.viewport.state()) {
            Some(edges) => Cursor::Resize(edges),
            None => Cursor::Grab,
        };
        self.set_cursor(cursor, &mut actions);
        actions
    }

    fn click(&mut self, at: Point) -> Vec<Action> {
        let target = match self.target_at(at) {
            HitTarget::Frame => ClickTarget::Frame,
            HitTarget::Overlay | HitTarget::Background => ClickTarget::Outside,
        };
        debug!(?target, x = at.x, y = at.y, "canvas click");
        self.mode
            .click(target)
            .map(|t| self.apply_transition(t))
            .unwrap_or_default()
    }

    fn target_at(&mut self, point: Point) -> HitTarget {
        let tester = FrameHitTester {
            frame: &self.frame,
            viewport: self.viewport.state(),
            content_visible: self.content_visible,
        };
        self.overlay.resolve(&tester, point)
    }

    fn apply_transition(&mut self, transition: ModeTransition) -> Vec<Action> {
        let to = transition.to;
        self.overlay
            .set_hit_testing(to != InteractionMode::EmbeddedInteractive);
        if to.frame_selected() {
            self.frame.select();
        } else {
            self.frame.deselect();
        }
        vec![Action::ModeChanged(transition), self.frame_changed()]
    }

    fn set_cursor(&mut self, cursor: Cursor, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CanvasController {
        // 1280x800 viewport: frame occupies the whole viewport at (0, 0).
        let mut c = CanvasController::new(1280.0, 800.0);
        c.set_content_visible(true);
        c
    }

    fn click(c: &mut CanvasController, x: f64, y: f64) -> Vec<Action> {
        let mut actions = c.on_pointer_down(&PointerEvent::primary(x, y));
        actions.extend(c.on_pointer_up(Point::new(x + 1.0, y + 1.0)));
        actions
    }

    #[test]
    fn small_release_is_a_click_large_is_a_pan() {
        let mut c = controller();
        c.on_pointer_down(&PointerEvent::primary(100.0, 100.0));
        c.on_pointer_move(Point::new(150.0, 120.0));
        c.on_pointer_up(Point::new(150.0, 120.0));
        assert_eq!(c.mode(), InteractionMode::Normal);
        let vp = c.viewport_state();
        assert_eq!((vp.pan_x, vp.pan_y), (50.0, 20.0));

        click(&mut c, 300.0, 300.0);
        assert_eq!(c.mode(), InteractionMode::Selected);
        assert!(c.frame().selected);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut c = controller();
        let event = PointerEvent {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
        };
        assert!(c.on_pointer_down(&event).is_empty());
        assert!(!c.gesture().is_active());
    }

    #[test]
    fn hidden_content_cannot_be_selected() {
        let mut c = CanvasController::new(1280.0, 800.0);
        click(&mut c, 300.0, 300.0);
        assert_eq!(c.mode(), InteractionMode::Normal);
    }

    #[test]
    fn interactive_mode_disables_overlay_and_passes_through() {
        let mut c = controller();
        click(&mut c, 300.0, 300.0);
        let actions = click(&mut c, 300.0, 300.0);
        assert_eq!(c.mode(), InteractionMode::EmbeddedInteractive);
        assert!(!c.overlay().hit_testing());
        assert!(actions.iter().any(|a| matches!(a, Action::ModeChanged(_))));

        assert_eq!(
            c.on_pointer_down(&PointerEvent::primary(400.0, 400.0)),
            vec![Action::Passthrough]
        );
        assert_eq!(c.on_pointer_up(Point::new(400.0, 400.0)), vec![Action::Passthrough]);
        assert_eq!(c.mode(), InteractionMode::EmbeddedInteractive);
    }

    #[test]
    fn any_button_outside_content_leaves_interaction() {
        let mut c = controller();
        click(&mut c, 300.0, 300.0);
        click(&mut c, 300.0, 300.0);
        assert_eq!(c.mode(), InteractionMode::EmbeddedInteractive);

        let secondary = |x, y| PointerEvent {
            position: Point::new(x, y),
            button: MouseButton::Right,
        };
        assert_eq!(c.on_pointer_down(&secondary(400.0, 400.0)), vec![Action::Passthrough]);
        assert_eq!(c.mode(), InteractionMode::EmbeddedInteractive);

        let actions = c.on_pointer_down(&secondary(1500.0, 1000.0));
        assert!(actions.iter().any(|a| matches!(a, Action::ModeChanged(_))));
        assert_eq!(c.mode(), InteractionMode::Selected);
        assert!(!c.gesture().is_active());
    }

    #[test]
    fn document_press_exits_without_gesture() {
        let mut c = controller();
        assert!(c.on_document_pointer_down().is_empty());

        click(&mut c, 300.0, 300.0);
        assert!(c.on_document_pointer_down().is_empty());
        assert_eq!(c.mode(), InteractionMode::Selected);

        click(&mut c, 300.0, 300.0);
        let actions = c.on_document_pointer_down();
        assert!(actions.iter().any(|a| matches!(a, Action::ModeChanged(_))));
        assert_eq!(c.mode(), InteractionMode::Selected);
        assert!(!c.gesture().is_active());
        let rect = c.frame().rect;
        c.on_pointer_move(Point::new(640.0, 400.0));
        assert_eq!(c.frame().rect, rect);
    }

    #[test]
    fn transform_action_carries_label_and_outline() {
        let mut c = controller();
        click(&mut c, 300.0, 300.0);
        let actions = c.on_wheel(&WheelEvent {
            position: Point::new(0.0, 0.0),
            delta_x: 0.0,
            delta_y: -50.0,
            modifiers: crate::scene::Modifiers {
                cmd: true,
                ..Default::default()
            },
        });
        match &actions[..] {
            [Action::RenderTransform {
                zoom_label,
                selection: Some(outline),
                ..
            }] => {
                assert_eq!(zoom_label, "150%");
                assert_eq!(outline.corner_radius, 12.0);
            }
            other => panic!("unexpected actions: {other:?}"),
        }
    }

    #[test]
    fn named_handle_requires_selection() {
        let mut c = controller();
        assert_eq!(
            c.begin_resize("se", Point::new(1280.0, 800.0)).unwrap_err(),
            CanvasError::NotSelected
        );
        click(&mut c, 300.0, 300.0);
        assert!(matches!(
            c.begin_resize("up", Point::new(0.0, 0.0)),
            Err(CanvasError::UnknownHandle(_))
        ));
        c.begin_resize("se", Point::new(1280.0, 800.0)).unwrap();
        c.on_pointer_move(Point::new(1180.0, 700.0));
        c.on_pointer_up(Point::new(1180.0, 700.0));
        assert_eq!(c.frame().rect, Rect::new(0.0, 0.0, 1180.0, 700.0));
    }

    #[test]
    fn pan_during_resize_is_refused() {
        let mut c = controller();
        click(&mut c, 300.0, 300.0);
        c.begin_resize("e", Point::new(1280.0, 400.0)).unwrap();
        assert!(matches!(
            c.begin_resize("w", Point::new(0.0, 400.0)),
            Err(CanvasError::GestureConflict { .. })
        ));
        let before = c.viewport_state();
        c.on_pointer_down(&PointerEvent::primary(600.0, 400.0));
        assert_eq!(c.viewport_state(), before);
        assert!(matches!(c.gesture(), Gesture::Resizing { .. }));
    }
}
