use crate::geometry::{self, Point, Rect, ViewportState};
use crate::scene::WheelEvent;

/// Wheel delta (in scroll units) to zoom factor.
pub const WHEEL_ZOOM_SPEED: f64 = 0.01;
/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_THRESHOLD: f64 = 4.0;

/// How a pointer release is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Click(Point),
    Drag,
}

/// Classify a press/release pair by per-axis displacement.
pub fn classify_release(origin: Point, release: Point) -> Release {
    let dx = release.x - origin.x;
    let dy = release.y - origin.y;
    if dx.abs() < CLICK_THRESHOLD && dy.abs() < CLICK_THRESHOLD {
        Release::Click(release)
    } else {
        Release::Drag
    }
}

/// Viewport configuration and state
#[derive(Debug, Clone)]
pub struct Viewport {
    state: ViewportState,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: ViewportState::default(),
            width,
            height,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Zoom toward the cursor with the zoom modifier held, otherwise pan by the
    /// scroll delta. Scrolling down moves content up.
    pub fn on_wheel(&mut self, event: &WheelEvent) -> ViewportState {
        self.state = if event.modifiers.is_zoom() {
            let delta_factor = -event.delta_y * WHEEL_ZOOM_SPEED;
            geometry::zoom_at(event.position, self.state, delta_factor)
        } else {
            geometry::pan_by(self.state, -event.delta_x, -event.delta_y)
        };
        self.state
    }

    /// Absolute drag update: `start + (current - origin)`.
    pub fn drag(&mut self, start: ViewportState, origin: Point, current: Point) -> ViewportState {
        self.state = geometry::pan_by(start, current.x - origin.x, current.y - origin.y);
        self.state
    }

    /// Reset zoom to 100% and pan so `frame` sits in the middle of the viewport.
    pub fn center_on(&mut self, frame: Rect) -> ViewportState {
        self.state = ViewportState {
            pan_x: (self.width - frame.w) / 2.0 - frame.x,
            pan_y: (self.height - frame.h) / 2.0 - frame.y,
            zoom: 1.0,
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::scene::Modifiers;

    fn wheel(x: f64, y: f64, dx: f64, dy: f64, zoom: bool) -> WheelEvent {
        WheelEvent {
            position: Point::new(x, y),
            delta_x: dx,
            delta_y: dy,
            modifiers: Modifiers {
                ctrl: zoom,
                ..Default::default()
            },
        }
    }

    #[test]
    fn modifier_wheel_zooms_at_cursor() {
        let mut vp = Viewport::new(1000.0, 800.0);
        let state = vp.on_wheel(&wheel(100.0, 100.0, 0.0, -100.0, true));
        assert_eq!(state.zoom, 2.0);
        assert_eq!((state.pan_x, state.pan_y), (-100.0, -100.0));
    }

    #[test]
    fn cmd_is_a_zoom_modifier_too() {
        let mut vp = Viewport::new(1000.0, 800.0);
        let mut event = wheel(0.0, 0.0, 0.0, 50.0, false);
        event.modifiers.cmd = true;
        assert_eq!(vp.on_wheel(&event).zoom, 0.5);
    }

    #[test]
    fn plain_wheel_pans_inverted() {
        let mut vp = Viewport::new(1000.0, 800.0);
        let state = vp.on_wheel(&wheel(10.0, 10.0, 5.0, 30.0, false));
        assert_eq!((state.pan_x, state.pan_y, state.zoom), (-5.0, -30.0, 1.0));
    }

    #[test]
    fn drag_is_recomputed_from_start() {
        let mut vp = Viewport::new(1000.0, 800.0);
        let start = vp.state();
        let origin = Point::new(10.0, 10.0);
        for step in 1..=50 {
            vp.drag(start, origin, Point::new(10.0 + step as f64 * 0.1, 10.0));
        }
        vp.drag(start, origin, Point::new(15.0, 13.0));
        vp.drag(start, origin, Point::new(15.0, 13.0));
        assert_eq!((vp.state().pan_x, vp.state().pan_y), (5.0, 3.0));
    }

    #[test]
    fn click_threshold_is_symmetric() {
        let o = Point::new(50.0, 50.0);
        assert_eq!(classify_release(o, Point::new(53.9, 46.1)), Release::Click(Point::new(53.9, 46.1)));
        assert_eq!(classify_release(o, Point::new(54.0, 50.0)), Release::Drag);
        assert_eq!(classify_release(o, Point::new(50.0, 54.0)), Release::Drag);
        assert_eq!(classify_release(o, Point::new(46.0, 50.0)), Release::Drag);
        assert_eq!(classify_release(o, Point::new(50.0, 46.0)), Release::Drag);
    }

    proptest! {
        #[test]
        fn click_or_drag_is_decided_per_axis(
            ox in -1000i32..1000,
            oy in -1000i32..1000,
            // Quarter-pixel steps keep the arithmetic exact.
            qx in -40i32..40,
            qy in -40i32..40,
        ) {
            let origin = Point::new(f64::from(ox), f64::from(oy));
            let at = |qx: i32, qy: i32| {
                Point::new(origin.x + f64::from(qx) * 0.25, origin.y + f64::from(qy) * 0.25)
            };
            let release = classify_release(origin, at(qx, qy));
            let is_click = qx.abs() < 16 && qy.abs() < 16;
            prop_assert_eq!(matches!(release, Release::Click(_)), is_click);

            let swapped = classify_release(origin, at(qy, qx));
            let mirrored = classify_release(origin, at(-qx, -qy));
            prop_assert_eq!(matches!(swapped, Release::Click(_)), is_click);
            prop_assert_eq!(matches!(mirrored, Release::Click(_)), is_click);
        }
    }

    #[test]
    fn center_on_frame() {
        let mut vp = Viewport::new(1600.0, 1000.0);
        let state = vp.center_on(Rect::new(0.0, 0.0, 1280.0, 800.0));
        assert_eq!((state.pan_x, state.pan_y, state.zoom), (160.0, 100.0, 1.0));
    }
}
