//! Pan/zoom and rectangle math for the infinite canvas.
//!
//! Everything here is a pure function over plain values. Screen space is
//! relative to the canvas viewport origin; world space is the coordinate
//! system the frame lives in. `screen = pan + world * zoom`.

use std::fmt;
use std::str::FromStr;

use crate::error::CanvasError;

pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

/// Pan offset and zoom factor of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl ViewportState {
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.zoom, (p.y - self.pan_y) / self.zoom)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(self.pan_x + p.x * self.zoom, self.pan_y + p.y * self.zoom)
    }

    /// Map a world-space rectangle into screen space.
    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        let origin = self.world_to_screen(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.w * self.zoom, r.h * self.zoom)
    }

    /// Zoom percentage shown in the indicator, e.g. `"150%"`.
    pub fn zoom_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i64)
    }
}

/// Anchored zoom: scale by `1 + delta_factor` keeping the world point under
/// `cursor` fixed on screen. The resulting zoom is clamped to
/// [`ZOOM_MIN`, `ZOOM_MAX`].
pub fn zoom_at(cursor: Point, viewport: ViewportState, delta_factor: f64) -> ViewportState {
    let world = viewport.screen_to_world(cursor);
    let new_zoom = (viewport.zoom * (1.0 + delta_factor)).clamp(ZOOM_MIN, ZOOM_MAX);

    ViewportState {
        pan_x: cursor.x - world.x * new_zoom,
        pan_y: cursor.y - world.y * new_zoom,
        zoom: new_zoom,
    }
}

/// Plain translation. The canvas is unbounded so nothing is clamped.
pub fn pan_by(viewport: ViewportState, dx: f64, dy: f64) -> ViewportState {
    ViewportState {
        pan_x: viewport.pan_x + dx,
        pan_y: viewport.pan_y + dy,
        zoom: viewport.zoom,
    }
}

/// Set of rectangle edges a resize acts on. A corner is the union of two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Edges(u8);

impl Edges {
    pub const NONE: Edges = Edges(0);
    pub const N: Edges = Edges(0b0001);
    pub const S: Edges = Edges(0b0010);
    pub const E: Edges = Edges(0b0100);
    pub const W: Edges = Edges(0b1000);
    pub const NE: Edges = Edges(0b0101);
    pub const NW: Edges = Edges(0b1001);
    pub const SE: Edges = Edges(0b0110);
    pub const SW: Edges = Edges(0b1010);

    /// Every handle, in the order they are hit-tested (corners first).
    pub const HANDLES: [Edges; 8] = [
        Edges::NW,
        Edges::NE,
        Edges::SW,
        Edges::SE,
        Edges::N,
        Edges::S,
        Edges::E,
        Edges::W,
    ];

    pub const fn union(self, other: Edges) -> Edges {
        Edges(self.0 | other.0)
    }

    pub const fn contains(self, other: Edges) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Edges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (edge, name) in [(Edges::N, 'n'), (Edges::S, 's'), (Edges::E, 'e'), (Edges::W, 'w')] {
            if self.contains(edge) {
                write!(f, "{name}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Edges {
    type Err = CanvasError;

    /// Parses handle names such as `"n"`, `"se"` or `"wn"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CanvasError::UnknownHandle(s.to_string()));
        }
        let mut edges = Edges::NONE;
        for c in s.chars() {
            let edge = match c.to_ascii_lowercase() {
                'n' => Edges::N,
                's' => Edges::S,
                'e' => Edges::E,
                'w' => Edges::W,
                _ => return Err(CanvasError::UnknownHandle(s.to_string())),
            };
            edges = edges.union(edge);
        }
        if (edges.contains(Edges::N) && edges.contains(Edges::S))
            || (edges.contains(Edges::E) && edges.contains(Edges::W))
        {
            return Err(CanvasError::UnknownHandle(s.to_string()));
        }
        Ok(edges)
    }
}

/// Resize `rect` by a world-space delta acting on `edges`.
///
/// Trailing edges (`e`, `s`) grow the size and clamp it at the minimum.
/// Leading edges (`w`, `n`) clamp the shift first so the size never drops
/// under the minimum, then move the origin by the clamped shift; the
/// opposite edge stays put. The final `max` only absorbs rounding error.
pub fn resize_rect(rect: Rect, edges: Edges, dx: f64, dy: f64, min_w: f64, min_h: f64) -> Rect {
    let mut out = rect;

    if edges.contains(Edges::E) {
        out.w = (rect.w + dx).max(min_w);
    }
    if edges.contains(Edges::W) {
        let clamped_dx = dx.min(rect.w - min_w);
        out.x = rect.x + clamped_dx;
        out.w = (rect.w - clamped_dx).max(min_w);
    }
    if edges.contains(Edges::S) {
        out.h = (rect.h + dy).max(min_h);
    }
    if edges.contains(Edges::N) {
        let clamped_dy = dy.min(rect.h - min_h);
        out.y = rect.y + clamped_dy;
        out.h = (rect.h - clamped_dy).max(min_h);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn arb_viewport() -> impl Strategy<Value = ViewportState> {
        (-1e4..1e4f64, -1e4..1e4f64, ZOOM_MIN..=ZOOM_MAX)
            .prop_map(|(pan_x, pan_y, zoom)| ViewportState { pan_x, pan_y, zoom })
    }

    fn arb_point() -> impl Strategy<Value = Point> {
        (-2e3..4e3f64, -2e3..4e3f64).prop_map(|(x, y)| Point::new(x, y))
    }

    fn arb_edges() -> impl Strategy<Value = Edges> {
        prop::sample::select(Edges::HANDLES.to_vec())
    }

    proptest! {
        #[test]
        fn zoom_keeps_world_point_under_cursor(
            vp in arb_viewport(),
            cursor in arb_point(),
            delta in -3.0..25.0f64,
        ) {
            let before = vp.screen_to_world(cursor);
            let after_vp = zoom_at(cursor, vp, delta);
            let after = after_vp.screen_to_world(cursor);
            prop_assert!((before.x - after.x).abs() < EPS, "{} vs {}", before.x, after.x);
            prop_assert!((before.y - after.y).abs() < EPS, "{} vs {}", before.y, after.y);
        }

        #[test]
        fn zoom_stays_in_range(vp in arb_viewport(), cursor in arb_point(), delta in -1e3..1e3f64) {
            let zoom = zoom_at(cursor, vp, delta).zoom;
            prop_assert!((ZOOM_MIN..=ZOOM_MAX).contains(&zoom), "zoom {zoom}");
        }

        #[test]
        fn minimum_holds_for_any_delta_sequence(
            steps in prop::collection::vec((arb_edges(), -1e4..1e4f64, -1e4..1e4f64), 1..40),
        ) {
            let mut rect = Rect::new(0.0, 0.0, 400.0, 300.0);
            for (edges, dx, dy) in steps {
                rect = resize_rect(rect, edges, dx, dy, 320.0, 200.0);
                prop_assert!(rect.w >= 320.0 && rect.h >= 200.0, "{} {:?}", edges, rect);
            }
        }
    }

    #[test]
    fn zoom_scenario_from_origin() {
        let vp = ViewportState::default();
        let out = zoom_at(Point::new(100.0, 100.0), vp, 1.0);
        assert_eq!(out.zoom, 2.0);
        assert_eq!(out.pan_x, -100.0);
        assert_eq!(out.pan_y, -100.0);
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let vp = ViewportState { zoom: 2.5, ..Default::default() };
        assert_eq!(zoom_at(Point::default(), vp, 10.0).zoom, ZOOM_MAX);
        let vp = ViewportState { zoom: 0.2, ..Default::default() };
        assert_eq!(zoom_at(Point::default(), vp, -0.9).zoom, ZOOM_MIN);
        // A factor at or below -1 would flip the sign without the clamp.
        assert_eq!(zoom_at(Point::default(), vp, -3.0).zoom, ZOOM_MIN);
    }

    #[test]
    fn pan_is_unbounded_translation() {
        let vp = pan_by(ViewportState::default(), -1e7, 42.0);
        assert_eq!((vp.pan_x, vp.pan_y, vp.zoom), (-1e7, 42.0, 1.0));
    }

    #[test]
    fn west_inward_drag_moves_origin() {
        let r = resize_rect(Rect::new(0.0, 0.0, 400.0, 300.0), Edges::W, 50.0, 0.0, 320.0, 200.0);
        assert_eq!(r, Rect::new(50.0, 0.0, 350.0, 300.0));
    }

    #[test]
    fn leading_edges_stop_at_minimum_without_overshoot() {
        let r = resize_rect(Rect::new(0.0, 0.0, 400.0, 300.0), Edges::NW, 9999.0, 9999.0, 320.0, 200.0);
        assert_eq!(r, Rect::new(80.0, 100.0, 320.0, 200.0));
        // Right and bottom edges did not move.
        assert_eq!(r.x + r.w, 400.0);
        assert_eq!(r.y + r.h, 300.0);
    }

    #[test]
    fn leading_edges_grow_outward_freely() {
        let r = resize_rect(Rect::new(10.0, 10.0, 400.0, 300.0), Edges::W, -9999.0, 0.0, 320.0, 200.0);
        assert_eq!(r, Rect::new(-9989.0, 10.0, 10399.0, 300.0));
    }

    #[test]
    fn trailing_edges_clamp_size() {
        let r = resize_rect(Rect::new(5.0, 5.0, 400.0, 300.0), Edges::SE, -1000.0, -1000.0, 320.0, 200.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 320.0, 200.0));
    }

    #[test]
    fn parses_handle_names() {
        assert_eq!("ne".parse::<Edges>().unwrap(), Edges::NE);
        assert_eq!("WS".parse::<Edges>().unwrap(), Edges::SW);
        assert!("x".parse::<Edges>().is_err());
        assert!("ns".parse::<Edges>().is_err());
        assert!("".parse::<Edges>().is_err());
        assert_eq!(Edges::SE.to_string(), "se");
    }

    #[test]
    fn zoom_label_rounds() {
        let vp = ViewportState { zoom: 1.234, ..Default::default() };
        assert_eq!(vp.zoom_label(), "123%");
        let vp = ViewportState { zoom: 0.1, ..Default::default() };
        assert_eq!(vp.zoom_label(), "10%");
    }
}
