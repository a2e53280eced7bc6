//! The single content frame living on the canvas.

use crate::geometry::{self, Edges, Point, Rect, ViewportState};

pub const DEFAULT_FRAME_WIDTH: f64 = 1280.0;
pub const DEFAULT_FRAME_HEIGHT: f64 = 800.0;
pub const MIN_FRAME_WIDTH: f64 = 320.0;
pub const MIN_FRAME_HEIGHT: f64 = 200.0;
/// Side length of a resize handle's hit square, in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Frame corner radius in world units.
pub const CORNER_RADIUS: f64 = 8.0;

/// Screen-space outline drawn around the selected frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOutline {
    pub rect: Rect,
    pub corner_radius: f64,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub rect: Rect,
    pub selected: bool,
}

impl Frame {
    /// Default-sized frame centred in a viewport of the given size.
    pub fn centered(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            rect: Rect::new(
                (viewport_width - DEFAULT_FRAME_WIDTH) / 2.0,
                (viewport_height - DEFAULT_FRAME_HEIGHT) / 2.0,
                DEFAULT_FRAME_WIDTH,
                DEFAULT_FRAME_HEIGHT,
            ),
            selected: false,
        }
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    pub fn screen_rect(&self, viewport: &ViewportState) -> Rect {
        viewport.rect_to_screen(self.rect)
    }

    /// Outline for the current transform, or `None` when not selected.
    pub fn selection_outline(&self, viewport: &ViewportState) -> Option<SelectionOutline> {
        self.selected.then(|| SelectionOutline {
            rect: self.screen_rect(viewport),
            corner_radius: CORNER_RADIUS * viewport.zoom,
        })
    }

    /// Which resize handle, if any, sits under a screen point.
    pub fn handle_at(&self, point: Point, viewport: &ViewportState) -> Option<Edges> {
        if !self.selected {
            return None;
        }
        let r = self.screen_rect(viewport);
        let half = HANDLE_SIZE / 2.0;
        let (left, right) = (r.x - half, r.x + r.w - half);
        let (top, bottom) = (r.y - half, r.y + r.h - half);

        // Corners are squares; edge handles run the full side.
        Edges::HANDLES.into_iter().find(|&edges| {
            let x_band = if edges.contains(Edges::W) {
                (left, HANDLE_SIZE)
            } else if edges.contains(Edges::E) {
                (right, HANDLE_SIZE)
            } else {
                (r.x, r.w)
            };
            let y_band = if edges.contains(Edges::N) {
                (top, HANDLE_SIZE)
            } else if edges.contains(Edges::S) {
                (bottom, HANDLE_SIZE)
            } else {
                (r.y, r.h)
            };
            Rect::new(x_band.0, y_band.0, x_band.1, y_band.1).contains(point)
        })
    }

    /// Apply a resize from `start` by a screen-space pointer delta. The delta is
    /// divided by zoom so handles track the cursor 1:1 at any zoom level.
    pub fn resize_from(
        &mut self,
        start: Rect,
        edges: Edges,
        screen_dx: f64,
        screen_dy: f64,
        zoom: f64,
    ) -> Rect {
        self.rect = geometry::resize_rect(
            start,
            edges,
            screen_dx / zoom,
            screen_dy / zoom,
            MIN_FRAME_WIDTH,
            MIN_FRAME_HEIGHT,
        );
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered_with_default_size() {
        let frame = Frame::centered(1600.0, 1000.0);
        assert_eq!(frame.rect, Rect::new(160.0, 100.0, 1280.0, 800.0));
        assert!(!frame.selected);
    }

    #[test]
    fn outline_follows_transform() {
        let mut frame = Frame::centered(1280.0, 800.0);
        let vp = ViewportState {
            pan_x: 10.0,
            pan_y: 20.0,
            zoom: 0.5,
        };
        assert!(frame.selection_outline(&vp).is_none());

        frame.select();
        let outline = frame.selection_outline(&vp).unwrap();
        assert_eq!(outline.rect, Rect::new(10.0, 20.0, 640.0, 400.0));
        assert_eq!(outline.corner_radius, 4.0);

        frame.deselect();
        assert!(frame.selection_outline(&vp).is_none());
    }

    #[test]
    fn handles_are_found_on_edges_and_corners() {
        let mut frame = Frame {
            rect: Rect::new(0.0, 0.0, 400.0, 300.0),
            selected: true,
        };
        let vp = ViewportState::default();
        assert_eq!(frame.handle_at(Point::new(1.0, 1.0), &vp), Some(Edges::NW));
        assert_eq!(frame.handle_at(Point::new(399.0, 299.0), &vp), Some(Edges::SE));
        assert_eq!(frame.handle_at(Point::new(200.0, 2.0), &vp), Some(Edges::N));
        assert_eq!(frame.handle_at(Point::new(401.0, 150.0), &vp), Some(Edges::E));
        assert_eq!(frame.handle_at(Point::new(200.0, 150.0), &vp), None);

        frame.deselect();
        assert_eq!(frame.handle_at(Point::new(1.0, 1.0), &vp), None);
    }

    #[test]
    fn resize_divides_delta_by_zoom() {
        let mut frame = Frame {
            rect: Rect::new(0.0, 0.0, 400.0, 300.0),
            selected: true,
        };
        let start = frame.rect;
        let r = frame.resize_from(start, Edges::E, 100.0, 0.0, 2.0);
        assert_eq!(r.w, 450.0);
        let r = frame.resize_from(start, Edges::S, 0.0, -1000.0, 0.5);
        assert_eq!(r.h, MIN_FRAME_HEIGHT);
        assert_eq!(r.w, 400.0);
    }
}
