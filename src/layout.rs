//! Window zones: chat panel on the left, canvas on the right, with a
//! draggable divider between them.

use malleable_canvas::{Point, Rect};

/// Narrowest the chat panel may get.
pub const PANEL_MIN_WIDTH: f64 = 320.0;
/// Width always left for the canvas.
pub const CANVAS_MIN_WIDTH: f64 = 300.0;
/// Grab width of the divider, centred on the panel edge.
pub const DIVIDER_WIDTH: f64 = 6.0;

/// Zone identifiers for hit testing and layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneId {
    Chat,
    Divider,
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneLayout {
    pub chat: Rect,
    pub divider: Rect,
    pub canvas: Rect,
}

/// Panel width for a divider dropped at `x` inside a container `container`
/// pixels wide. The canvas keeps its minimum before the panel keeps its own.
pub fn clamp_panel_width(x: f64, container: f64) -> f64 {
    x.min(container - CANVAS_MIN_WIDTH).max(PANEL_MIN_WIDTH)
}

impl ZoneLayout {
    /// Calculate zone layout based on window dimensions
    pub fn calculate(width: f64, height: f64, panel_width: f64) -> Self {
        let panel = clamp_panel_width(panel_width, width);
        let chat = Rect::new(0.0, 0.0, panel, height);
        let divider = Rect::new(panel - DIVIDER_WIDTH / 2.0, 0.0, DIVIDER_WIDTH, height);
        let canvas = Rect::new(panel, 0.0, (width - panel).max(0.0), height);
        Self { chat, divider, canvas }
    }

    pub fn get_zone(&self, zone: ZoneId) -> Rect {
        match zone {
            ZoneId::Chat => self.chat,
            ZoneId::Divider => self.divider,
            ZoneId::Canvas => self.canvas,
        }
    }

    /// Zone under a window point. The divider wins over both neighbours.
    pub fn zone_at(&self, p: Point) -> Option<ZoneId> {
        [ZoneId::Divider, ZoneId::Canvas, ZoneId::Chat]
            .into_iter()
            .find(|zone| self.get_zone(*zone).contains(p))
    }

    /// Window point in canvas-viewport coordinates.
    pub fn to_canvas(&self, p: Point) -> Point {
        Point::new(p.x - self.canvas.x, p.y - self.canvas.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_width_is_clamped() {
        assert_eq!(clamp_panel_width(100.0, 1400.0), 320.0);
        assert_eq!(clamp_panel_width(500.0, 1400.0), 500.0);
        assert_eq!(clamp_panel_width(1300.0, 1400.0), 1100.0);
        // Too narrow for both minimums: the panel minimum wins.
        assert_eq!(clamp_panel_width(500.0, 500.0), 320.0);
    }

    #[test]
    fn zones_split_the_window() {
        let layout = ZoneLayout::calculate(1400.0, 900.0, 400.0);
        assert_eq!(layout.chat, Rect::new(0.0, 0.0, 400.0, 900.0));
        assert_eq!(layout.canvas, Rect::new(400.0, 0.0, 1000.0, 900.0));
        assert_eq!(layout.zone_at(Point::new(10.0, 10.0)), Some(ZoneId::Chat));
        assert_eq!(layout.zone_at(Point::new(401.0, 10.0)), Some(ZoneId::Divider));
        assert_eq!(layout.zone_at(Point::new(900.0, 10.0)), Some(ZoneId::Canvas));
        assert_eq!(layout.zone_at(Point::new(900.0, 950.0)), None);
        assert_eq!(layout.to_canvas(Point::new(500.0, 20.0)), Point::new(100.0, 20.0));
    }
}
