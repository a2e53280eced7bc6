//! Click target resolution.
//!
//! The overlay that routes pointer input sits above the content surface, so a
//! plain hit test always lands on the overlay itself. Resolution switches the
//! overlay's hit testing off, asks what is underneath, and switches it back on
//! within one synchronous call.

use crate::frame::Frame;
use crate::geometry::{Point, ViewportState};

/// What the platform reports under a screen point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Overlay,
    Frame,
    Background,
}

/// Platform hit test, equivalent to asking "which element is at this point".
pub trait HitTester {
    /// `overlay_hit_testing` reports whether the overlay would currently
    /// capture the point.
    fn element_at(&self, point: Point, overlay_hit_testing: bool) -> HitTarget;
}

/// The input-routing layer above the content surface.
#[derive(Debug, Clone)]
pub struct Overlay {
    hit_testing: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self { hit_testing: true }
    }
}

impl Overlay {
    pub fn hit_testing(&self) -> bool {
        self.hit_testing
    }

    /// Persistent switch, used while content interaction is active.
    pub fn set_hit_testing(&mut self, enabled: bool) {
        self.hit_testing = enabled;
    }

    /// Resolve the element beneath the overlay at `point`.
    pub fn resolve(&mut self, tester: &dyn HitTester, point: Point) -> HitTarget {
        let saved = self.hit_testing;
        self.hit_testing = false;
        let target = tester.element_at(point, self.hit_testing);
        self.hit_testing = saved;
        target
    }
}

/// Geometric hit test against the canvas frame.
///
/// The frame only counts as a hit once content has been pushed to it; before
/// that the surface is hidden and clicks fall through to the background.
#[derive(Debug, Clone, Copy)]
pub struct FrameHitTester<'a> {
    pub frame: &'a Frame,
    pub viewport: ViewportState,
    pub content_visible: bool,
}

impl HitTester for FrameHitTester<'_> {
    fn element_at(&self, point: Point, overlay_hit_testing: bool) -> HitTarget {
        if overlay_hit_testing {
            return HitTarget::Overlay;
        }
        if self.content_visible && self.frame.screen_rect(&self.viewport).contains(point) {
            HitTarget::Frame
        } else {
            HitTarget::Background
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use std::cell::Cell;

    struct Recording {
        seen: Cell<Option<bool>>,
    }

    impl HitTester for Recording {
        fn element_at(&self, _point: Point, overlay_hit_testing: bool) -> HitTarget {
            self.seen.set(Some(overlay_hit_testing));
            HitTarget::Background
        }
    }

    #[test]
    fn hit_test_is_momentary() {
        let mut overlay = Overlay::default();
        let tester = Recording { seen: Cell::new(None) };
        overlay.resolve(&tester, Point::new(0.0, 0.0));
        assert_eq!(tester.seen.get(), Some(false));
        assert!(overlay.hit_testing());

        overlay.set_hit_testing(false);
        overlay.resolve(&tester, Point::new(0.0, 0.0));
        assert!(!overlay.hit_testing());
    }

    #[test]
    fn frame_tester_sees_through_the_overlay() {
        let frame = Frame {
            rect: Rect::new(100.0, 100.0, 400.0, 300.0),
            selected: false,
        };
        let tester = FrameHitTester {
            frame: &frame,
            viewport: ViewportState::default(),
            content_visible: true,
        };
        let mut overlay = Overlay::default();
        let inside = Point::new(150.0, 150.0);
        assert_eq!(tester.element_at(inside, true), HitTarget::Overlay);
        assert_eq!(overlay.resolve(&tester, inside), HitTarget::Frame);
        assert_eq!(overlay.resolve(&tester, Point::new(50.0, 50.0)), HitTarget::Background);

        let hidden = FrameHitTester {
            content_visible: false,
            ..tester
        };
        assert_eq!(overlay.resolve(&hidden, inside), HitTarget::Background);
    }
}
