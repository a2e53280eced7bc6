//! Software pixmap the shell paints every frame before presenting it.
//!
//! Drawing calls take logical coordinates and are scaled to physical pixels
//! here. Colours are straight-alpha RGBA blended over an opaque target.

use malleable_canvas::{Point, Rect};

pub type Rgba = [u8; 4];

pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r, g, b, 255]
}

#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    scale: f64,
    data: Vec<u8>,
}

/// A rectangle in physical pixels, already scaled.
#[derive(Debug, Clone, Copy)]
struct Device {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Raw RGBA rows, `width * 4` bytes each.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.width) / self.scale,
            f64::from(self.height) / self.scale,
        )
    }

    /// Match a new surface size. Contents are undefined afterwards.
    pub fn resize(&mut self, width: u32, height: u32, scale: f64) {
        self.scale = scale;
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.data = vec![0; width as usize * height as usize * 4];
        }
    }

    /// Colour at a physical pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn fill(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let r = self.device(rect);
        let (x0, x1) = self.span_x(r.x.round(), (r.x + r.w).round());
        let (y0, y1) = self.span_y(r.y.round(), (r.y + r.h).round());
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    pub fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Rgba) {
        let r = self.device(rect);
        let radius = (radius * self.scale).clamp(0.0, r.w.min(r.h) / 2.0);
        let (x0, x1) = self.span_x(r.x.floor(), (r.x + r.w).ceil());
        let (y0, y1) = self.span_y(r.y.floor(), (r.y + r.h).ceil());
        for y in y0..y1 {
            for x in x0..x1 {
                let d = round_rect_distance(x as f64 + 0.5, y as f64 + 0.5, r, radius);
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage as f32);
                }
            }
        }
    }

    /// Stroke centred on the rounded outline of `rect`. Only the bands the
    /// stroke can touch are scanned, so large frames stay cheap.
    pub fn stroke_round_rect(&mut self, rect: Rect, radius: f64, width: f64, color: Rgba) {
        let r = self.device(rect);
        let radius = (radius * self.scale).clamp(0.0, r.w.min(r.h) / 2.0);
        let half = width * self.scale / 2.0;
        let reach = half + 1.0;
        let (x0, x1) = self.span_x((r.x - reach).floor(), (r.x + r.w + reach).ceil());
        let (y0, y1) = self.span_y((r.y - reach).floor(), (r.y + r.h + reach).ceil());
        let band = radius + reach;

        for y in y0..y1 {
            let cy = y as f64 + 0.5;
            let straight = cy > r.y + band && cy < r.y + r.h - band;
            let spans = if straight {
                [
                    self.span_x((r.x - reach).floor(), (r.x + reach).ceil()),
                    self.span_x((r.x + r.w - reach).floor(), (r.x + r.w + reach).ceil()),
                ]
            } else {
                [(x0, x1), (x1, x1)]
            };
            for (from, to) in spans {
                for x in from..to {
                    let d = round_rect_distance(x as f64 + 0.5, cy, r, radius);
                    let coverage = (half + 0.5 - d.abs()).clamp(0.0, 1.0);
                    if coverage > 0.0 {
                        self.blend(x, y, color, coverage as f32);
                    }
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        let (cx, cy) = (center.x * self.scale, center.y * self.scale);
        let radius = radius * self.scale;
        let (x0, x1) = self.span_x((cx - radius - 1.0).floor(), (cx + radius + 1.0).ceil());
        let (y0, y1) = self.span_y((cy - radius - 1.0).floor(), (cy + radius + 1.0).ceil());
        for y in y0..y1 {
            for x in x0..x1 {
                let d = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy) - radius;
                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage as f32);
                }
            }
        }
    }

    /// Blend an 8-bit coverage mask whose top-left sits at physical `(x, y)`.
    pub fn blend_mask(&mut self, x: i64, y: i64, width: usize, height: usize, mask: &[u8], color: Rgba) {
        for row in 0..height {
            let py = y + row as i64;
            if py < 0 || py >= i64::from(self.height) {
                continue;
            }
            for col in 0..width {
                let px = x + col as i64;
                if px < 0 || px >= i64::from(self.width) {
                    continue;
                }
                let coverage = mask[row * width + col];
                if coverage > 0 {
                    self.blend(px as u32, py as u32, color, f32::from(coverage) / 255.0);
                }
            }
        }
    }

    fn device(&self, rect: Rect) -> Device {
        Device {
            x: rect.x * self.scale,
            y: rect.y * self.scale,
            w: rect.w * self.scale,
            h: rect.h * self.scale,
        }
    }

    fn span_x(&self, from: f64, to: f64) -> (u32, u32) {
        clamp_span(from, to, self.width)
    }

    fn span_y(&self, from: f64, to: f64) -> (u32, u32) {
        clamp_span(from, to, self.height)
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let alpha = f32::from(color[3]) / 255.0 * coverage;
        for c in 0..3 {
            let dst = f32::from(self.data[i + c]);
            let src = f32::from(color[c]);
            self.data[i + c] = (dst + (src - dst) * alpha).round() as u8;
        }
        self.data[i + 3] = 255;
    }
}

fn clamp_span(from: f64, to: f64, limit: u32) -> (u32, u32) {
    let limit = f64::from(limit);
    let from = from.clamp(0.0, limit);
    let to = to.clamp(from, limit);
    (from as u32, to as u32)
}

/// Signed distance from a point to a rounded rectangle; negative inside.
fn round_rect_distance(px: f64, py: f64, r: Device, radius: f64) -> f64 {
    let (cx, cy) = (r.x + r.w / 2.0, r.y + r.h / 2.0);
    let qx = (px - cx).abs() - (r.w / 2.0 - radius);
    let qy = (py - cy).abs() - (r.h / 2.0 - radius);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    outside + qx.max(qy).min(0.0) - radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba = rgb(10, 10, 10);
    const INK: Rgba = rgb(250, 250, 250);

    fn pixmap(scale: f64) -> Pixmap {
        let mut p = Pixmap::new(200, 100, scale);
        p.fill(BG);
        p
    }

    #[test]
    fn rects_scale_to_physical_pixels() {
        let mut p = pixmap(2.0);
        assert_eq!(p.logical_size(), (100.0, 50.0));
        p.fill_rect(Rect::new(10.0, 10.0, 5.0, 5.0), INK);
        assert_eq!(p.pixel(20, 20), Some(INK));
        assert_eq!(p.pixel(29, 29), Some(INK));
        assert_eq!(p.pixel(30, 30), Some(BG));
        assert_eq!(p.pixel(19, 20), Some(BG));
    }

    #[test]
    fn translucent_colors_blend() {
        let mut p = pixmap(1.0);
        p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [110, 10, 10, 128]);
        let [r, g, b, a] = p.pixel(0, 0).unwrap();
        assert!((59..=61).contains(&r), "{r}");
        assert_eq!((g, b, a), (10, 10, 255));
    }

    #[test]
    fn drawing_off_the_edge_is_clipped() {
        let mut p = pixmap(1.0);
        p.fill_rect(Rect::new(-50.0, -50.0, 60.0, 60.0), INK);
        p.fill_circle(Point::new(205.0, 50.0), 10.0, INK);
        p.stroke_round_rect(Rect::new(-100.0, -100.0, 1000.0, 1000.0), 8.0, 2.0, INK);
        assert_eq!(p.pixel(9, 9), Some(INK));
        assert_eq!(p.pixel(10, 10), Some(BG));
        assert_eq!(p.pixel(199, 50), Some(INK));
    }

    #[test]
    fn stroke_leaves_interior_and_rounded_corners() {
        let mut p = pixmap(1.0);
        p.stroke_round_rect(Rect::new(20.0, 20.0, 160.0, 60.0), 12.0, 2.0, INK);
        // Straight edges.
        assert_eq!(p.pixel(100, 20), Some(INK));
        assert_eq!(p.pixel(20, 50), Some(INK));
        assert_eq!(p.pixel(179, 50), Some(INK));
        // Interior and the cut-away corner stay untouched.
        assert_eq!(p.pixel(100, 50), Some(BG));
        assert_eq!(p.pixel(20, 20), Some(BG));
    }

    #[test]
    fn round_fill_cuts_corners() {
        let mut p = pixmap(1.0);
        p.fill_round_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 20.0, INK);
        assert_eq!(p.pixel(50, 50), Some(INK));
        assert_eq!(p.pixel(0, 50), Some(INK));
        assert_eq!(p.pixel(0, 0), Some(BG));
    }

    #[test]
    fn mask_coverage_scales_alpha() {
        let mut p = pixmap(1.0);
        p.blend_mask(-1, 0, 3, 1, &[255, 255, 0], INK);
        assert_eq!(p.pixel(0, 0), Some(INK));
        assert_eq!(p.pixel(1, 0), Some(BG));
    }
}
