//! Text rasterisation for the painter.
//!
//! Glyphs are laid out and rasterised by fontdue at physical size. The face
//! is a system sans-serif found through fontdb. Without a face the painter
//! still works but measures and draws nothing.

use anyhow::{Result, anyhow};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};

use crate::paint::{Pixmap, Rgba};

pub struct TextPainter {
    font: Option<Font>,
}

impl TextPainter {
    pub fn from_bytes(bytes: &[u8], collection_index: u32) -> Result<Self> {
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| anyhow!(e))?;
        Ok(Self { font: Some(font) })
    }

    /// Load a reasonable system sans-serif face.
    pub fn from_system_fonts() -> Result<Self> {
        use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let id = db
            .query(&Query {
                families: &[
                    Family::SansSerif,
                    Family::Name("Segoe UI"),
                    Family::Name("SF Pro Text"),
                    Family::Name("Arial"),
                ],
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
            .ok_or_else(|| anyhow!("no suitable system font found"))?;

        let face = db
            .face(id)
            .ok_or_else(|| anyhow!("fontdb face missing for system font id"))?;

        let bytes: Vec<u8> = match &face.source {
            Source::File(path) => std::fs::read(path)?,
            Source::Binary(data) => data.as_ref().as_ref().to_vec(),
            Source::SharedFile(_, data) => data.as_ref().as_ref().to_vec(),
        };
        Self::from_bytes(&bytes, face.index)
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Logical `(width, height)` of `text` at `px`, wrapped at `max_width`.
    pub fn measure(&self, text: &str, px: f32, max_width: Option<f32>) -> (f32, f32) {
        self.measure_scaled(text, px, max_width, 1.0)
    }

    fn measure_scaled(&self, text: &str, px: f32, max_width: Option<f32>, scale: f32) -> (f32, f32) {
        let Some(font) = &self.font else {
            return (0.0, 0.0);
        };
        let layout = layout(font, text, px * scale, max_width.map(|w| w * scale));
        let width = layout
            .glyphs()
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0, f32::max);
        (width / scale, layout.height() / scale)
    }

    /// Draw `text` with its top-left corner at logical `(x, y)`. Returns the
    /// logical height used.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f64,
        y: f64,
        px: f32,
        max_width: Option<f32>,
        color: Rgba,
    ) -> f32 {
        let Some(font) = &self.font else {
            return 0.0;
        };
        let scale = pixmap.scale() as f32;
        let layout = layout(font, text, px * scale, max_width.map(|w| w * scale));
        let (ox, oy) = (x * pixmap.scale(), y * pixmap.scale());
        for g in layout.glyphs() {
            if g.width == 0 || g.height == 0 {
                continue;
            }
            let (metrics, bitmap) = font.rasterize_indexed(g.key.glyph_index, g.key.px);
            pixmap.blend_mask(
                (ox + f64::from(g.x)).round() as i64,
                (oy + f64::from(g.y)).round() as i64,
                metrics.width,
                metrics.height,
                &bitmap,
                color,
            );
        }
        layout.height() / scale
    }
}

fn layout(font: &Font, text: &str, px: f32, max_width: Option<f32>) -> Layout {
    let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        x: 0.0,
        y: 0.0,
        max_width,
        ..LayoutSettings::default()
    });
    layout.append(&[font], &TextStyle::new(text, px.max(1.0), 0));
    layout
}
