use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

#[derive(Debug, Clone, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Vertical metrics of one line at a given size, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_height: f32,
}

/// Owns the loaded fonts.
///
/// Fonts are immutable after loading. The renderer borrows the system each
/// frame so it can rasterise glyphs it has not cached yet.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TrueType or OpenType font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?} as {id:?}", font_name(&self.fonts[id.0]));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Ascent, descent and line height for `id` at `size`.
    ///
    /// Unknown ids fall back to a 0.8/0.2 split of `1.2 * size`.
    pub fn line_metrics(&self, id: FontId, size: f32) -> LineMetrics {
        match self.get(id).and_then(|f| f.horizontal_line_metrics(size)) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: -m.descent,
                line_height: m.new_line_size,
            },
            None => LineMetrics {
                ascent: size * 0.96,
                descent: size * 0.24,
                line_height: size * 1.2,
            },
        }
    }

    /// Width and height of a single line of `text`, in logical pixels.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        self.measure_text_scaled(text, id, size, 1.0)
    }

    /// Lays out at `size * scale` and divides back, so measurements match
    /// the renderer's physical-pixel glyph positions.
    #[must_use]
    pub fn measure_text_scaled(&self, text: &str, id: FontId, size: f32, scale: f32) -> Vec2 {
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, size * 1.2);
        };

        let scale = scale.max(0.01);
        let phys_size = size * scale;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, phys_size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, size * 1.2);
        }

        // Pen position after each glyph, not the bitmap edge.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, phys_size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max)
            / scale;
        let h = layout.height() / scale;
        Vec2::new(w, h)
    }
}

fn font_name(font: &fontdue::Font) -> &str {
    font.name().unwrap_or("<unnamed>")
}
