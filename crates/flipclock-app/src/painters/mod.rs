//! Turns a [`DisplayState`] into draw commands.
//!
//! Painters only record into the [`DrawList`]; nothing here touches the GPU.
//! All sizes derive from `vmin` (the smaller viewport side) so the clock
//! scales with the window.

mod analogue;
mod controls;
mod digital;

pub use controls::{ControlButton, ControlsLayout, Overlay};

use flipclock_core::{ClockView, DisplayState, Palette, Rgb8};
use flipclock_engine::coords::{Rect, Vec2, Viewport};
use flipclock_engine::paint::Color;
use flipclock_engine::scene::{DrawList, ZIndex};
use flipclock_engine::text::{FontId, FontSystem};

/// Layer for the clock face.
pub const Z_CLOCK: ZIndex = ZIndex(0);
/// Layer for the controls overlay.
pub const Z_CONTROLS: ZIndex = ZIndex(100);

/// Cap height as a fraction of the font size; used to centre digits.
const CAP_HEIGHT: f32 = 0.72;

/// Size of a face at the start of its enter animation.
const ENTER_SCALE: f32 = 0.95;

/// Opaque engine colour from a palette entry.
pub fn rgb(c: Rgb8) -> Color {
    Color::from_srgb_u8(c.r, c.g, c.b, 0xff)
}

/// Draw-list wrapper with text helpers bound to one font.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a FontSystem,
    font: Option<FontId>,
    /// Physical pixels per logical pixel; text is measured at this scale.
    scale: f32,
}

impl<'a> Painter<'a> {
    pub fn new(
        draw_list: &'a mut DrawList,
        fonts: &'a FontSystem,
        font: Option<FontId>,
        scale: f32,
    ) -> Self {
        Self { draw_list, fonts, font, scale }
    }

    #[inline]
    pub fn list(&mut self) -> &mut DrawList {
        self.draw_list
    }

    /// Runs `f` with `clip` pushed, intersected with any enclosing clip.
    pub fn clipped(&mut self, clip: Rect, f: impl FnOnce(&mut Painter<'a>)) {
        self.draw_list.push_clip(clip);
        f(self);
        self.draw_list.pop_clip();
    }

    /// Width and line height of `text`; zero width without a font.
    pub fn measure(&self, text: &str, size: f32) -> Vec2 {
        match self.font {
            Some(font) => self.fonts.measure_text_scaled(text, font, size, self.scale),
            None => Vec2::new(0.0, size * 1.2),
        }
    }

    /// Draws `text` with its digits visually centred on `center`.
    pub fn text_centered(&mut self, z: ZIndex, text: &str, size: f32, color: Color, center: Vec2) {
        let Some(font) = self.font else { return };
        let width = self.measure(text, size).x;
        let ascent = self.fonts.line_metrics(font, size).ascent;
        let baseline = center.y + size * CAP_HEIGHT * 0.5;
        let origin = Vec2::new(center.x - width * 0.5, baseline - ascent);
        self.draw_list.push_text(z, text, font, size, color, origin);
    }

    /// Draws `text` with the top of its capitals at `top_left`.
    pub fn text_at(&mut self, z: ZIndex, text: &str, size: f32, color: Color, top_left: Vec2) {
        let Some(font) = self.font else { return };
        let ascent = self.fonts.line_metrics(font, size).ascent;
        let baseline = top_left.y + size * CAP_HEIGHT;
        let origin = Vec2::new(top_left.x, baseline - ascent);
        self.draw_list.push_text(z, text, font, size, color, origin);
    }
}

/// Colours and size of the mounted face for one frame.
///
/// While the face enters, its colours rise out of the background and it
/// grows from [`ENTER_SCALE`] to full size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Face {
    pub palette: Palette,
    pub scale: f32,
}

impl Face {
    pub fn of(state: &DisplayState) -> Self {
        let t = state.view_enter.clamp(0.0, 1.0);
        let p = state.palette;
        let bg = p.background;
        Self {
            palette: Palette {
                background: bg,
                surface: bg.lerp(p.surface, t),
                accent: bg.lerp(p.accent, t),
                muted: bg.lerp(p.muted, t),
            },
            scale: ENTER_SCALE + (1.0 - ENTER_SCALE) * t,
        }
    }
}

/// Records the whole frame: the mounted clock face, then the overlay.
pub fn paint_clock(
    painter: &mut Painter<'_>,
    state: &DisplayState,
    viewport: Viewport,
    overlay: Overlay,
) {
    if !viewport.is_valid() {
        return;
    }
    let face = Face::of(state);
    match state.view {
        ClockView::Analogue => analogue::paint(painter, state, face, viewport),
        ClockView::Digital => digital::paint(painter, state, face, viewport),
    }
    controls::paint(painter, state, viewport, overlay);
}

/// Smaller side of the viewport, the unit all clock sizes are given in.
pub fn vmin(viewport: Viewport) -> f32 {
    viewport.width.min(viewport.height)
}
