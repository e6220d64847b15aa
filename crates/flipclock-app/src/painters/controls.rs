//! Bottom-right overlay: format, theme, view and fullscreen buttons.

use flipclock_core::{ClockView, Command, DisplayState};
use flipclock_engine::coords::{Rect, Vec2, Viewport};
use flipclock_engine::paint::Color;
use flipclock_engine::scene::Border;

use super::{Painter, Z_CONTROLS, rgb};

const BUTTON: f32 = 48.0;
const SPACING: f32 = 24.0;
const MARGIN: f32 = 32.0;
/// The overlay slides up by this much as it fades in.
const SLIDE: f32 = 16.0;

const LABEL_SIZE: f32 = 20.0;
const STROKE: f32 = 2.5;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ControlButton {
    Format,
    Theme,
    View,
    Fullscreen,
}

impl ControlButton {
    /// Left to right.
    pub const ALL: [ControlButton; 4] = [
        ControlButton::Format,
        ControlButton::Theme,
        ControlButton::View,
        ControlButton::Fullscreen,
    ];

    pub fn command(self) -> Command {
        match self {
            ControlButton::Format => Command::ToggleFormat,
            ControlButton::Theme => Command::CycleTheme,
            ControlButton::View => Command::ToggleView,
            ControlButton::Fullscreen => Command::ToggleFullscreen,
        }
    }
}

/// Button rectangles for one viewport, at rest (fully shown).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlsLayout {
    buttons: [(ControlButton, Rect); 4],
}

impl ControlsLayout {
    pub fn new(viewport: Viewport) -> Self {
        let n = ControlButton::ALL.len() as f32;
        let row = n * BUTTON + (n - 1.0) * SPACING;
        let x0 = viewport.width - MARGIN - row;
        let y = viewport.height - MARGIN - BUTTON;
        let buttons = std::array::from_fn(|i| {
            let x = x0 + i as f32 * (BUTTON + SPACING);
            (ControlButton::ALL[i], Rect::new(x, y, BUTTON, BUTTON))
        });
        Self { buttons }
    }

    pub fn hit(&self, p: Vec2) -> Option<ControlButton> {
        self.buttons
            .iter()
            .find(|(_, r)| r.contains(p))
            .map(|(b, _)| *b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlButton, Rect)> + '_ {
        self.buttons.iter().copied()
    }
}

/// Window state the overlay shows but the model does not own.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Overlay {
    pub pointer: Option<Vec2>,
    pub fullscreen: bool,
}

pub fn paint(
    painter: &mut Painter<'_>,
    state: &DisplayState,
    viewport: Viewport,
    overlay: Overlay,
) {
    let opacity = state.controls_opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    let palette = state.palette;
    let muted = rgb(palette.muted);
    let accent = rgb(palette.accent);
    let dy = SLIDE * (1.0 - opacity);
    let layout = ControlsLayout::new(viewport);

    for (button, rect) in layout.iter() {
        let hovered =
            state.controls_visible && overlay.pointer.is_some_and(|p| rect.contains(p));
        let color = (if hovered { accent } else { muted }).faded(opacity);
        let center = rect.center() + Vec2::new(0.0, dy);

        match button {
            ControlButton::Format => {
                let label = if state.use_24_hour { "24h" } else { "12h" };
                painter.text_centered(Z_CONTROLS, label, LABEL_SIZE, color, center);
            }
            ControlButton::Theme => {
                let surface = rgb(palette.surface).faded(opacity);
                painter.list().push_circle(
                    Z_CONTROLS,
                    center,
                    14.0,
                    surface,
                    Some(Border::new(STROKE, color)),
                );
                painter
                    .list()
                    .push_circle(Z_CONTROLS, center, 5.0, accent.faded(opacity), None);
            }
            ControlButton::View => view_icon(painter, state.view, center, color),
            ControlButton::Fullscreen => {
                fullscreen_icon(painter, overlay.fullscreen, center, color)
            }
        }
    }
}

/// A tiny dial while analogue is shown, two cards while digital is.
fn view_icon(painter: &mut Painter<'_>, view: ClockView, center: Vec2, color: Color) {
    let list = painter.list();
    match view {
        ClockView::Analogue => {
            list.push_ring(Z_CONTROLS, center, 14.0, STROKE, color);
            list.push_hand(Z_CONTROLS, center, 8.0, 0.0, STROKE, 1.0, 0.0, color);
            list.push_hand(Z_CONTROLS, center, 6.0, 0.0, STROKE, 1.0, 90.0, color);
        }
        ClockView::Digital => {
            let size = Vec2::new(11.0, 18.0);
            let left = Rect::centered(center - Vec2::new(7.0, 0.0), size);
            let right = Rect::centered(center + Vec2::new(7.0, 0.0), size);
            list.push_solid_rounded_rect(Z_CONTROLS, left, 2.5, color);
            list.push_solid_rounded_rect(Z_CONTROLS, right, 2.5, color);
        }
    }
}

/// Corner brackets; drawn tighter while fullscreen.
fn fullscreen_icon(painter: &mut Painter<'_>, fullscreen: bool, center: Vec2, color: Color) {
    let half = if fullscreen { 9.0 } else { 14.0 };
    let arm = 7.0;
    let list = painter.list();
    for (sx, sy) in [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let corner = center + Vec2::new(sx * half, sy * half);
        // Horizontal and vertical arms, each running inward from the corner.
        let hx = corner.x.min(corner.x - sx * arm);
        let vy = corner.y.min(corner.y - sy * arm);
        let h = Rect::new(hx, corner.y - STROKE * 0.5, arm, STROKE);
        let v = Rect::new(corner.x - STROKE * 0.5, vy, STROKE, arm);
        list.push_rect(Z_CONTROLS, h, color);
        list.push_rect(Z_CONTROLS, v, color);
    }
}
