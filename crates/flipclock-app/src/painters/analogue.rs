//! Analogue face on a 100 x 100 unit dial.

use flipclock_core::DisplayState;
use flipclock_engine::coords::{Rect, Vec2, Viewport};
use flipclock_engine::paint::Color;
use flipclock_engine::scene::{Border, DrawCmd, QuadCmd};

use super::{Face, Painter, Z_CLOCK, rgb, vmin};

/// Dial side as a fraction of `vmin`, and its cap in logical pixels.
const FACE_FRACTION: f32 = 0.75;
const FACE_MAX: f32 = 600.0;

const RING_RADIUS: f32 = 48.0;
const NUMERAL_RADIUS: f32 = 34.0;
const NUMERAL_SIZE: f32 = 5.0;

/// Hour marks run from radius 40 to 45, minute dots sit at 42.5.
const HOUR_MARK_OUTER: f32 = 45.0;
const HOUR_MARK_LENGTH: f32 = 5.0;
const HOUR_MARK_WIDTH: f32 = 2.0;
const MINUTE_DOT_RADIUS: f32 = 42.5;

/// Geometry of one dial, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dial {
    pub center: Vec2,
    /// Logical pixels per dial unit.
    pub unit: f32,
}

impl Dial {
    /// Centred in `viewport`, then scaled by `scale`.
    pub fn fit(viewport: Viewport, scale: f32) -> Self {
        let side = (vmin(viewport) * FACE_FRACTION).min(FACE_MAX) * scale;
        Self {
            center: viewport.rect().center(),
            unit: side / 100.0,
        }
    }

    #[inline]
    fn u(&self, v: f32) -> f32 {
        v * self.unit
    }

    /// Point at dial radius `r`, `deg` clockwise from 12.
    #[inline]
    fn at(&self, r: f32, deg: f32) -> Vec2 {
        self.center.polar(self.u(r), deg)
    }
}

pub fn paint(painter: &mut Painter<'_>, state: &DisplayState, face: Face, viewport: Viewport) {
    let dial = Dial::fit(viewport, face.scale);
    let palette = face.palette;
    let muted = rgb(palette.muted);
    let accent = rgb(palette.accent);
    let background = rgb(palette.background);
    let z = Z_CLOCK;
    let c = dial.center;

    painter
        .list()
        .push_ring(z, c, dial.u(RING_RADIUS), dial.u(0.5), muted.faded(0.1));

    paint_ticks(painter, &dial, muted);

    for n in 1..=12u32 {
        let p = dial.at(NUMERAL_RADIUS, n as f32 * 30.0);
        painter.text_centered(z, &n.to_string(), dial.u(NUMERAL_SIZE), accent, p);
    }

    let time = &state.time;
    let list = painter.list();

    // Hour and minute hands: wide at the pivot, narrowing to the tip.
    list.push_hand(
        z,
        c,
        dial.u(24.0),
        dial.u(4.0),
        dial.u(4.0),
        0.25,
        time.hour_angle_deg as f32,
        muted,
    );
    list.push_hand(
        z,
        c,
        dial.u(35.0),
        dial.u(4.0),
        dial.u(3.0),
        0.25,
        time.minute_angle_deg as f32,
        muted,
    );

    let second = time.second_angle_deg as f32;
    list.push_hand(z, c, 0.0, dial.u(12.0), dial.u(2.0), 1.0, second, accent);
    list.push_circle(z, dial.at(12.0, second + 180.0), dial.u(2.5), accent, None);
    list.push_hand(z, c, dial.u(36.0), 0.0, dial.u(1.5), 1.0, second, accent);

    // Pivot ring, stroked outward from r = 3 like the needle it covers.
    list.push_circle(
        z,
        c,
        dial.u(4.0),
        background,
        Some(Border::new(dial.u(2.0), accent)),
    );
    list.push_circle(z, c, dial.u(1.5), accent, None);
}

fn paint_ticks(painter: &mut Painter<'_>, dial: &Dial, muted: Color) {
    let list = painter.list();
    let hour_color = muted.faded(0.9);
    let dot_color = muted.faded(0.4);

    for i in 0..60u32 {
        let deg = i as f32 * 6.0;
        if i % 5 != 0 {
            let p = dial.at(MINUTE_DOT_RADIUS, deg);
            list.push_circle(Z_CLOCK, p, dial.u(0.5), dot_color, None);
            continue;
        }

        // A rotated bar with round caps: the quad spans the straight part
        // and a circle closes each end.
        let cap = HOUR_MARK_WIDTH * 0.5;
        let inner = HOUR_MARK_OUTER - HOUR_MARK_LENGTH + cap;
        let outer = HOUR_MARK_OUTER - cap;
        let rect = Rect::new(
            dial.center.x - dial.u(cap),
            dial.center.y - dial.u(outer),
            dial.u(HOUR_MARK_WIDTH),
            dial.u(outer - inner),
        );
        list.push(
            Z_CLOCK,
            DrawCmd::Quad(QuadCmd {
                rect,
                pivot: dial.center,
                angle_deg: deg,
                taper: 1.0,
                color: hour_color,
            }),
        );
        list.push_circle(Z_CLOCK, dial.at(inner, deg), dial.u(cap), hour_color, None);
        list.push_circle(Z_CLOCK, dial.at(outer, deg), dial.u(cap), hour_color, None);
    }
}
