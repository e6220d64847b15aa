//! Flip-card face: hours and minutes cards plus plain seconds.
//!
//! A card is drawn as two halves split at the fold, each a clipped copy of
//! the full card. The moving flap is one more clipped copy whose clip
//! collapses toward the fold (flipping out) or grows from it (flipping in).

use std::f32::consts::FRAC_PI_2;

use flipclock_core::{DisplayState, FlipPhase, FlipState};
use flipclock_engine::coords::{CornerRadii, Rect, Vec2, Viewport};
use flipclock_engine::paint::Color;
use flipclock_engine::scene::Border;

use super::{Face, Painter, Z_CLOCK, rgb, vmin};

const CARD: f32 = 0.28;
const DIGITS: f32 = 0.22;
const SECONDS: f32 = 0.10;
const LABEL: f32 = 0.025;
const GAP: f32 = 0.03;
const SECONDS_GAP: f32 = 0.02;

/// Darkest shading on a flap, reached edge-on.
const FLAP_SHADE: f32 = 0.35;

/// Positions and sizes of everything on the digital face.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DigitalLayout {
    pub hours: Rect,
    pub minutes: Rect,
    pub seconds_center: Vec2,
    pub digit_size: f32,
    pub seconds_size: f32,
    pub label_size: f32,
    pub radius: f32,
}

impl DigitalLayout {
    /// Centres the row in the viewport, scaled by `scale`.
    ///
    /// Everything scales with `vmin`, and the row is narrower than `vmin`,
    /// so it always fits.
    pub fn fit(viewport: Viewport, scale: f32) -> Self {
        let v = vmin(viewport) * scale;
        let card = v * CARD;
        let gap = v * GAP;
        let seconds_size = v * SECONDS;
        // Two tabular digits are roughly 1.2 em wide.
        let seconds_width = seconds_size * 1.2;
        let row = card * 2.0 + gap * 2.0 + v * SECONDS_GAP + seconds_width;

        let x0 = (viewport.width - row) * 0.5;
        let y0 = (viewport.height - card) * 0.5;
        let hours = Rect::new(x0, y0, card, card);
        let minutes = Rect::new(x0 + card + gap, y0, card, card);
        let seconds_x = minutes.max().x + gap + v * SECONDS_GAP + seconds_width * 0.5;

        Self {
            hours,
            minutes,
            seconds_center: Vec2::new(seconds_x, viewport.height * 0.5),
            digit_size: v * DIGITS,
            seconds_size,
            label_size: v * LABEL,
            radius: card * 0.05,
        }
    }
}

struct CardStyle {
    surface: Color,
    digits: Color,
    label: Color,
    digit_size: f32,
    label_size: f32,
    radius: f32,
}

pub fn paint(painter: &mut Painter<'_>, state: &DisplayState, face: Face, viewport: Viewport) {
    let layout = DigitalLayout::fit(viewport, face.scale);
    let palette = face.palette;
    let style = CardStyle {
        surface: rgb(palette.surface),
        digits: rgb(palette.accent),
        label: rgb(palette.muted).faded(0.8),
        digit_size: layout.digit_size,
        label_size: layout.label_size,
        radius: layout.radius,
    };

    let time = &state.time;
    let hours = or_idle(state.hours.as_ref(), &time.hours_text);
    let minutes = or_idle(state.minutes.as_ref(), &time.minutes_text);
    let label = time.meridiem.map(|m| m.as_str());

    paint_card(painter, layout.hours, &hours, label, &style);
    paint_card(painter, layout.minutes, &minutes, None, &style);

    painter.text_centered(
        Z_CLOCK,
        &time.seconds_text,
        layout.seconds_size,
        rgb(palette.accent).faded(0.8),
        layout.seconds_center,
    );
}

fn or_idle(flip: Option<&FlipState>, text: &str) -> FlipState {
    match flip {
        Some(f) => f.clone(),
        None => FlipState {
            settled: text.to_string(),
            previous: text.to_string(),
            phase: FlipPhase::Idle,
            progress: 0.0,
        },
    }
}

/// Upper and lower halves, then the flap for the current phase.
fn paint_card(
    painter: &mut Painter<'_>,
    card: Rect,
    flip: &FlipState,
    label: Option<&str>,
    style: &CardStyle,
) {
    let (upper, lower) = card.split_half();
    let fold = upper.max().y;

    match flip.phase {
        FlipPhase::Idle => {
            paint_half(painter, card, upper, &flip.settled, label, style);
            paint_half(painter, card, lower, &flip.settled, label, style);
        }
        FlipPhase::FlippingOut => {
            paint_half(painter, card, upper, &flip.settled, label, style);
            paint_half(painter, card, lower, &flip.previous, label, style);
            let flap = flap_out(upper, flip.progress);
            paint_half(painter, card, flap, &flip.previous, label, style);
            shade(painter, flap, FLAP_SHADE * flip.progress);
        }
        FlipPhase::FlippingIn => {
            paint_half(painter, card, upper, &flip.settled, label, style);
            paint_half(painter, card, lower, &flip.previous, label, style);
            let flap = flap_in(lower, flip.progress);
            paint_half(painter, card, flap, &flip.settled, label, style);
            shade(painter, flap, FLAP_SHADE * (1.0 - flip.progress));
        }
    }

    let list = painter.list();
    let seam = (card.size.y * 0.006).max(1.0);
    list.push_rect(
        Z_CLOCK,
        Rect::new(card.origin.x, fold - seam * 0.5, card.size.x, seam),
        Color::BLACK.faded(0.25),
    );
    list.push_rounded_rect(
        Z_CLOCK,
        card,
        CornerRadii::all(style.radius),
        Color::TRANSPARENT,
        Some(Border::new(1.0, Color::WHITE.faded(0.05))),
    );
}

/// Upper flap at `progress` through flipping out: hinged at the fold, its
/// visible height follows the cosine of a quarter turn.
fn flap_out(upper: Rect, progress: f32) -> Rect {
    let h = upper.size.y * (progress.clamp(0.0, 1.0) * FRAC_PI_2).cos();
    Rect::new(upper.origin.x, upper.max().y - h, upper.size.x, h)
}

/// Lower flap at `progress` through flipping in, growing down from the fold.
fn flap_in(lower: Rect, progress: f32) -> Rect {
    let h = lower.size.y * (progress.clamp(0.0, 1.0) * FRAC_PI_2).sin();
    Rect::new(lower.origin.x, lower.origin.y, lower.size.x, h)
}

/// The whole card clipped to `clip`: housing, digits, and the meridiem
/// label where the clip reaches it.
fn paint_half(
    painter: &mut Painter<'_>,
    card: Rect,
    clip: Rect,
    value: &str,
    label: Option<&str>,
    style: &CardStyle,
) {
    painter.clipped(clip, |p| {
        p.list()
            .push_solid_rounded_rect(Z_CLOCK, card, style.radius, style.surface);
        p.text_centered(Z_CLOCK, value, style.digit_size, style.digits, card.center());
        if let Some(label) = label {
            let inset = card.size.x * 0.055;
            let at = card.origin + Vec2::new(inset, inset);
            p.text_at(Z_CLOCK, label, style.label_size, style.label, at);
        }
    });
}

fn shade(painter: &mut Painter<'_>, flap: Rect, alpha: f32) {
    if alpha <= 0.0 || flap.is_empty() {
        return;
    }
    painter.list().push_rect(Z_CLOCK, flap, Color::BLACK.faded(alpha));
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipclock_engine::scene::{DrawCmd, DrawList};
    use flipclock_engine::text::FontSystem;

    fn style() -> CardStyle {
        CardStyle {
            surface: Color::WHITE,
            digits: Color::BLACK,
            label: Color::BLACK,
            digit_size: 40.0,
            label_size: 5.0,
            radius: 4.0,
        }
    }

    fn flip(phase: FlipPhase, progress: f32) -> FlipState {
        FlipState {
            settled: "05".into(),
            previous: "04".into(),
            phase,
            progress,
        }
    }

    /// Clips of the card housings drawn, in paint order.
    fn housing_clips(list: &DrawList) -> Vec<Rect> {
        list.items()
            .iter()
            .filter(|item| matches!(&item.cmd, DrawCmd::RoundedRect(r) if r.border.is_none()))
            .filter_map(|item| item.clip_rect)
            .collect()
    }

    fn paint_one(state: &FlipState) -> DrawList {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut painter = Painter::new(&mut list, &fonts, None, 1.0);
        paint_card(&mut painter, Rect::new(0.0, 0.0, 100.0, 100.0), state, None, &style());
        list
    }

    #[test]
    fn layout_is_centred_and_fits() {
        let vp = Viewport::new(800.0, 600.0);
        let l = DigitalLayout::fit(vp, 1.0);
        assert!(l.hours.origin.x > 0.0);
        assert!(l.seconds_center.x < vp.width);
        assert_eq!(l.hours.center().y, 300.0);
        assert!(l.minutes.origin.x > l.hours.max().x);
    }

    #[test]
    fn entering_row_shrinks_about_the_centre() {
        let vp = Viewport::new(800.0, 600.0);
        let full = DigitalLayout::fit(vp, 1.0);
        let entering = DigitalLayout::fit(vp, 0.95);
        assert!(entering.hours.size.x < full.hours.size.x);
        assert!((entering.hours.center().y - full.hours.center().y).abs() < 1e-3);
        assert!(entering.hours.origin.x > full.hours.origin.x);
        assert!(entering.seconds_center.x < full.seconds_center.x);
    }

    #[test]
    fn tall_windows_keep_the_row_inside() {
        let vp = Viewport::new(300.0, 900.0);
        let l = DigitalLayout::fit(vp, 1.0);
        assert!(l.hours.origin.x >= 0.0);
        assert!(l.seconds_center.x + l.seconds_size * 0.6 <= vp.width);
    }

    #[test]
    fn idle_card_is_two_halves() {
        let list = paint_one(&flip(FlipPhase::Idle, 0.0));
        let clips = housing_clips(&list);
        assert_eq!(
            clips,
            vec![Rect::new(0.0, 0.0, 100.0, 50.0), Rect::new(0.0, 50.0, 100.0, 50.0)]
        );
    }

    #[test]
    fn flipping_out_flap_collapses_toward_the_fold() {
        let list = paint_one(&flip(FlipPhase::FlippingOut, 0.5));
        let clips = housing_clips(&list);
        assert_eq!(clips.len(), 3);

        let flap = clips[2];
        assert!((flap.max().y - 50.0).abs() < 1e-4);
        let expected = 50.0 * (0.5 * FRAC_PI_2).cos();
        assert!((flap.size.y - expected).abs() < 1e-4);
    }

    #[test]
    fn flipping_in_flap_starts_hidden_and_ends_covering_the_lower_half() {
        let lower = Rect::new(0.0, 50.0, 100.0, 50.0);
        assert!(flap_in(lower, 0.0).is_empty());

        let end = flap_in(lower, 1.0);
        assert_eq!(end.origin, lower.origin);
        assert!((end.size.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn flipping_out_starts_fully_covering_the_upper_half() {
        let upper = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(flap_out(upper, 0.0), upper);
        assert!(flap_out(upper, 1.0).size.y < 1e-4);
    }
}
