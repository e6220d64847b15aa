//! Presentation fades for theme and view changes.
//!
//! Neither owns a timer: both are pure functions of the instant they were
//! started at, and the model keeps frames coming while they run.

use std::time::{Duration, Instant};

use crate::theme::Palette;

/// Cross-fade between palettes after a theme change.
pub const THEME_FADE: Duration = Duration::from_millis(500);

/// Enter animation of a freshly mounted view.
pub const VIEW_ENTER: Duration = Duration::from_millis(500);

fn linear(started: Option<Instant>, length: Duration, now: Instant) -> f32 {
    match started {
        Some(at) => {
            let elapsed = now.saturating_duration_since(at).as_secs_f32();
            (elapsed / length.as_secs_f32()).min(1.0)
        }
        None => 1.0,
    }
}

fn running(started: Option<Instant>, length: Duration, now: Instant) -> bool {
    started.is_some_and(|at| now.saturating_duration_since(at) < length)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PaletteFade {
    from: Palette,
    to: Palette,
    started: Option<Instant>,
}

impl PaletteFade {
    /// Settled on `palette`, no fade running.
    pub fn new(palette: Palette) -> Self {
        Self {
            from: palette,
            to: palette,
            started: None,
        }
    }

    /// Fades from whatever is on screen at `now` toward `to`.
    pub fn retarget(&mut self, to: Palette, now: Instant) {
        self.from = self.palette(now);
        self.to = to;
        self.started = Some(now);
    }

    /// Jumps to `palette` without fading.
    pub fn settle(&mut self, palette: Palette) {
        *self = Self::new(palette);
    }

    pub fn palette(&self, now: Instant) -> Palette {
        let t = linear(self.started, THEME_FADE, now);
        self.from.lerp(self.to, t)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        running(self.started, THEME_FADE, now)
    }
}

/// Fade-and-grow of a view as it mounts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewEnter {
    started: Option<Instant>,
}

impl ViewEnter {
    pub fn restart(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Eased progress in `[0, 1]`; `1` once settled or never started.
    pub fn progress(&self, now: Instant) -> f32 {
        let t = linear(self.started, VIEW_ENTER, now);
        // Cubic ease-out.
        1.0 - (1.0 - t).powi(3)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        running(self.started, VIEW_ENTER, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Rgb8, ThemeRegistry};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn palette_fade_runs_for_its_length() {
        let themes = ThemeRegistry::builtin();
        let dark = themes.get(0).palette;
        let light = themes.get(1).palette;
        let t0 = Instant::now();

        let mut fade = PaletteFade::new(dark);
        assert!(!fade.is_animating(t0));
        assert_eq!(fade.palette(t0), dark);

        fade.retarget(light, t0);
        assert_eq!(fade.palette(t0), dark);
        assert!(fade.is_animating(t0 + ms(499)));
        assert_eq!(
            fade.palette(t0 + ms(250)).background,
            dark.background.lerp(light.background, 0.5)
        );
        assert_eq!(fade.palette(t0 + ms(500)), light);
        assert!(!fade.is_animating(t0 + ms(500)));
    }

    #[test]
    fn retargeting_mid_fade_starts_from_the_blend_on_screen() {
        let black = Rgb8::new(0, 0, 0);
        let white = Rgb8::new(255, 255, 255);
        let solid = |c| Palette {
            background: c,
            surface: c,
            accent: c,
            muted: c,
        };
        let t0 = Instant::now();

        let mut fade = PaletteFade::new(solid(black));
        fade.retarget(solid(white), t0);
        let midway = fade.palette(t0 + ms(250));
        fade.retarget(solid(black), t0 + ms(250));

        assert_eq!(fade.palette(t0 + ms(250)), midway);
        assert_eq!(fade.palette(t0 + ms(750)), solid(black));
    }

    #[test]
    fn view_enter_eases_out() {
        let t0 = Instant::now();
        let mut enter = ViewEnter::default();
        assert_eq!(enter.progress(t0), 1.0);

        enter.restart(t0);
        assert_eq!(enter.progress(t0), 0.0);
        assert!((enter.progress(t0 + ms(250)) - 0.875).abs() < 1e-3);
        assert_eq!(enter.progress(t0 + ms(500)), 1.0);
        assert!(enter.is_animating(t0 + ms(100)));
        assert!(!enter.is_animating(t0 + ms(500)));
    }
}
