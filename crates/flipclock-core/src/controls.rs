//! Auto-hiding control overlay state.

use std::time::{Duration, Instant};

use crate::timer::{Expired, TimerHandle, TimerQueue};

/// Inactivity period after which the controls hide.
pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(3);

/// Length of the show/hide fade. Presentation only.
pub const CONTROLS_FADE: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct ControlsVisibility {
    visible: bool,
    changed_at: Option<Instant>,
    hide_after: Duration,
    timer: Option<TimerHandle>,
}

impl Default for ControlsVisibility {
    fn default() -> Self {
        Self::new(CONTROLS_HIDE_DELAY)
    }
}

impl ControlsVisibility {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            visible: false,
            changed_at: None,
            hide_after,
            timer: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Records activity: shows the controls and restarts the hide timer.
    pub fn show(&mut self, queue: &TimerQueue, now: Instant) {
        if !self.visible {
            self.visible = true;
            self.changed_at = Some(now);
            log::trace!("controls shown");
        }
        self.timer = Some(queue.schedule_once(now, self.hide_after));
    }

    /// Returns `true` if `expired` was the hide timer.
    pub fn on_timer(&mut self, expired: Expired) -> bool {
        if !self.timer.as_ref().is_some_and(|h| h.id() == expired.id) {
            return false;
        }
        self.timer = None;
        self.visible = false;
        self.changed_at = Some(expired.deadline);
        log::trace!("controls hidden");
        true
    }

    /// Cancels the hide timer without changing visibility.
    pub fn dispose(&mut self) {
        self.timer = None;
    }

    /// Overlay opacity in `[0, 1]`, fading over [`CONTROLS_FADE`].
    pub fn opacity(&self, now: Instant) -> f32 {
        let t = match self.changed_at {
            Some(at) => {
                let elapsed = now.saturating_duration_since(at).as_secs_f32();
                (elapsed / CONTROLS_FADE.as_secs_f32()).min(1.0)
            }
            None => 1.0,
        };
        if self.visible { t } else { 1.0 - t }
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        self.changed_at
            .is_some_and(|at| now.saturating_duration_since(at) < CONTROLS_FADE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn pump(c: &mut ControlsVisibility, q: &TimerQueue, now: Instant) {
        for e in q.poll(now) {
            c.on_timer(e);
        }
    }

    #[test]
    fn hides_after_inactivity() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let mut c = ControlsVisibility::default();
        c.show(&q, t0);
        pump(&mut c, &q, t0 + ms(2999));
        assert!(c.is_visible());
        pump(&mut c, &q, t0 + ms(3000));
        assert!(!c.is_visible());
    }

    #[test]
    fn activity_restarts_timer() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let mut c = ControlsVisibility::default();
        c.show(&q, t0);
        c.show(&q, t0 + ms(2000));
        assert_eq!(q.len(), 1);
        pump(&mut c, &q, t0 + ms(4000));
        assert!(c.is_visible());
        pump(&mut c, &q, t0 + ms(5000));
        assert!(!c.is_visible());
    }

    #[test]
    fn opacity_fades() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let mut c = ControlsVisibility::default();
        assert_eq!(c.opacity(t0), 0.0);
        c.show(&q, t0);
        assert!((c.opacity(t0 + ms(250)) - 0.5).abs() < 1e-3);
        assert!(c.is_fading(t0 + ms(250)));
        assert_eq!(c.opacity(t0 + ms(600)), 1.0);
        assert!(!c.is_fading(t0 + ms(600)));
    }

    #[test]
    fn dispose_cancels_hide() {
        let q = TimerQueue::new();
        let t0 = Instant::now();
        let mut c = ControlsVisibility::default();
        c.show(&q, t0);
        c.dispose();
        assert!(q.is_empty());
    }
}
