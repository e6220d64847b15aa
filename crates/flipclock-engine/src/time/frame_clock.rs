use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous frame, clamped, in seconds.
    pub dt: f32,

    /// Monotonic timestamp of this frame.
    pub now: Instant,

    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots from caller-supplied instants.
///
/// The loop sleeps between timer deadlines, so the gap between two frames can
/// be seconds long. `dt` is clamped to keep animation steps sane after such a
/// gap; consumers that need real elapsed time should use `now`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_max: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(Duration::from_millis(250))
    }

    pub fn with_max_dt(dt_max: Duration) -> Self {
        Self {
            last: None,
            frame_index: 0,
            dt_max,
        }
    }

    /// Forgets the previous frame; the next tick reports `dt = 0`.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last).min(self.dt_max))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}
