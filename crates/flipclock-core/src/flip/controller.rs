use std::fmt;
use std::time::{Duration, Instant};

use crate::timer::{Expired, TimerHandle, TimerQueue};

/// Duration of the upper flap folding down.
pub const FLIP_OUT_DURATION: Duration = Duration::from_millis(150);

/// Duration of the lower flap unfolding.
pub const FLIP_IN_DURATION: Duration = Duration::from_millis(150);

/// Which two-character field a controller drives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DigitGroup {
    Hours,
    Minutes,
}

impl fmt::Display for DigitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DigitGroup::Hours => "hours",
            DigitGroup::Minutes => "minutes",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FlipPhase {
    Idle,
    FlippingOut,
    FlippingIn,
}

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipState {
    /// Value the card rests on, or is flipping toward.
    pub settled: String,

    /// Value the card is leaving. Equal to `settled` while idle.
    pub previous: String,

    pub phase: FlipPhase,

    /// Fraction of the current phase elapsed, `0.0` when idle.
    pub progress: f32,
}

/// Result of routing an expired timer to a controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FlipTimer {
    /// The timer belonged to someone else.
    Ignored,
    /// Moved from `FlippingOut` to `FlippingIn`.
    Advanced,
    /// Reached `Idle`; the announced value changed.
    Completed,
}

/// Two-phase flip state machine.
///
/// Values that arrive mid-flip only replace the target; the running animation
/// finishes and then rests on the latest value. Dropping the controller
/// cancels its timer.
#[derive(Debug)]
pub struct FlipController {
    group: DigitGroup,
    settled: String,
    previous: String,
    announced: String,
    phase: FlipPhase,
    phase_started: Option<Instant>,
    timer: Option<TimerHandle>,
}

impl FlipController {
    pub fn new(group: DigitGroup, initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            group,
            settled: initial.clone(),
            previous: initial.clone(),
            announced: initial,
            phase: FlipPhase::Idle,
            phase_started: None,
            timer: None,
        }
    }

    pub fn group(&self) -> DigitGroup {
        self.group
    }

    pub fn settled(&self) -> &str {
        &self.settled
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    /// Text for the live region. Only changes when a flip completes.
    pub fn announced(&self) -> &str {
        &self.announced
    }

    pub fn is_animating(&self) -> bool {
        self.phase != FlipPhase::Idle
    }

    /// Feeds a newly formatted value. Returns `true` if a flip started.
    pub fn deliver(&mut self, queue: &TimerQueue, value: &str, now: Instant) -> bool {
        match self.phase {
            FlipPhase::Idle if value == self.settled => false,
            FlipPhase::Idle => {
                self.previous = std::mem::replace(&mut self.settled, value.to_owned());
                self.phase = FlipPhase::FlippingOut;
                self.phase_started = Some(now);
                self.timer = Some(queue.schedule_once(now, FLIP_OUT_DURATION));
                log::debug!("{} flip {} -> {}", self.group, self.previous, self.settled);
                true
            }
            FlipPhase::FlippingOut | FlipPhase::FlippingIn => {
                if value != self.settled {
                    log::trace!("{} retarget mid-flip to {value}", self.group);
                    self.settled = value.to_owned();
                }
                false
            }
        }
    }

    /// Advances the state machine if `expired` is this controller's timer.
    pub fn on_timer(&mut self, queue: &TimerQueue, expired: Expired) -> FlipTimer {
        let ours = self.timer.as_ref().is_some_and(|h| h.id() == expired.id);
        if !ours {
            return FlipTimer::Ignored;
        }

        match self.phase {
            FlipPhase::FlippingOut => {
                self.phase = FlipPhase::FlippingIn;
                self.phase_started = Some(expired.deadline);
                self.timer = Some(queue.schedule_at(expired.deadline + FLIP_IN_DURATION));
                log::trace!("{} flipping in", self.group);
                FlipTimer::Advanced
            }
            FlipPhase::FlippingIn => {
                self.phase = FlipPhase::Idle;
                self.phase_started = None;
                self.timer = None;
                self.previous.clone_from(&self.settled);
                self.announced.clone_from(&self.settled);
                log::trace!("{} settled on {}", self.group, self.settled);
                FlipTimer::Completed
            }
            FlipPhase::Idle => {
                self.timer = None;
                FlipTimer::Ignored
            }
        }
    }

    /// Fraction of the current phase elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f32 {
        let (Some(started), duration) = (self.phase_started, self.phase_duration()) else {
            return 0.0;
        };
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    fn phase_duration(&self) -> Duration {
        match self.phase {
            FlipPhase::Idle => Duration::ZERO,
            FlipPhase::FlippingOut => FLIP_OUT_DURATION,
            FlipPhase::FlippingIn => FLIP_IN_DURATION,
        }
    }

    pub fn state(&self, now: Instant) -> FlipState {
        FlipState {
            settled: self.settled.clone(),
            previous: self.previous.clone(),
            phase: self.phase,
            progress: self.progress(now),
        }
    }
}
