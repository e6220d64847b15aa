use std::time::{Duration, Instant};

use super::{TimeSample, WallClock};
use crate::timer::{Expired, TimerHandle, TimerQueue};

/// Interval between ticks once aligned.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Delay until the next wall-clock second boundary.
///
/// A sample taken exactly on the boundary (0 ms) waits a full period.
pub fn alignment_delay(millisecond: u16) -> Duration {
    Duration::from_millis(1000 - u64::from(millisecond.min(999)))
}

#[derive(Debug)]
enum TickState {
    Inactive,
    Aligning(TimerHandle),
    Running(TimerHandle),
}

/// Phase-aligned 1 Hz sampler.
///
/// Activation schedules a one-shot that lands on the next second boundary; its
/// firing emits a sample and starts a repeating timer one period later.
/// Emission happens through [`on_timer`](Self::on_timer), which the owner calls
/// for every expired id it routes here.
#[derive(Debug)]
pub struct TickSource<C> {
    clock: C,
    state: TickState,
}

impl<C: WallClock> TickSource<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: TickState::Inactive,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Reads the clock without affecting the schedule.
    pub fn sample(&self) -> TimeSample {
        self.clock.now()
    }

    /// Starts (or restarts) ticking; returns the alignment delay used.
    pub fn activate(&mut self, queue: &TimerQueue, now: Instant) -> Duration {
        let delay = alignment_delay(self.clock.now().millisecond());
        self.state = TickState::Aligning(queue.schedule_once(now, delay));
        log::debug!("tick source aligning in {} ms", delay.as_millis());
        delay
    }

    /// Stops ticking. Pending timers are cancelled before this returns.
    pub fn deactivate(&mut self) {
        if !matches!(self.state, TickState::Inactive) {
            log::debug!("tick source deactivated");
        }
        self.state = TickState::Inactive;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, TickState::Inactive)
    }

    /// Handles an expired timer. Returns a fresh sample if the timer was ours.
    pub fn on_timer(&mut self, queue: &TimerQueue, expired: Expired) -> Option<TimeSample> {
        match &self.state {
            TickState::Aligning(handle) if handle.id() == expired.id => {
                let repeating = queue.schedule_repeating(expired.deadline + TICK_PERIOD, TICK_PERIOD);
                self.state = TickState::Running(repeating);
                Some(self.clock.now())
            }
            TickState::Running(handle) if handle.id() == expired.id => Some(self.clock.now()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn alignment_delay_table() {
        assert_eq!(alignment_delay(0), ms(1000));
        assert_eq!(alignment_delay(5), ms(995));
        assert_eq!(alignment_delay(500), ms(500));
        assert_eq!(alignment_delay(999), ms(1));
    }

    #[test]
    fn first_tick_lands_on_boundary_then_every_second() {
        let clock = ManualClock::new(TimeSample::new(10, 0, 0, 250).unwrap());
        let queue = TimerQueue::new();
        let mut ticks = TickSource::new(clock.clone());
        let t0 = Instant::now();

        assert_eq!(ticks.activate(&queue, t0), ms(750));
        assert_eq!(queue.next_deadline(), Some(t0 + ms(750)));

        clock.set(TimeSample::new(10, 0, 1, 0).unwrap());
        let fired = queue.poll(t0 + ms(750));
        assert_eq!(fired.len(), 1);
        let sample = ticks.on_timer(&queue, fired[0]).unwrap();
        assert_eq!(sample.second(), 1);
        assert_eq!(queue.next_deadline(), Some(t0 + ms(1750)));

        clock.set(TimeSample::new(10, 0, 2, 0).unwrap());
        let fired = queue.poll(t0 + ms(1750));
        assert_eq!(ticks.on_timer(&queue, fired[0]).map(|s| s.second()), Some(2));
    }

    #[test]
    fn deactivate_stops_emission() {
        let clock = ManualClock::new(TimeSample::MIDNIGHT);
        let queue = TimerQueue::new();
        let mut ticks = TickSource::new(clock);
        let t0 = Instant::now();

        ticks.activate(&queue, t0);
        ticks.deactivate();
        assert!(!ticks.is_active());
        assert!(queue.is_empty());
        assert!(queue.poll(t0 + ms(5000)).is_empty());
    }

    #[test]
    fn foreign_timers_are_ignored() {
        let queue = TimerQueue::new();
        let mut ticks = TickSource::new(ManualClock::default());
        let t0 = Instant::now();
        ticks.activate(&queue, t0);

        let other = queue.schedule_once(t0, ms(1));
        let fired = queue.poll(t0 + ms(1));
        assert_eq!(fired[0].id, other.id());
        assert!(ticks.on_timer(&queue, fired[0]).is_none());
    }
}
