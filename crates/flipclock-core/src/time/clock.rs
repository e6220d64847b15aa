use std::cell::Cell;
use std::rc::Rc;

use super::TimeSample;

/// Source of local wall-clock time.
///
/// No monotonicity is assumed: the local clock may jump (DST, manual changes)
/// and consumers simply display whatever the latest sample says.
pub trait WallClock {
    fn now(&self) -> TimeSample;
}

/// Local time from the operating system.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> TimeSample {
        TimeSample::from_timelike(&chrono::Local::now())
    }
}

/// Settable clock for simulated time.
///
/// Clones share the same reading, so a test can keep one copy and hand the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current: Rc<Cell<TimeSample>>,
}

impl ManualClock {
    pub fn new(start: TimeSample) -> Self {
        Self {
            current: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, sample: TimeSample) {
        self.current.set(sample);
    }

    pub fn advance_millis(&self, ms: u32) {
        self.current.set(self.current.get().add_millis(ms));
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> TimeSample {
        self.current.get()
    }
}

impl<T: WallClock + ?Sized> WallClock for Box<T> {
    fn now(&self) -> TimeSample {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_state() {
        let a = ManualClock::new(TimeSample::MIDNIGHT);
        let b = a.clone();
        a.advance_millis(1_500);
        assert_eq!(b.now().second(), 1);
        assert_eq!(b.now().millisecond(), 500);
    }

    #[test]
    fn system_clock_produces_valid_sample() {
        let s = SystemClock.now();
        assert!(TimeSample::new(s.hour(), s.minute(), s.second(), s.millisecond()).is_ok());
    }
}
