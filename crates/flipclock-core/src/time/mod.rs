//! Wall-clock sampling and the phase-aligned 1 Hz tick.

mod clock;
mod sample;
mod tick;

pub use clock::{ManualClock, SystemClock, WallClock};
pub use sample::{TimeSample, TimeSampleError};
pub use tick::{TICK_PERIOD, TickSource, alignment_delay};
