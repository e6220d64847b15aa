//! Frame timing.
//!
//! One `FrameClock` per window; `tick` once per presented frame. Wall-clock
//! time for the clock face lives in `flipclock_core`, not here.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
