//! Split-flap animation state for one digit group.

mod controller;

pub use controller::{
    DigitGroup, FLIP_IN_DURATION, FLIP_OUT_DURATION, FlipController, FlipPhase, FlipState,
    FlipTimer,
};
