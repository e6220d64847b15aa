//! Single-threaded deadline timers.
//!
//! Timers are owned: every scheduled entry is tied to a [`TimerHandle`] and is
//! removed from the queue as soon as the handle is dropped.

mod queue;

pub use queue::{Expired, TimerHandle, TimerId, TimerQueue};
