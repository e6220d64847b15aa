use std::time::Instant;

use winit::event::WindowEvent;

use crate::input::InputEvent;

use super::ctx::{EventCtx, FrameCtx};

/// Returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// When the runtime should wake the app next.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Schedule {
    /// Sleep until the next platform event.
    Idle,
    /// Sleep until the instant, or the next event if sooner.
    At(Instant),
    /// Draw every frame until told otherwise.
    Animate,
}

impl Schedule {
    /// The more urgent of two schedules.
    pub fn min(self, other: Schedule) -> Schedule {
        match (self, other) {
            (Schedule::Animate, _) | (_, Schedule::Animate) => Schedule::Animate,
            (Schedule::At(a), Schedule::At(b)) => Schedule::At(a.min(b)),
            (Schedule::At(t), Schedule::Idle) | (Schedule::Idle, Schedule::At(t)) => {
                Schedule::At(t)
            }
            (Schedule::Idle, Schedule::Idle) => Schedule::Idle,
        }
    }
}

/// Application driven by [`Runtime`](crate::window::Runtime).
///
/// Call order: `on_start` once the window and GPU exist, then any mix of
/// `on_input` / `on_window_event`, `on_wake` whenever the loop is about to
/// sleep, and `on_frame` for each redraw.
pub trait App {
    fn on_start(&mut self, ctx: &mut EventCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Translated keyboard and pointer input.
    fn on_input(&mut self, ctx: &mut EventCtx<'_>, event: &InputEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Raw window events, after input translation.
    fn on_window_event(&mut self, ctx: &mut EventCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Runs due work and says when to wake next.
    fn on_wake(&mut self, ctx: &mut EventCtx<'_>) -> Schedule;

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the loop exits.
    fn on_exit(&mut self) {}
}
