//! Contract between the runtime loop and the application.
//!
//! The runtime owns winit and wgpu; the application only sees these
//! contexts, and asks for its next wake-up through [`Schedule`].

mod app;
mod ctx;

pub use app::{App, AppControl, Schedule};
pub use ctx::{EventCtx, FrameCtx, WindowCtx};
