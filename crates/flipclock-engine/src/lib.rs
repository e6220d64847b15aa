//! flipclock engine crate.
//!
//! Owns the platform and GPU runtime: one winit window with deadline-driven
//! wake-ups, a wgpu surface, a z-ordered draw list and the batched shape
//! renderers that consume it.

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;
