//! Window and event loop.
//!
//! Owns the winit event loop and the single clock window, wires it to the
//! GPU layer, and sleeps between the deadlines the app asks for.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
