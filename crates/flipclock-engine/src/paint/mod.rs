//! Colour model shared between painters and renderers.
//!
//! Colours are premultiplied alpha throughout; geometry lives in `coords`.

pub mod color;

pub use color::Color;
