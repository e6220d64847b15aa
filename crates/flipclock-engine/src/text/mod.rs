//! Font loading and measurement.
//!
//! Rasterisation lives in `render::shapes::text`; this module only owns the
//! parsed fonts so painters can measure without touching the GPU.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, LineMetrics};
