//! Per-shape pipelines and instance buffers.
//!
//! Each renderer turns draw commands into instances during `push_*`, uploads
//! them once per frame, and binds its pipeline when the scene renderer
//! reaches one of its batches.

pub(crate) mod common;

pub(crate) mod circle;
pub(crate) mod quad;
pub(crate) mod rounded_rect;
pub(crate) mod text;
