//! Geometry shared by the renderers and the clock painters.
//!
//! CPU space is logical pixels, origin top-left, +X right, +Y down.
//! Shaders convert to NDC with the viewport uniform.

mod corner_radii;
mod rect;
mod vec2;
mod viewport;

pub use corner_radii::CornerRadii;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
