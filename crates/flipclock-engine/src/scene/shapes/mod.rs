mod circle;
mod quad;
mod rounded_rect;
mod text;

pub use circle::CircleCmd;
pub use quad::QuadCmd;
pub use rounded_rect::RoundedRectCmd;
pub use text::TextCmd;

use crate::paint::Color;

/// Stroke along the inside of a shape's outer edge.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub const fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
