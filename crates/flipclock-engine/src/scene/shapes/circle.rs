use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Circle payload. A transparent fill with a border draws a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        fill: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd { center, radius, fill, border }));
    }

    #[inline]
    pub fn push_ring(&mut self, z: ZIndex, center: Vec2, radius: f32, width: f32, color: Color) {
        self.push_circle(z, center, radius, Color::TRANSPARENT, Some(Border::new(width, color)));
    }
}
