use crate::coords::{CornerRadii, Rect};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rounded rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub fill: Color,
    pub border: Option<Border>,
}

impl DrawList {
    pub fn push_rounded_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        radii: CornerRadii,
        fill: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::RoundedRect(RoundedRectCmd { rect, radii, fill, border }));
    }

    #[inline]
    pub fn push_solid_rounded_rect(&mut self, z: ZIndex, rect: Rect, radius: f32, fill: Color) {
        self.push_rounded_rect(z, rect, CornerRadii::all(radius), fill, None);
    }
}
