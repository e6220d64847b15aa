/// Per-corner radii in logical pixels.
///
/// Order: top-left, top-right, bottom-right, bottom-left. Renderers clamp
/// negatives to zero.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    #[inline]
    pub const fn all(r: f32) -> Self {
        Self::new(r, r, r, r)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [
            self.top_left.max(0.0),
            self.top_right.max(0.0),
            self.bottom_right.max(0.0),
            self.bottom_left.max(0.0),
        ]
    }
}
