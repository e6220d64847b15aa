/// Z-layer for draw items; higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn above(self, by: i32) -> Self {
        Self(self.0.saturating_add(by))
    }
}
