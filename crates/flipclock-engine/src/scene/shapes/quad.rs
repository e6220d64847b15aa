use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Solid quad, optionally tapered and rotated.
///
/// `rect` is the unrotated footprint. `taper` scales the width of the top
/// edge (1 keeps a rectangle, 0 gives a triangle), and the shape is then
/// rotated clockwise by `angle_deg` about `pivot`. Clock hands and dial
/// ticks are drawn with this.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCmd {
    pub rect: Rect,
    pub pivot: Vec2,
    pub angle_deg: f32,
    pub taper: f32,
    pub color: Color,
}

impl QuadCmd {
    #[inline]
    pub fn axis_aligned(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            pivot: rect.center(),
            angle_deg: 0.0,
            taper: 1.0,
            color,
        }
    }

    /// Corners after taper and rotation: top-left, top-right, bottom-right,
    /// bottom-left. Mirrors the vertex shader.
    pub fn corners(&self) -> [Vec2; 4] {
        let r = self.rect.normalized();
        let cx = r.center().x;
        let top_half = r.size.x * 0.5 * self.taper.clamp(0.0, 1.0);
        let bottom_half = r.size.x * 0.5;
        let y0 = r.origin.y;
        let y1 = r.max().y;

        let local = [
            Vec2::new(cx - top_half, y0),
            Vec2::new(cx + top_half, y0),
            Vec2::new(cx + bottom_half, y1),
            Vec2::new(cx - bottom_half, y1),
        ];

        let (s, c) = self.angle_deg.to_radians().sin_cos();
        local.map(|p| {
            let d = p - self.pivot;
            self.pivot + Vec2::new(d.x * c - d.y * s, d.x * s + d.y * c)
        })
    }
}

impl DrawList {
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Quad(QuadCmd::axis_aligned(rect, color)));
    }

    /// Records a bar of `width` from `pivot` out to `length` along
    /// `angle_deg` (clockwise from 12 o'clock), with `tail` behind the pivot.
    pub fn push_hand(
        &mut self,
        z: ZIndex,
        pivot: Vec2,
        length: f32,
        tail: f32,
        width: f32,
        taper: f32,
        angle_deg: f32,
        color: Color,
    ) {
        let rect = Rect::new(pivot.x - width * 0.5, pivot.y - length, width, length + tail);
        self.push(
            z,
            DrawCmd::Quad(QuadCmd {
                rect,
                pivot,
                angle_deg,
                taper,
                color,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn unrotated_corners_match_rect() {
        let q = QuadCmd::axis_aligned(Rect::new(10.0, 20.0, 4.0, 8.0), Color::WHITE);
        let c = q.corners();
        assert!(close(c[0], Vec2::new(10.0, 20.0)));
        assert!(close(c[2], Vec2::new(14.0, 28.0)));
    }

    #[test]
    fn taper_narrows_the_top_edge() {
        let mut q = QuadCmd::axis_aligned(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        q.taper = 0.5;
        let c = q.corners();
        assert!(close(c[0], Vec2::new(2.5, 0.0)));
        assert!(close(c[1], Vec2::new(7.5, 0.0)));
        assert!(close(c[3], Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn hand_at_quarter_past_points_right() {
        let mut list = DrawList::new();
        let pivot = Vec2::new(50.0, 50.0);
        list.push_hand(ZIndex(0), pivot, 30.0, 0.0, 2.0, 1.0, 90.0, Color::WHITE);
        let DrawCmd::Quad(q) = &list.items()[0].cmd else {
            panic!("expected a quad");
        };
        let c = q.corners();
        let tip = (c[0] + c[1]) * 0.5;
        assert!(close(tip, Vec2::new(80.0, 50.0)));
    }
}
