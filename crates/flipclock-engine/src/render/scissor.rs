use crate::coords::{Rect, Viewport};

/// Converts a logical clip rect to a physical scissor `(x, y, w, h)`,
/// clamped to the viewport.
///
/// `None` clips to the full viewport. Returns `None` when the result has
/// zero area, and the draw should be skipped.
pub fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_w = (viewport.width * scale).max(1.0) as u32;
    let phys_h = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_w, phys_h),
        Some(r) => {
            let r = r.normalized();
            let max = r.max();
            let x0 = ((r.origin.x * scale).max(0.0).floor() as u32).min(phys_w);
            let y0 = ((r.origin.y * scale).max(0.0).floor() as u32).min(phys_h);
            let x1 = ((max.x * scale).max(0.0).ceil() as u32).min(phys_w);
            let y1 = ((max.y * scale).max(0.0).ceil() as u32).min(phys_h);
            (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
        }
    };

    (w > 0 && h > 0).then_some((x, y, w, h))
}
