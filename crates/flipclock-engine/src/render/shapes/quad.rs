use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::scene::QuadCmd;

use super::common::{InstanceBuffer, SharedResources, create_shape_pipeline};

/// Renderer for `DrawCmd::Quad`: flat-coloured, tapered, rotated quads.
///
/// Rotated or tapered quads get a one-pixel antialiased edge along their
/// long sides; axis-aligned rectangles stay hard-edged so backgrounds and
/// fold lines butt cleanly.
pub(crate) struct QuadRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    instances: InstanceBuffer<QuadInstance>,
}

impl Default for QuadRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            instances: InstanceBuffer::new("flipclock quad instances"),
        }
    }
}

impl QuadRenderer {
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shared: &SharedResources,
    ) {
        self.instances.clear();
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }
        self.pipeline = Some(create_shape_pipeline(
            device,
            format,
            "flipclock quad pipeline",
            include_str!("shaders/quad.wgsl"),
            &[&shared.viewport_layout],
            QuadInstance::layout(),
        ));
        self.pipeline_format = Some(format);
    }

    /// Appends `cmd` and returns its instance range (empty when degenerate).
    pub(crate) fn push(&mut self, cmd: &QuadCmd) -> Range<u32> {
        let start = self.instances.len();
        let rect = cmd.rect.normalized();
        if rect.is_empty() || !rect.is_finite() || cmd.color.is_transparent() {
            return start..start;
        }

        let taper = cmd.taper.clamp(0.0, 1.0);
        let antialias = cmd.angle_deg.rem_euclid(90.0) != 0.0 || taper < 1.0;

        self.instances.push(QuadInstance {
            origin: [rect.origin.x, rect.origin.y],
            size: [rect.size.x, rect.size.y],
            pivot: [cmd.pivot.x, cmd.pivot.y],
            params: [cmd.angle_deg.to_radians(), taper, f32::from(u8::from(antialias)), 0.0],
            color: cmd.color.to_array(),
        });
        start..start + 1
    }

    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.instances.upload(device, queue);
    }

    /// Binds pipeline and instances; false if nothing is ready to draw.
    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let (Some(pipeline), Some(instances)) = (&self.pipeline, self.instances.buffer()) else {
            return false;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(1, instances.slice(..));
        true
    }
}

/// Instance layout (56 bytes):
///
///  offset  0  origin  [f32; 2]  loc 1
///  offset  8  size    [f32; 2]  loc 2
///  offset 16  pivot   [f32; 2]  loc 3
///  offset 24  params  [f32; 4]  loc 4  (angle rad, taper, antialias, -)
///  offset 40  color   [f32; 4]  loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadInstance {
    origin: [f32; 2],
    size: [f32; 2],
    pivot: [f32; 2],
    params: [f32; 4],
    color: [f32; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x4,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;

    #[test]
    fn degenerate_quads_are_skipped() {
        let mut r = QuadRenderer::default();
        let empty = QuadCmd::axis_aligned(Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE);
        let clear = QuadCmd::axis_aligned(Rect::new(0.0, 0.0, 5.0, 5.0), Color::TRANSPARENT);
        assert!(r.push(&empty).is_empty());
        assert!(r.push(&clear).is_empty());
    }

    #[test]
    fn ranges_advance_per_instance() {
        let mut r = QuadRenderer::default();
        let mut cmd = QuadCmd::axis_aligned(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(r.push(&cmd), 0..1);
        cmd.pivot = Vec2::new(2.0, 2.0);
        cmd.angle_deg = 30.0;
        assert_eq!(r.push(&cmd), 1..2);
    }

    #[test]
    fn instance_is_fifty_six_bytes() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 56);
    }
}
