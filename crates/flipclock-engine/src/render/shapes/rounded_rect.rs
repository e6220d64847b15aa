use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::scene::RoundedRectCmd;

use super::common::{InstanceBuffer, SharedResources, create_shape_pipeline};

/// Renderer for `DrawCmd::RoundedRect`.
///
/// Signed-distance fill with per-corner radii and an optional inner border,
/// antialiased over one logical pixel.
pub(crate) struct RoundedRectRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    instances: InstanceBuffer<RoundedRectInstance>,
}

impl Default for RoundedRectRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            instances: InstanceBuffer::new("flipclock rounded rect instances"),
        }
    }
}

impl RoundedRectRenderer {
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
            "flipclock rounded rect pipeline",
            include_str!("shaders/rounded_rect.wgsl"),
            &[&shared.viewport_layout],
            RoundedRectInstance::layout(),
        ));
        self.pipeline_format = Some(format);
    }

    pub(crate) fn push(&mut self, cmd: &RoundedRectCmd) -> Range<u32> {
        let start = self.instances.len();
        let rect = cmd.rect.normalized();
        if rect.is_empty() || !rect.is_finite() {
            return start..start;
        }

        let (border_width, border_color) = match cmd.border {
            Some(b) if b.width > 0.0 && !b.color.is_transparent() => (b.width, b.color.to_array()),
            _ => (0.0, [0.0; 4]),
        };
        if border_width == 0.0 && cmd.fill.is_transparent() {
            return start..start;
        }

        self.instances.push(RoundedRectInstance {
            origin: [rect.origin.x, rect.origin.y],
            size: [rect.size.x, rect.size.y],
            radii: cmd.radii.to_array(),
            fill: cmd.fill.to_array(),
            border_color,
            border_width: [border_width, 0.0],
        });
        start..start + 1
    }

    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.instances.upload(device, queue);
    }

    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let (Some(pipeline), Some(instances)) = (&self.pipeline, self.instances.buffer()) else {
            return false;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(1, instances.slice(..));
        true
    }
}

/// Instance layout (72 bytes):
///
///  offset  0  origin        [f32; 2]  loc 1
///  offset  8  size          [f32; 2]  loc 2
///  offset 16  radii         [f32; 4]  loc 3  (tl, tr, br, bl)
///  offset 32  fill          [f32; 4]  loc 4
///  offset 48  border_color  [f32; 4]  loc 5
///  offset 64  border_width  [f32; 2]  loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RoundedRectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    radii: [f32; 4],
    fill: [f32; 4],
    border_color: [f32; 4],
    border_width: [f32; 2],
}

impl RoundedRectInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x2
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RoundedRectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
