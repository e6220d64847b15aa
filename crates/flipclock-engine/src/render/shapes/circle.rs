use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::scene::CircleCmd;

use super::common::{InstanceBuffer, SharedResources, create_shape_pipeline};

/// Renderer for `DrawCmd::Circle`. Borders are an antialiased ring inside
/// the radius, so a transparent fill gives an outline.
pub(crate) struct CircleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    instances: InstanceBuffer<CircleInstance>,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            instances: InstanceBuffer::new("flipclock circle instances"),
        }
    }
}

impl CircleRenderer {
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
            "flipclock circle pipeline",
            include_str!("shaders/circle.wgsl"),
            &[&shared.viewport_layout],
            CircleInstance::layout(),
        ));
        self.pipeline_format = Some(format);
    }

    pub(crate) fn push(&mut self, cmd: &CircleCmd) -> Range<u32> {
        let start = self.instances.len();
        if !(cmd.radius > 0.0) || !cmd.center.is_finite() {
            return start..start;
        }

        let (border_width, border_color) = match cmd.border {
            Some(b) if b.width > 0.0 && !b.color.is_transparent() => {
                (b.width.min(cmd.radius), b.color.to_array())
            }
            _ => (0.0, [0.0; 4]),
        };
        if border_width == 0.0 && cmd.fill.is_transparent() {
            return start..start;
        }

        self.instances.push(CircleInstance {
            center: [cmd.center.x, cmd.center.y],
            radius_bw: [cmd.radius, border_width],
            fill: cmd.fill.to_array(),
            border_color,
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

/// Instance layout (48 bytes):
///
///  offset  0  center        [f32; 2]  loc 1
///  offset  8  radius_bw     [f32; 2]  loc 2  (radius, border width)
///  offset 16  fill          [f32; 4]  loc 3
///  offset 32  border_color  [f32; 4]  loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius_bw: [f32; 2],
    fill: [f32; 4],
    border_color: [f32; 4],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4,
        4 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
