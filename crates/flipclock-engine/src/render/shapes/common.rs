//! GPU types and helpers shared by the shape renderers.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;

pub(crate) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

const VIEWPORT_UBO_SIZE: u64 = std::mem::size_of::<ViewportUniform>() as u64;

/// Unit quad corner; shaders place it with per-instance data.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(crate) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(crate) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Resources every shape pipeline binds: the viewport uniform at group 0
/// and the unit quad at vertex slot 0.
pub(crate) struct SharedResources {
    pub viewport_layout: wgpu::BindGroupLayout,
    pub viewport_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    pub quad_vbo: wgpu::Buffer,
    pub quad_ibo: wgpu::Buffer,
}

impl SharedResources {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let viewport_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flipclock viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(VIEWPORT_UBO_SIZE),
                },
                count: None,
            }],
        });

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("flipclock viewport ubo"),
            size: VIEWPORT_UBO_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let viewport_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flipclock viewport bind group"),
            layout: &viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flipclock quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flipclock quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            viewport_layout,
            viewport_group,
            viewport_ubo,
            quad_vbo,
            quad_ibo,
        }
    }

    pub(crate) fn write_viewport(&self, queue: &wgpu::Queue, viewport: Viewport) {
        queue.write_buffer(
            &self.viewport_ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform {
                viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
                _pad: [0.0; 2],
            }),
        );
    }
}

/// CPU-side instances plus a growable GPU vertex buffer.
pub(crate) struct InstanceBuffer<T> {
    label: &'static str,
    cpu: Vec<T>,
    gpu: Option<wgpu::Buffer>,
    capacity: usize,
}

impl<T: Pod> InstanceBuffer<T> {
    pub(crate) fn new(label: &'static str) -> Self {
        Self {
            label,
            cpu: Vec::new(),
            gpu: None,
            capacity: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cpu.clear();
    }

    pub(crate) fn len(&self) -> u32 {
        self.cpu.len() as u32
    }

    pub(crate) fn push(&mut self, instance: T) {
        self.cpu.push(instance);
    }

    /// Grows the GPU buffer if needed and copies this frame's instances.
    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.cpu.is_empty() {
            return;
        }
        if self.gpu.is_none() || self.cpu.len() > self.capacity {
            let cap = self.cpu.len().next_power_of_two().max(64);
            self.gpu = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (cap * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = cap;
            log::trace!("{}: grew to {cap} instances", self.label);
        }
        if let Some(buf) = &self.gpu {
            queue.write_buffer(buf, 0, bytemuck::cast_slice(&self.cpu));
        }
    }

    pub(crate) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.gpu.as_ref()
    }
}

/// Builds an instanced pipeline over the unit quad with premultiplied blending.
pub(crate) fn create_shape_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    label: &str,
    shader_source: &'static str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    instance_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout(), instance_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uniform_is_sixteen_bytes() {
        assert_eq!(VIEWPORT_UBO_SIZE, 16);
    }

    #[test]
    fn quad_indices_cover_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
