use std::collections::HashMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::scene::TextCmd;
use crate::text::FontSystem;

use super::common::{InstanceBuffer, SharedResources, create_shape_pipeline};

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1;

/// Shelf packer for the glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    size: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
            full: false,
        }
    }

    fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    /// Top-left of a free `w`×`h` slot, or `None` once the atlas is full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * GLYPH_PADDING > self.size {
            return None;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.size {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_y + h + GLYPH_PADDING > self.size {
            self.full = true;
            return None;
        }

        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

struct GlyphAtlas {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are rasterised with fontdue at physical size on first use and
/// cached in a 2048×2048 R8 atlas keyed by `GlyphRasterConfig` (font, glyph
/// and pixel size). When the atlas fills up, it is flushed at the start of
/// the next frame; resizing the window produces new glyph sizes, so this
/// happens in long sessions.
pub(crate) struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    atlas_layout: Option<wgpu::BindGroupLayout>,
    atlas: Option<GlyphAtlas>,

    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    warned_missing_font: bool,

    instances: InstanceBuffer<GlyphInstance>,
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            atlas_layout: None,
            atlas: None,
            packer: ShelfPacker::new(ATLAS_SIZE),
            glyph_cache: HashMap::new(),
            warned_missing_font: false,
            instances: InstanceBuffer::new("flipclock glyph instances"),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shared: &SharedResources,
    ) {
        self.instances.clear();

        if self.packer.full {
            log::info!(
                "glyph atlas full after {} glyphs; flushing",
                self.glyph_cache.len()
            );
            self.packer.reset();
            self.glyph_cache.clear();
        }

        let atlas_layout = self
            .atlas_layout
            .get_or_insert_with(|| create_atlas_layout(device));
        if self.atlas.is_none() {
            self.atlas = Some(create_atlas(device, atlas_layout));
        }

        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }
        self.pipeline = Some(create_shape_pipeline(
            device,
            format,
            "flipclock text pipeline",
            include_str!("shaders/text.wgsl"),
            &[&shared.viewport_layout, &*atlas_layout],
            GlyphInstance::layout(),
        ));
        self.pipeline_format = Some(format);
    }

    /// Lays out `cmd` at physical size, rasterising and uploading any glyph
    /// not yet in the atlas, and returns the glyph instance range.
    pub(crate) fn push(
        &mut self,
        queue: &wgpu::Queue,
        fonts: &FontSystem,
        cmd: &TextCmd,
        scale: f32,
    ) -> Range<u32> {
        let start = self.instances.len();
        if cmd.text.is_empty() || cmd.color.is_transparent() || !(cmd.size > 0.0) {
            return start..start;
        }
        let Some(font) = fonts.get(cmd.font) else {
            if !self.warned_missing_font {
                log::warn!("text uses unknown {:?}; skipping", cmd.font);
                self.warned_missing_font = true;
            }
            return start..start;
        };

        let scale = scale.max(0.01);
        self.layout.reset(&LayoutSettings {
            x: (cmd.origin.x * scale).round(),
            y: (cmd.origin.y * scale).round(),
            ..LayoutSettings::default()
        });
        self.layout
            .append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        // Copy positions out so the layout borrow ends before the atlas work.
        let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let color = cmd.color.to_array();
        for (key, x, y, w, h) in glyphs {
            let Some(cached) = self.cached_or_rasterized(queue, font, key) else {
                continue;
            };
            self.instances.push(GlyphInstance {
                dst_min: [x / scale, y / scale],
                dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }

        start..self.instances.len()
    }

    pub(crate) fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.instances.upload(device, queue);
    }

    pub(crate) fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) -> bool {
        let (Some(pipeline), Some(atlas), Some(instances)) =
            (&self.pipeline, &self.atlas, self.instances.buffer())
        else {
            return false;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(1, &atlas.bind_group, &[]);
        rpass.set_vertex_buffer(1, instances.slice(..));
        true
    }

    fn cached_or_rasterized(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<CachedGlyph> {
        if let Some(cached) = self.glyph_cache.get(&key) {
            return Some(*cached);
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        let Some((gx, gy)) = self.packer.place(w, h) else {
            log::debug!("glyph atlas out of space; glyph dropped this frame");
            return None;
        };
        let atlas = self.atlas.as_ref()?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &atlas.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        let size = ATLAS_SIZE as f32;
        let glyph = CachedGlyph {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        };
        self.glyph_cache.insert(key, glyph);
        Some(glyph)
    }
}

fn create_atlas_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("flipclock glyph atlas bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn create_atlas(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> GlyphAtlas {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("flipclock glyph atlas"),
        size: wgpu::Extent3d {
            width: ATLAS_SIZE,
            height: ATLAS_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("flipclock glyph sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("flipclock glyph atlas bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    GlyphAtlas {
        texture,
        bind_group,
    }
}

/// Instance layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]  loc 1
///  offset  8  dst_max  [f32; 2]  loc 2
///  offset 16  uv_min   [f32; 2]  loc 3
///  offset 24  uv_max   [f32; 2]  loc 4
///  offset 32  color    [f32; 4]  loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x2,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packer_fills_rows_then_wraps() {
        let mut p = ShelfPacker::new(32);
        assert_eq!(p.place(10, 8), Some((1, 1)));
        assert_eq!(p.place(10, 12), Some((12, 1)));
        // 23 + 10 + 1 > 32: next shelf starts below the tallest glyph.
        assert_eq!(p.place(10, 4), Some((1, 14)));
    }

    #[test]
    fn packer_reports_full_and_resets() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(14, 14), Some((1, 1)));
        assert_eq!(p.place(14, 14), None);
        assert!(p.full);
        assert_eq!(p.place(1, 1), None);

        p.reset();
        assert_eq!(p.place(4, 4), Some((1, 1)));
    }

    #[test]
    fn oversized_glyph_is_rejected_without_filling() {
        let mut p = ShelfPacker::new(16);
        assert_eq!(p.place(20, 2), None);
        assert!(!p.full);
    }
}
