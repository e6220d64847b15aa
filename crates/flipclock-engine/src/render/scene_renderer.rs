use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::batch::{BatchKind, BatchPlan};
use super::scissor::logical_clip_to_scissor;
use super::shapes::circle::CircleRenderer;
use super::shapes::common::SharedResources;
use super::shapes::quad::QuadRenderer;
use super::shapes::rounded_rect::RoundedRectRenderer;
use super::shapes::text::TextRenderer;
use super::{RenderCtx, RenderTarget};

/// Draws a whole `DrawList` in paint order in one render pass.
///
/// GPU resources are created lazily on the first frame and pipelines are
/// rebuilt only when the surface format changes.
#[derive(Default)]
pub struct SceneRenderer {
    shared: Option<SharedResources>,
    quad: QuadRenderer,
    rounded_rect: RoundedRectRenderer,
    circle: CircleRenderer,
    text: TextRenderer,
    plan: BatchPlan,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the draw list into `target` on top of what is already there.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        let shared = self
            .shared
            .get_or_insert_with(|| SharedResources::new(ctx.device));
        shared.write_viewport(ctx.queue, ctx.viewport);

        self.quad.prepare(ctx.device, ctx.surface_format, shared);
        self.rounded_rect.prepare(ctx.device, ctx.surface_format, shared);
        self.circle.prepare(ctx.device, ctx.surface_format, shared);
        self.text.prepare(ctx.device, ctx.surface_format, shared);

        self.plan.clear();
        for item in draw_list.iter_in_paint_order() {
            if item.clip_rect.is_some_and(|c| c.is_empty()) {
                continue;
            }
            let (kind, range) = match &item.cmd {
                DrawCmd::Quad(cmd) => (BatchKind::Quad, self.quad.push(cmd)),
                DrawCmd::RoundedRect(cmd) => (BatchKind::RoundedRect, self.rounded_rect.push(cmd)),
                DrawCmd::Circle(cmd) => (BatchKind::Circle, self.circle.push(cmd)),
                DrawCmd::Text(cmd) => (
                    BatchKind::Text,
                    self.text.push(ctx.queue, fonts, cmd, ctx.scale_factor),
                ),
            };
            self.plan.push(kind, item.clip_rect, range);
        }

        self.quad.upload(ctx.device, ctx.queue);
        self.rounded_rect.upload(ctx.device, ctx.queue);
        self.circle.upload(ctx.device, ctx.queue);
        self.text.upload(ctx.device, ctx.queue);

        if self.plan.is_empty() {
            return;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("flipclock scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &shared.viewport_group, &[]);
        rpass.set_vertex_buffer(0, shared.quad_vbo.slice(..));
        rpass.set_index_buffer(shared.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        let mut bound = None;
        for batch in self.plan.batches() {
            let Some((x, y, w, h)) =
                logical_clip_to_scissor(batch.clip, ctx.viewport, ctx.scale_factor)
            else {
                continue;
            };

            if bound != Some(batch.kind) {
                let ready = match batch.kind {
                    BatchKind::Quad => self.quad.bind(&mut rpass),
                    BatchKind::RoundedRect => self.rounded_rect.bind(&mut rpass),
                    BatchKind::Circle => self.circle.bind(&mut rpass),
                    BatchKind::Text => self.text.bind(&mut rpass),
                };
                if !ready {
                    continue;
                }
                bound = Some(batch.kind);
            }

            rpass.set_scissor_rect(x, y, w, h);
            rpass.draw_indexed(0..6, 0, batch.instances.clone());
        }
    }
}
