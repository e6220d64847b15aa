//! GPU rendering.
//!
//! [`SceneRenderer`] consumes a `scene::DrawList` in paint order and draws
//! it in a single render pass. Each shape kind owns a pipeline and an
//! instance buffer under `render::shapes`; consecutive items of the same
//! kind and clip become one instanced draw.
//!
//! CPU geometry is logical pixels (top-left origin, +Y down); vertex shaders
//! convert to NDC with the shared viewport uniform.

mod batch;
mod ctx;
mod scene_renderer;
mod scissor;

pub(crate) mod shapes;

pub use batch::{Batch, BatchKind, BatchPlan};
pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
pub use scissor::logical_clip_to_scissor;
