//! Pipeline state cache.
//!
//! Commands are not forwarded to the backend if they would set a state to the
//! value it already has in the command buffer being recorded.

use piksels_backend::{
    blending::BlendingMode,
    cache::Cached,
    color::RGBA32F,
    depth_stencil::{DepthTest, DepthWrite, StencilTest},
    face_culling::FaceCulling,
    scissor::Scissor,
    viewport::Viewport,
    Backend,
};

/// Last values recorded into a command buffer.
///
/// Render targets have no slot: binding them clears them, so every bind
/// reaches the backend.
#[derive(Debug)]
pub struct PipelineCache<B>
where
    B: Backend,
{
    pub blending: Cached<BlendingMode>,
    pub depth_test: Cached<DepthTest>,
    pub depth_write: Cached<DepthWrite>,
    pub stencil_test: Cached<StencilTest>,
    pub face_culling: Cached<FaceCulling>,
    pub viewport: Cached<Viewport>,
    pub scissor: Cached<Scissor>,
    pub clear_color: Cached<Option<RGBA32F>>,
    pub clear_depth: Cached<Option<f32>>,
    pub clear_stencil: Cached<Option<i32>>,
    pub srgb: Cached<bool>,
    pub shader: Cached<B::ScarceIndex>,
}

impl<B> Default for PipelineCache<B>
where
    B: Backend,
{
    fn default() -> Self {
        Self {
            blending: Cached::default(),
            depth_test: Cached::default(),
            depth_write: Cached::default(),
            stencil_test: Cached::default(),
            face_culling: Cached::default(),
            viewport: Cached::default(),
            scissor: Cached::default(),
            clear_color: Cached::default(),
            clear_depth: Cached::default(),
            clear_stencil: Cached::default(),
            srgb: Cached::default(),
            shader: Cached::default(),
        }
    }
}
