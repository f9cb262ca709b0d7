use piksels_backend::{
    render_targets::{ColorAttachmentPoint, DepthStencilAttachmentPoint},
    texture::Storage,
    Backend,
};
use smallvec::SmallVec;

/// Color and depth/stencil images rendered into.
#[derive(Debug)]
pub struct RenderTargets<B>
where
    B: Backend,
{
    raw: B::RenderTargets,
    color_attachment_points: SmallVec<[ColorAttachmentPoint; 4]>,
    depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
    storage: Storage,
}

impl<B> Drop for RenderTargets<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_render_targets(&self.raw);
    }
}

impl<B> RenderTargets<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(
        raw: B::RenderTargets,
        color_attachment_points: SmallVec<[ColorAttachmentPoint; 4]>,
        depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
        storage: Storage,
    ) -> Self {
        Self {
            raw,
            color_attachment_points,
            depth_stencil_attachment_point,
            storage,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &B::RenderTargets {
        &self.raw
    }

    /// Color attachment points, sorted by index.
    #[must_use]
    pub fn color_attachment_points(&self) -> &[ColorAttachmentPoint] {
        &self.color_attachment_points
    }

    #[must_use]
    pub fn depth_stencil_attachment_point(&self) -> Option<DepthStencilAttachmentPoint> {
        self.depth_stencil_attachment_point
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    pub fn color_attachment(&self, index: usize) -> Result<ColorAttachment<B>, B::Err> {
        B::get_color_attachment(&self.raw, index).map(|raw| ColorAttachment { raw })
    }

    pub fn depth_stencil_attachment(&self) -> Result<DepthStencilAttachment<B>, B::Err> {
        B::get_depth_stencil_attachment(&self.raw).map(|raw| DepthStencilAttachment { raw })
    }
}

#[derive(Debug)]
pub struct ColorAttachment<B>
where
    B: Backend,
{
    raw: B::ColorAttachment,
}

impl<B> ColorAttachment<B>
where
    B: Backend,
{
    #[must_use]
    pub fn raw(&self) -> &B::ColorAttachment {
        &self.raw
    }
}

#[derive(Debug)]
pub struct DepthStencilAttachment<B>
where
    B: Backend,
{
    raw: B::DepthStencilAttachment,
}

impl<B> DepthStencilAttachment<B>
where
    B: Backend,
{
    #[must_use]
    pub fn raw(&self) -> &B::DepthStencilAttachment {
        &self.raw
    }
}
