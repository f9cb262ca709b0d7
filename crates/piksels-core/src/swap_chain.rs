use piksels_backend::{
    render_targets::{ColorAttachmentPoint, ColorType},
    swap_chain::SwapChainMode,
    texture::Storage,
    Backend,
};
use smallvec::smallvec;

use crate::render_targets::RenderTargets;

/// Images presented to a surface.
#[derive(Debug)]
pub struct SwapChain<B>
where
    B: Backend,
{
    raw: B::SwapChain,
    width: u32,
    height: u32,
    mode: SwapChainMode,
}

impl<B> Drop for SwapChain<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_swap_chain(&self.raw);
    }
}

impl<B> SwapChain<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(raw: B::SwapChain, width: u32, height: u32, mode: SwapChainMode) -> Self {
        Self {
            raw,
            width,
            height,
            mode,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &B::SwapChain {
        &self.raw
    }

    #[must_use]
    pub fn mode(&self) -> SwapChainMode {
        self.mode
    }

    /// The render targets to draw the next image into. They have a single
    /// RGBA8 color attachment at index 0.
    pub fn render_targets(&self) -> Result<RenderTargets<B>, B::Err> {
        let raw = B::swap_chain_render_targets(&self.raw)?;

        Ok(RenderTargets::from_raw(
            raw,
            smallvec![ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            None,
            Storage::Flat2D {
                width: self.width,
                height: self.height,
            },
        ))
    }

    pub fn present(&self, render_targets: &RenderTargets<B>) -> Result<(), B::Err> {
        B::present_render_targets(&self.raw, render_targets.raw())
    }
}
