use parking_lot::Mutex;
use piksels_backend::{
    cache::QueryCache,
    pixel::Pixel,
    primitive::Connector,
    render_targets::{ColorAttachmentPoint, DepthStencilAttachmentPoint},
    shader::ShaderSources,
    swap_chain::SwapChainMode,
    texture::{Sampling, Storage},
    vertex_array::VertexArrayData,
    Backend, BackendInfo, Error,
};
use smallvec::SmallVec;

use crate::{
    cmd_buf::CmdBuf,
    layers::{Layer, Top},
    render_targets::RenderTargets,
    shader::{Shader, UniformBuffer},
    swap_chain::SwapChain,
    texture::Texture,
    vertex_array::{check_indices, VertexArray},
};

/// Answers a backend query from the cache, asking the backend on first use.
macro_rules! cached_queries {
    ($($(#[$attr:meta])* $name:ident -> $ty:ty),+ $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name(&self) -> Result<$ty, B::Err> {
                let mut queries = self.queries.lock();

                if let Some(value) = queries.$name() {
                    return Ok(value.clone());
                }

                let value = self.backend.$name()?;
                *queries.$name() = Some(value.clone());
                Ok(value)
            }
        )+
    };
}

/// A graphics device, driven by a backend.
#[derive(Debug)]
pub struct Device<B>
where
    B: Backend,
{
    backend: B,
    max_texture_units: B::Unit,
    max_uniform_buffer_units: B::Unit,
    queries: Mutex<QueryCache>,
}

impl<B> Device<B>
where
    B: Backend,
{
    /// Wraps a backend, querying its unit limits.
    pub fn new(backend: B) -> Result<Self, B::Err> {
        let max_texture_units = backend.max_texture_units()?;
        let max_uniform_buffer_units = backend.max_uniform_buffer_units()?;

        log::debug!(
            "new device: {max_texture_units:?} texture units, {max_uniform_buffer_units:?} uniform buffer units"
        );

        Ok(Self {
            backend,
            max_texture_units,
            max_uniform_buffer_units,
            queries: Mutex::new(QueryCache::default()),
        })
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    cached_queries!(
        author -> String,
        name -> String,
        version -> String,
        shading_lang_version -> String,
        info -> BackendInfo,
    );

    #[must_use]
    pub fn max_texture_units(&self) -> &B::Unit {
        &self.max_texture_units
    }

    #[must_use]
    pub fn max_uniform_buffer_units(&self) -> &B::Unit {
        &self.max_uniform_buffer_units
    }

    /// Creates a vertex array. `instances` may be empty, as may `indices`
    /// for non-indexed drawing.
    ///
    /// ## Errors
    ///
    /// - [`Error::InvalidVertexData`] if vertices or instances are malformed.
    /// - [`Error::IndexOutOfRange`] if an index points past the vertices.
    pub fn new_vertex_array(
        &self,
        connector: Connector,
        vertices: VertexArrayData,
        instances: VertexArrayData,
        indices: impl Into<Vec<u32>>,
    ) -> Result<VertexArray<B>, B::Err> {
        let indices = indices.into();

        vertices.validate()?;
        instances.validate()?;
        check_indices(&indices, vertices.len())?;

        let raw = self
            .backend
            .new_vertex_array(connector, &vertices, &instances, &indices)?;

        log::debug!(
            "new vertex array: {} vertices, {} instances, {} indices",
            vertices.len(),
            instances.len(),
            indices.len()
        );

        Ok(VertexArray::from_raw(
            raw, connector, &vertices, &instances, &indices,
        ))
    }

    /// Creates render targets. Color attachment points may come in any order.
    ///
    /// ## Errors
    ///
    /// [`Error::DuplicateAttachmentIndex`] if two color attachment points
    /// share an index.
    pub fn new_render_targets(
        &self,
        color_attachment_points: impl IntoIterator<Item = ColorAttachmentPoint>,
        depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
        storage: Storage,
    ) -> Result<RenderTargets<B>, B::Err> {
        let mut points: SmallVec<[ColorAttachmentPoint; 4]> =
            color_attachment_points.into_iter().collect();
        points.sort_by_key(ColorAttachmentPoint::index);

        if let Some(pair) = points.windows(2).find(|pair| pair[0].index() == pair[1].index()) {
            return Err(Error::DuplicateAttachmentIndex(pair[0].index()).into());
        }

        let raw = self
            .backend
            .new_render_targets(&points, depth_stencil_attachment_point, storage)?;

        log::debug!(
            "new render targets: {} color attachments, {storage:?}",
            points.len()
        );

        Ok(RenderTargets::from_raw(
            raw,
            points,
            depth_stencil_attachment_point,
            storage,
        ))
    }

    pub fn new_shader(&self, sources: &ShaderSources) -> Result<Shader<B>, B::Err> {
        let raw = self.backend.new_shader(sources)?;
        log::debug!("new shader");
        Ok(Shader::from_raw(raw))
    }

    /// Creates a uniform buffer holding `bytes`. Its size is fixed.
    pub fn new_uniform_buffer(&self, bytes: &[u8]) -> Result<UniformBuffer<B>, B::Err> {
        let raw = self.backend.new_uniform_buffer(bytes)?;
        log::debug!("new uniform buffer: {} bytes", bytes.len());
        Ok(UniformBuffer::from_raw(raw, bytes.len()))
    }

    /// Creates a texture with zeroed texels.
    pub fn new_texture(
        &self,
        storage: Storage,
        pixel: Pixel,
        sampling: Sampling,
    ) -> Result<Texture<B>, B::Err> {
        let raw = self.backend.new_texture(storage, pixel, sampling)?;
        log::debug!("new texture: {storage:?}, {pixel:?}");
        Ok(Texture::from_raw(raw, storage, pixel, sampling))
    }

    pub fn new_swap_chain(
        &self,
        width: u32,
        height: u32,
        mode: SwapChainMode,
    ) -> Result<SwapChain<B>, B::Err> {
        let raw = self.backend.new_swap_chain(width, height, mode)?;
        log::debug!("new swap chain: {width}x{height}, {mode:?}");
        Ok(SwapChain::from_raw(raw, width, height, mode))
    }

    /// Starts recording commands into a new command buffer.
    pub fn new_layers(&self) -> Result<Layer<B, Top>, B::Err> {
        let cmd_buf = CmdBuf::from_raw(self.backend.new_cmd_buf()?);

        Ok(Layer::new(
            cmd_buf,
            self.max_texture_units.clone(),
            self.max_uniform_buffer_units.clone(),
        ))
    }
}
