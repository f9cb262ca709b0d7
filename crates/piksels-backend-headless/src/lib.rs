//! Headless piksels backend.
//!
//! Everything happens on the CPU: textures are byte buffers, shaders are only
//! scanned for their declarations and command buffers are recorded into
//! [`Submission`]s instead of being executed. Clears are the only commands
//! with an effect on texels. An [`Inspector`] gives read access to all of it,
//! which makes this backend suited to testing code written against piksels.

pub mod command;
pub mod error;
pub mod inspector;

mod shader;
mod state;
mod texels;

use std::{fmt, sync::Arc};

use piksels_backend::{
    blending::BlendingMode,
    color::RGBA32F,
    debug,
    depth_stencil::{DepthTest, DepthWrite, StencilTest},
    extension::{
        logger::{BackendLogger, LogEntry, Logger, LoggerExt},
        ExtensionsBuilder,
    },
    face_culling::FaceCulling,
    info,
    pixel::{Format, Pixel},
    primitive::Connector,
    render_targets::{ColorAttachmentPoint, ColorType, DepthStencilAttachmentPoint},
    scissor::Scissor,
    shader::{ShaderSources, UniformType},
    swap_chain::SwapChainMode,
    texture::{Rect, Sampling, Size, Storage},
    trace,
    vertex_array::{VertexArrayData, VertexArrayUpdate},
    viewport::Viewport,
    Backend, BackendInfo, Error, Scarce,
};

pub use command::{ClearBuffers, Command, Presentation, Submission};
pub use error::HeadlessError;
pub use inspector::{Inspector, LiveCounts};
pub use state::{
    Attachment, CmdBufRes, Handle, RenderTargetsRes, ShaderName, ShaderRes, SwapChainRes,
    TextureRes, UniformBufferRes, VertexArrayRes,
};
pub use structures::pool::Id;

use shader::Declarations;
use state::{get, get_mut, patch_vertex_data, Clear, Shared};
use texels::Texels;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeadlessConfig {
    /// Number of texture units. Defaults to 16.
    pub max_texture_units: u32,

    /// Number of uniform buffer units. Defaults to 16.
    pub max_uniform_buffer_units: u32,

    pub author: String,
    pub name: String,

    /// Defaults to the version of this crate.
    pub version: String,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            max_texture_units: 16,
            max_uniform_buffer_units: 16,
            author: "piksels".to_owned(),
            name: "headless".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

pub struct HeadlessBackend {
    config: HeadlessConfig,
    shared: Arc<Shared>,
}

impl fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BackendLogger for HeadlessBackend {
    fn log(&self, entry: LogEntry) {
        self.shared.log(entry);
    }
}

impl HeadlessBackend {
    pub fn with_config<L>(extensions: ExtensionsBuilder<LoggerExt<L>>, config: HeadlessConfig) -> Self
    where
        L: 'static + Logger,
    {
        let backend = Self {
            config,
            shared: Arc::new(Shared::new(Box::new(extensions.logger))),
        };

        info!(
            backend,
            "headless backend: {} texture units, {} uniform buffer units",
            backend.config.max_texture_units,
            backend.config.max_uniform_buffer_units
        );

        backend
    }

    #[must_use]
    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    #[must_use]
    pub fn inspector(&self) -> Inspector {
        Inspector::new(self.shared.clone())
    }

    fn handle<T>(&self, id: Id<T>) -> Handle<T> {
        Handle::new(id, self.shared.clone())
    }
}

impl<T> Scarce<HeadlessBackend> for Handle<T> {
    fn scarce_index(&self) -> u64 {
        self.id().to_bits()
    }

    fn scarce_clone(&self) -> Self {
        self.clone()
    }
}

/// Appends a command to a command buffer.
fn record(cmd_buf: &Handle<CmdBufRes>, command: Command) -> Result<(), HeadlessError> {
    let mut state = cmd_buf.shared().state.lock();
    get_mut(&mut state.cmd_bufs, cmd_buf.id())?.commands.push(command);
    Ok(())
}

impl Backend for HeadlessBackend {
    type Err = HeadlessError;
    type ScarceIndex = u64;
    type Unit = u32;
    type CmdBuf = Handle<CmdBufRes>;
    type ColorAttachment = Attachment;
    type DepthStencilAttachment = Attachment;
    type RenderTargets = Handle<RenderTargetsRes>;
    type Shader = Handle<ShaderRes>;
    type ShaderTextureBindingPoint = ShaderName;
    type ShaderUniformBufferBindingPoint = ShaderName;
    type SwapChain = Handle<SwapChainRes>;
    type Texture = Handle<TextureRes>;
    type Uniform = ShaderName;
    type UniformBuffer = Handle<UniformBufferRes>;
    type VertexArray = Handle<VertexArrayRes>;

    fn build<L>(extensions: ExtensionsBuilder<LoggerExt<L>>) -> Result<Self, Self::Err>
    where
        L: 'static + Logger,
    {
        Ok(Self::with_config(extensions, HeadlessConfig::default()))
    }

    fn author(&self) -> Result<String, Self::Err> {
        Ok(self.config.author.clone())
    }

    fn name(&self) -> Result<String, Self::Err> {
        Ok(self.config.name.clone())
    }

    fn version(&self) -> Result<String, Self::Err> {
        Ok(self.config.version.clone())
    }

    fn shading_lang_version(&self) -> Result<String, Self::Err> {
        Ok("GLSL declarations only".to_owned())
    }

    fn info(&self) -> Result<BackendInfo, Self::Err> {
        Ok(BackendInfo {
            version: env!("CARGO_PKG_VERSION"),
            git_commit_hash: option_env!("PIKSELS_GIT_COMMIT").unwrap_or("unknown"),
        })
    }

    fn max_texture_units(&self) -> Result<u32, Self::Err> {
        Ok(self.config.max_texture_units)
    }

    fn max_uniform_buffer_units(&self) -> Result<u32, Self::Err> {
        Ok(self.config.max_uniform_buffer_units)
    }

    fn new_vertex_array(
        &self,
        connector: Connector,
        vertices: &VertexArrayData,
        instances: &VertexArrayData,
        indices: &[u32],
    ) -> Result<Self::VertexArray, Self::Err> {
        let id = self.shared.state.lock().vertex_arrays.insert(VertexArrayRes {
            connector,
            vertices: vertices.clone(),
            instances: instances.clone(),
            indices: indices.to_vec(),
        });

        debug!(self, "new vertex array {id:?}");
        Ok(self.handle(id))
    }

    fn drop_vertex_array(vertex_array: &Self::VertexArray) {
        vertex_array
            .shared()
            .state
            .lock()
            .vertex_arrays
            .remove(vertex_array.id());
    }

    fn update_vertex_array(
        vertex_array: &Self::VertexArray,
        update: &VertexArrayUpdate,
    ) -> Result<(), Self::Err> {
        let mut state = vertex_array.shared().state.lock();
        let res = get_mut(&mut state.vertex_arrays, vertex_array.id())?;

        match update {
            VertexArrayUpdate::Vertices { start, data } => {
                res.vertices = patch_vertex_data(&res.vertices, *start, data)?;
            }

            VertexArrayUpdate::Instances { start, data } => {
                res.instances = patch_vertex_data(&res.instances, *start, data)?;
            }

            VertexArrayUpdate::Indices { start, indices } => {
                let len = res.indices.len();
                let end = start
                    .checked_add(indices.len())
                    .filter(|&end| end <= len)
                    .ok_or(Error::UpdateOutOfBounds {
                        start: *start,
                        count: indices.len(),
                        len,
                    })?;

                let vertex_count = res.vertices.len();
                if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(Error::IndexOutOfRange {
                        index,
                        vertex_count,
                    }
                    .into());
                }

                res.indices[*start..end].copy_from_slice(indices);
            }
        }

        Ok(())
    }

    fn new_render_targets(
        &self,
        color_attachment_points: &[ColorAttachmentPoint],
        depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
        storage: Storage,
    ) -> Result<Self::RenderTargets, Self::Err> {
        let id = self.shared.state.lock().new_render_targets(
            color_attachment_points,
            depth_stencil_attachment_point,
            storage,
            None,
        );

        debug!(self, "new render targets {id:?}");
        Ok(self.handle(id))
    }

    fn drop_render_targets(render_targets: &Self::RenderTargets) {
        let mut state = render_targets.shared().state.lock();

        let owned = state
            .render_targets
            .get(render_targets.id())
            .map_or(false, |res| res.swap_chain.is_some());

        // swap chains release their own render targets
        if !owned {
            state.remove_render_targets(render_targets.id());
        }
    }

    fn get_color_attachment(
        render_targets: &Self::RenderTargets,
        index: usize,
    ) -> Result<Self::ColorAttachment, Self::Err> {
        let state = render_targets.shared().state.lock();
        let res = get(&state.render_targets, render_targets.id())?;

        res.color
            .iter()
            .find(|(point, _)| point.index() == index)
            .map(|&(_, texture)| Attachment {
                render_targets: render_targets.id(),
                texture,
            })
            .ok_or_else(|| HeadlessError::NoSuchAttachment {
                attachment: format!("color attachment {index}"),
            })
    }

    fn get_depth_stencil_attachment(
        render_targets: &Self::RenderTargets,
    ) -> Result<Self::DepthStencilAttachment, Self::Err> {
        let state = render_targets.shared().state.lock();
        let res = get(&state.render_targets, render_targets.id())?;

        res.depth_stencil_texture()
            .map(|texture| Attachment {
                render_targets: render_targets.id(),
                texture,
            })
            .ok_or_else(|| HeadlessError::NoSuchAttachment {
                attachment: "depth/stencil attachment".to_owned(),
            })
    }

    fn new_shader(&self, sources: &ShaderSources) -> Result<Self::Shader, Self::Err> {
        let declarations = Declarations::parse(sources)?;
        let id = self
            .shared
            .state
            .lock()
            .shaders
            .insert(ShaderRes { declarations });

        debug!(self, "new shader {id:?}");
        Ok(self.handle(id))
    }

    fn drop_shader(shader: &Self::Shader) {
        shader.shared().state.lock().shaders.remove(shader.id());
    }

    fn get_uniform(
        shader: &Self::Shader,
        name: &str,
        ty: UniformType,
    ) -> Result<Self::Uniform, Self::Err> {
        let state = shader.shared().state.lock();
        get(&state.shaders, shader.id())?
            .declarations
            .uniform(name, ty)?;

        Ok(ShaderName {
            shader: shader.id(),
            name: name.to_owned(),
        })
    }

    fn get_shader_texture_binding_point(
        shader: &Self::Shader,
        name: &str,
    ) -> Result<Self::ShaderTextureBindingPoint, Self::Err> {
        let state = shader.shared().state.lock();
        get(&state.shaders, shader.id())?.declarations.sampler(name)?;

        Ok(ShaderName {
            shader: shader.id(),
            name: name.to_owned(),
        })
    }

    fn get_shader_uniform_buffer_binding_point(
        shader: &Self::Shader,
        name: &str,
    ) -> Result<Self::ShaderUniformBufferBindingPoint, Self::Err> {
        let state = shader.shared().state.lock();
        get(&state.shaders, shader.id())?.declarations.block(name)?;

        Ok(ShaderName {
            shader: shader.id(),
            name: name.to_owned(),
        })
    }

    fn new_uniform_buffer(&self, bytes: &[u8]) -> Result<Self::UniformBuffer, Self::Err> {
        let id = self
            .shared
            .state
            .lock()
            .uniform_buffers
            .insert(UniformBufferRes {
                bytes: bytes.to_vec(),
            });

        debug!(self, "new uniform buffer {id:?}: {} bytes", bytes.len());
        Ok(self.handle(id))
    }

    fn drop_uniform_buffer(uniform_buffer: &Self::UniformBuffer) {
        uniform_buffer
            .shared()
            .state
            .lock()
            .uniform_buffers
            .remove(uniform_buffer.id());
    }

    fn update_uniform_buffer(
        uniform_buffer: &Self::UniformBuffer,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), Self::Err> {
        let mut state = uniform_buffer.shared().state.lock();
        let res = get_mut(&mut state.uniform_buffers, uniform_buffer.id())?;

        let len = res.bytes.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= len)
            .ok_or(Error::UpdateOutOfBounds {
                start: offset,
                count: bytes.len(),
                len,
            })?;

        res.bytes[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    fn new_texture(
        &self,
        storage: Storage,
        pixel: Pixel,
        sampling: Sampling,
    ) -> Result<Self::Texture, Self::Err> {
        let id = self
            .shared
            .state
            .lock()
            .textures
            .insert(TextureRes::new(storage, pixel, sampling));

        debug!(self, "new texture {id:?}: {storage:?}, {pixel:?}");
        Ok(self.handle(id))
    }

    fn drop_texture(texture: &Self::Texture) {
        texture.shared().state.lock().textures.remove(texture.id());
    }

    fn resize_texture(texture: &Self::Texture, size: Size) -> Result<(), Self::Err> {
        let mut state = texture.shared().state.lock();
        let res = get_mut(&mut state.textures, texture.id())?;

        let storage = res.storage().resized(size).ok_or(Error::IncompatibleSize)?;
        res.texels = Texels::new(storage, res.pixel);

        Ok(())
    }

    fn set_texels(
        texture: &Self::Texture,
        rect: Rect,
        mipmaps: bool,
        level: usize,
        texels: &[u8],
    ) -> Result<(), Self::Err> {
        let mut state = texture.shared().state.lock();
        let res = get_mut(&mut state.textures, texture.id())?;

        res.texels.set(rect, level, texels)?;

        if mipmaps {
            res.texels.regenerate_mipmaps(level);
        }

        Ok(())
    }

    fn clear_texels(
        texture: &Self::Texture,
        rect: Rect,
        mipmaps: bool,
        clear_value: &[u8],
    ) -> Result<(), Self::Err> {
        let mut state = texture.shared().state.lock();
        let res = get_mut(&mut state.textures, texture.id())?;

        res.texels.clear(rect, clear_value)?;

        if mipmaps {
            res.texels.regenerate_mipmaps(0);
        }

        Ok(())
    }

    fn new_cmd_buf(&self) -> Result<Self::CmdBuf, Self::Err> {
        let id = self.shared.state.lock().cmd_bufs.insert(CmdBufRes::default());
        Ok(self.handle(id))
    }

    fn drop_cmd_buf(cmd_buf: &Self::CmdBuf) {
        cmd_buf.shared().state.lock().cmd_bufs.remove(cmd_buf.id());
    }

    fn cmd_buf_blending(cmd_buf: &Self::CmdBuf, blending: BlendingMode) -> Result<(), Self::Err> {
        record(cmd_buf, Command::Blending(blending))
    }

    fn cmd_buf_depth_test(cmd_buf: &Self::CmdBuf, depth_test: DepthTest) -> Result<(), Self::Err> {
        record(cmd_buf, Command::DepthTest(depth_test))
    }

    fn cmd_buf_depth_write(
        cmd_buf: &Self::CmdBuf,
        depth_write: DepthWrite,
    ) -> Result<(), Self::Err> {
        record(cmd_buf, Command::DepthWrite(depth_write))
    }

    fn cmd_buf_stencil_test(
        cmd_buf: &Self::CmdBuf,
        stencil_test: StencilTest,
    ) -> Result<(), Self::Err> {
        record(cmd_buf, Command::StencilTest(stencil_test))
    }

    fn cmd_buf_face_culling(
        cmd_buf: &Self::CmdBuf,
        face_culling: FaceCulling,
    ) -> Result<(), Self::Err> {
        record(cmd_buf, Command::FaceCulling(face_culling))
    }

    fn cmd_buf_viewport(cmd_buf: &Self::CmdBuf, viewport: Viewport) -> Result<(), Self::Err> {
        record(cmd_buf, Command::Viewport(viewport))
    }

    fn cmd_buf_scissor(cmd_buf: &Self::CmdBuf, scissor: Scissor) -> Result<(), Self::Err> {
        record(cmd_buf, Command::Scissor(scissor))
    }

    fn cmd_buf_clear_color(
        cmd_buf: &Self::CmdBuf,
        clear_color: Option<RGBA32F>,
    ) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();
        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;

        res.clear_color = clear_color;
        res.commands.push(Command::ClearColor(clear_color));
        Ok(())
    }

    fn cmd_buf_clear_depth(
        cmd_buf: &Self::CmdBuf,
        clear_depth: Option<f32>,
    ) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();
        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;

        res.clear_depth = clear_depth;
        res.commands.push(Command::ClearDepth(clear_depth));
        Ok(())
    }

    fn cmd_buf_clear_stencil(
        cmd_buf: &Self::CmdBuf,
        clear_stencil: Option<i32>,
    ) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();
        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;

        res.clear_stencil = clear_stencil;
        res.commands.push(Command::ClearStencil(clear_stencil));
        Ok(())
    }

    fn cmd_buf_srgb(cmd_buf: &Self::CmdBuf, srgb: bool) -> Result<(), Self::Err> {
        record(cmd_buf, Command::Srgb(srgb))
    }

    fn cmd_buf_set_uniform(
        cmd_buf: &Self::CmdBuf,
        uniform: &Self::Uniform,
        value: &[u8],
    ) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();
        get(&state.shaders, uniform.shader)?;

        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;
        if res.shader != Some(uniform.shader) {
            return Err(Error::ForeignUniform.into());
        }

        res.commands.push(Command::SetUniform {
            name: uniform.name.clone(),
            value: value.to_vec(),
        });

        Ok(())
    }

    fn cmd_buf_bind_texture(
        cmd_buf: &Self::CmdBuf,
        texture: &Self::Texture,
        unit: &u32,
    ) -> Result<(), Self::Err> {
        {
            let state = cmd_buf.shared().state.lock();
            get(&state.textures, texture.id())?;
        }

        record(
            cmd_buf,
            Command::BindTexture {
                texture: texture.scarce_index(),
                unit: *unit,
            },
        )
    }

    fn cmd_buf_associate_texture_unit(
        cmd_buf: &Self::CmdBuf,
        unit: &u32,
        binding_point: &Self::ShaderTextureBindingPoint,
    ) -> Result<(), Self::Err> {
        record(
            cmd_buf,
            Command::AssociateTextureUnit {
                unit: *unit,
                binding_point: binding_point.name.clone(),
            },
        )
    }

    fn cmd_buf_bind_uniform_buffer(
        cmd_buf: &Self::CmdBuf,
        uniform_buffer: &Self::UniformBuffer,
        unit: &u32,
    ) -> Result<(), Self::Err> {
        {
            let state = cmd_buf.shared().state.lock();
            get(&state.uniform_buffers, uniform_buffer.id())?;
        }

        record(
            cmd_buf,
            Command::BindUniformBuffer {
                uniform_buffer: uniform_buffer.scarce_index(),
                unit: *unit,
            },
        )
    }

    fn cmd_buf_associate_uniform_buffer_unit(
        cmd_buf: &Self::CmdBuf,
        unit: &u32,
        binding_point: &Self::ShaderUniformBufferBindingPoint,
    ) -> Result<(), Self::Err> {
        record(
            cmd_buf,
            Command::AssociateUniformBufferUnit {
                unit: *unit,
                binding_point: binding_point.name.clone(),
            },
        )
    }

    fn cmd_buf_bind_render_targets(
        cmd_buf: &Self::CmdBuf,
        render_targets: &Self::RenderTargets,
    ) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();

        let rt = get(&state.render_targets, render_targets.id())?;
        let res = get(&state.cmd_bufs, cmd_buf.id())?;

        let depth_stencil_format = rt
            .depth_stencil
            .map(|(point, _)| point.ty().pixel().format);

        let mut buffers = ClearBuffers::empty();
        buffers.set(
            ClearBuffers::COLOR,
            res.clear_color.is_some() && !rt.color.is_empty(),
        );
        buffers.set(
            ClearBuffers::DEPTH,
            res.clear_depth.is_some() && depth_stencil_format.is_some(),
        );
        buffers.set(
            ClearBuffers::STENCIL,
            res.clear_stencil.is_some()
                && matches!(depth_stencil_format, Some(Format::DepthStencil(..))),
        );

        let clear = Clear {
            render_targets: render_targets.id(),
            color: res.clear_color.filter(|_| buffers.contains(ClearBuffers::COLOR)),
            depth: res.clear_depth.filter(|_| buffers.contains(ClearBuffers::DEPTH)),
            stencil: res
                .clear_stencil
                .filter(|_| buffers.contains(ClearBuffers::STENCIL)),
        };

        if !buffers.is_empty() {
            state.check_clear(&clear)?;
        }

        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;
        if !buffers.is_empty() {
            res.clears.push(clear);
        }
        res.commands.push(Command::BindRenderTargets {
            render_targets: render_targets.scarce_index(),
            clear: buffers,
        });

        Ok(())
    }

    fn cmd_buf_bind_shader(cmd_buf: &Self::CmdBuf, shader: &Self::Shader) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();
        get(&state.shaders, shader.id())?;

        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;
        res.shader = Some(shader.id());
        res.commands.push(Command::BindShader {
            shader: shader.scarce_index(),
        });

        Ok(())
    }

    fn cmd_buf_draw_vertex_array(
        cmd_buf: &Self::CmdBuf,
        vertex_array: &Self::VertexArray,
        start: usize,
        count: usize,
        instances: usize,
    ) -> Result<(), Self::Err> {
        {
            let state = cmd_buf.shared().state.lock();
            get(&state.vertex_arrays, vertex_array.id())?;
        }

        record(
            cmd_buf,
            Command::Draw {
                vertex_array: vertex_array.id().to_bits(),
                start,
                count,
                instances,
            },
        )
    }

    fn cmd_buf_finish(cmd_buf: &Self::CmdBuf) -> Result<(), Self::Err> {
        let mut state = cmd_buf.shared().state.lock();

        // nothing is cleared or submitted unless every clear can run
        for clear in &get(&state.cmd_bufs, cmd_buf.id())?.clears {
            state.check_clear(clear)?;
        }

        let res = get_mut(&mut state.cmd_bufs, cmd_buf.id())?;
        let commands = std::mem::take(&mut res.commands);
        let clears = std::mem::take(&mut res.clears);

        for clear in &clears {
            state.clear(clear)?;
        }

        trace!(
            cmd_buf.shared(),
            "submitting {} commands, {} clears",
            commands.len(),
            clears.len()
        );
        state.submissions.push(Submission { commands });

        Ok(())
    }

    fn new_swap_chain(
        &self,
        width: u32,
        height: u32,
        mode: SwapChainMode,
    ) -> Result<Self::SwapChain, Self::Err> {
        let mut state = self.shared.state.lock();

        let render_targets = state.new_render_targets(
            &[ColorAttachmentPoint::new(0, "color", ColorType::RGBA8)],
            None,
            Storage::Flat2D { width, height },
            None,
        );
        let id = state.swap_chains.insert(SwapChainRes {
            width,
            height,
            mode,
            render_targets,
            frames: 0,
        });
        get_mut(&mut state.render_targets, render_targets)?.swap_chain = Some(id);

        drop(state);
        debug!(self, "new swap chain {id:?}: {width}x{height}, {mode:?}");

        Ok(self.handle(id))
    }

    fn drop_swap_chain(swap_chain: &Self::SwapChain) {
        let mut state = swap_chain.shared().state.lock();

        if let Some(res) = state.swap_chains.remove(swap_chain.id()) {
            state.remove_render_targets(res.render_targets);
        }
    }

    fn swap_chain_render_targets(
        swap_chain: &Self::SwapChain,
    ) -> Result<Self::RenderTargets, Self::Err> {
        let state = swap_chain.shared().state.lock();
        let res = get(&state.swap_chains, swap_chain.id())?;

        Ok(Handle::new(res.render_targets, swap_chain.shared().clone()))
    }

    fn present_render_targets(
        swap_chain: &Self::SwapChain,
        render_targets: &Self::RenderTargets,
    ) -> Result<(), Self::Err> {
        let mut guard = swap_chain.shared().state.lock();
        let state = &mut *guard;

        let rt = get(&state.render_targets, render_targets.id())?;
        if rt.swap_chain != Some(swap_chain.id()) {
            return Err(HeadlessError::ForeignRenderTargets);
        }

        let texels = match rt.color.first() {
            Some(&(_, texture)) => get(&state.textures, texture)?
                .level(0)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let res = get_mut(&mut state.swap_chains, swap_chain.id())?;
        state.presentations.push(Presentation {
            swap_chain: swap_chain.id().to_bits(),
            frame: res.frames,
            texels,
        });
        res.frames += 1;

        Ok(())
    }
}
