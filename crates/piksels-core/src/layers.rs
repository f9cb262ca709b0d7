//! Command recording with layers.
//!
//! A [`Layer`] records commands into a single command buffer. Layers nest:
//! binding render targets opens a scope in which a shader can be bound, and
//! binding a shader opens a scope in which uniforms can be set and vertex
//! arrays drawn. Scopes are closed with [`Layer::done`], which gives back the
//! enclosing layer, and the top layer is submitted with [`Layer::finish`].
//!
//! Nesting is tracked in the type of the layer, so that drawing without a
//! shader, or finishing with scopes still open, does not compile:
//!
//! ```ignore
//! device
//!     .new_layers()?
//!     .clear_color(Some(RGBA32F::BLACK))?
//!     .render_targets(&render_targets)?
//!     .shader(&shader)?
//!     .uniform(&time, &1.5f32)?
//!     .draw(&triangle)?
//!     .done()
//!     .done()
//!     .finish()?;
//! ```
//!
//! Textures and uniform buffers bound in a scope hold on to their unit until
//! the scope is done.

use std::marker::PhantomData;

use piksels_backend::{
    blending::BlendingMode,
    color::RGBA32F,
    depth_stencil::{DepthTest, DepthWrite, StencilTest},
    face_culling::FaceCulling,
    scissor::Scissor,
    viewport::Viewport,
    Backend, Error, Scarce,
};
use smallvec::SmallVec;

use crate::{
    cmd_buf::CmdBuf,
    pipeline::PipelineCache,
    render_targets::RenderTargets,
    shader::{Shader, ShaderTextureBindingPoint, ShaderUniformBufferBindingPoint, Uniform, UniformBuffer},
    texture::Texture,
    uniform::UniformValue,
    units::Units,
    vertex_array::{VertexArray, VertexArrayView, View},
};

/// The outermost level.
#[derive(Debug)]
pub enum Top {}

/// A scope of kind `K` opened inside the stack `P`.
#[derive(Debug)]
pub struct Parent<P, K>(PhantomData<fn() -> (P, K)>);

/// Scope opened by binding render targets.
#[derive(Debug)]
pub enum RenderTargetsScope {}

/// Scope opened by binding a shader.
#[derive(Debug)]
pub enum ShaderScope {}

/// Scope opened by [`Layer::group`]. It has the level of its parent.
#[derive(Debug)]
pub enum GroupScope {}

/// Type-level stack of scopes.
pub trait Stack {
    /// What can be recorded at this point: [`Top`], [`RenderTargetsScope`]
    /// or [`ShaderScope`].
    type Level;
}

impl Stack for Top {
    type Level = Top;
}

impl<P> Stack for Parent<P, RenderTargetsScope>
where
    P: Stack,
{
    type Level = RenderTargetsScope;
}

impl<P> Stack for Parent<P, ShaderScope>
where
    P: Stack,
{
    type Level = ShaderScope;
}

impl<P> Stack for Parent<P, GroupScope>
where
    P: Stack,
{
    type Level = P::Level;
}

/// Scarce resources bound in a scope.
struct InUse<B>
where
    B: Backend,
{
    textures: SmallVec<[B::ScarceIndex; 4]>,
    uniform_buffers: SmallVec<[B::ScarceIndex; 4]>,
}

impl<B> Default for InUse<B>
where
    B: Backend,
{
    fn default() -> Self {
        Self {
            textures: SmallVec::new(),
            uniform_buffers: SmallVec::new(),
        }
    }
}

/// Commands being recorded, at the scope `S`.
pub struct Layer<B, S>
where
    B: Backend,
{
    cmd_buf: CmdBuf<B>,
    cache: PipelineCache<B>,
    texture_units: Units<B>,
    uniform_buffer_units: Units<B>,

    // one entry per open scope, innermost last
    scopes: Vec<InUse<B>>,

    _stack: PhantomData<fn() -> S>,
}

impl<B> Layer<B, Top>
where
    B: Backend,
{
    pub(crate) fn new(
        cmd_buf: CmdBuf<B>,
        max_texture_units: B::Unit,
        max_uniform_buffer_units: B::Unit,
    ) -> Self {
        Self {
            cmd_buf,
            cache: PipelineCache::default(),
            texture_units: Units::new(max_texture_units),
            uniform_buffer_units: Units::new(max_uniform_buffer_units),
            scopes: vec![InUse::default()],
            _stack: PhantomData,
        }
    }

    /// Submits the recorded commands.
    pub fn finish(self) -> Result<(), B::Err> {
        B::cmd_buf_finish(self.cmd_buf.raw())
    }
}

/// Setters skipping the backend when the state is already set.
macro_rules! state_setters {
    ($($(#[$attr:meta])* $name:ident: $ty:ty => $cmd:ident),+ $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name(mut self, $name: $ty) -> Result<Self, B::Err> {
                let cmd_buf = &self.cmd_buf;
                self.cache
                    .$name
                    .set_if_invalid(&$name, || B::$cmd(cmd_buf.raw(), $name))?;
                Ok(self)
            }
        )+
    };
}

impl<B, S> Layer<B, S>
where
    B: Backend,
    S: Stack,
{
    fn change_stack<T>(self) -> Layer<B, T> {
        Layer {
            cmd_buf: self.cmd_buf,
            cache: self.cache,
            texture_units: self.texture_units,
            uniform_buffer_units: self.uniform_buffer_units,
            scopes: self.scopes,
            _stack: PhantomData,
        }
    }

    fn deeper<K>(mut self) -> Layer<B, Parent<S, K>> {
        self.scopes.push(InUse::default());
        self.change_stack()
    }

    // the top level has an entry too, and done() only pops scopes it opened
    fn current_scope(&mut self) -> &mut InUse<B> {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Opens a scope at the current level. Resources bound in it are released
    /// when it is done.
    pub fn group(self) -> Layer<B, Parent<S, GroupScope>> {
        self.deeper()
    }

    state_setters!(
        blending: BlendingMode => cmd_buf_blending,
        depth_test: DepthTest => cmd_buf_depth_test,
        depth_write: DepthWrite => cmd_buf_depth_write,
        stencil_test: StencilTest => cmd_buf_stencil_test,
        face_culling: FaceCulling => cmd_buf_face_culling,
        viewport: Viewport => cmd_buf_viewport,
        scissor: Scissor => cmd_buf_scissor,
        /// Color the color attachments are cleared with when render targets
        /// are bound; `None` to keep their content.
        clear_color: Option<RGBA32F> => cmd_buf_clear_color,
        clear_depth: Option<f32> => cmd_buf_clear_depth,
        clear_stencil: Option<i32> => cmd_buf_clear_stencil,
        srgb: bool => cmd_buf_srgb,
    );

    /// Binds a texture to a unit and associates that unit with a shader
    /// texture binding point.
    ///
    /// ## Errors
    ///
    /// [`Error::NoMoreUnits`] if every texture unit is taken by open scopes.
    pub fn texture(
        mut self,
        texture: &Texture<B>,
        binding_point: &ShaderTextureBindingPoint<B>,
    ) -> Result<Self, B::Err> {
        let scarce_index = texture.raw().scarce_index();
        let ubp = self.texture_units.get_unit(&scarce_index)?;
        self.current_scope().textures.push(scarce_index);

        if !ubp.already_bound {
            B::cmd_buf_bind_texture(self.cmd_buf.raw(), texture.raw(), &ubp.unit)?;
        }

        B::cmd_buf_associate_texture_unit(self.cmd_buf.raw(), &ubp.unit, binding_point.raw())?;
        Ok(self)
    }

    /// Binds a uniform buffer to a unit and associates that unit with a
    /// shader uniform buffer binding point.
    ///
    /// ## Errors
    ///
    /// [`Error::NoMoreUnits`] if every uniform buffer unit is taken by open
    /// scopes.
    pub fn uniform_buffer(
        mut self,
        uniform_buffer: &UniformBuffer<B>,
        binding_point: &ShaderUniformBufferBindingPoint<B>,
    ) -> Result<Self, B::Err> {
        let scarce_index = uniform_buffer.raw().scarce_index();
        let ubp = self.uniform_buffer_units.get_unit(&scarce_index)?;
        self.current_scope().uniform_buffers.push(scarce_index);

        if !ubp.already_bound {
            B::cmd_buf_bind_uniform_buffer(self.cmd_buf.raw(), uniform_buffer.raw(), &ubp.unit)?;
        }

        B::cmd_buf_associate_uniform_buffer_unit(
            self.cmd_buf.raw(),
            &ubp.unit,
            binding_point.raw(),
        )?;
        Ok(self)
    }
}

impl<B, P, K> Layer<B, Parent<P, K>>
where
    B: Backend,
    P: Stack,
    Parent<P, K>: Stack,
{
    /// Closes the scope, releasing the units bound in it.
    pub fn done(mut self) -> Layer<B, P> {
        if let Some(in_use) = self.scopes.pop() {
            for scarce_index in &in_use.textures {
                self.texture_units.release(scarce_index);
            }

            for scarce_index in &in_use.uniform_buffers {
                self.uniform_buffer_units.release(scarce_index);
            }
        }

        self.change_stack()
    }
}

impl<B, S> Layer<B, S>
where
    B: Backend,
    S: Stack<Level = Top>,
{
    /// Binds render targets, clearing them as the clear states say. Binding
    /// the same render targets again clears them again.
    pub fn render_targets(
        self,
        render_targets: &RenderTargets<B>,
    ) -> Result<Layer<B, Parent<S, RenderTargetsScope>>, B::Err> {
        B::cmd_buf_bind_render_targets(self.cmd_buf.raw(), render_targets.raw())?;
        Ok(self.deeper())
    }
}

impl<B, S> Layer<B, S>
where
    B: Backend,
    S: Stack<Level = RenderTargetsScope>,
{
    pub fn shader(mut self, shader: &Shader<B>) -> Result<Layer<B, Parent<S, ShaderScope>>, B::Err> {
        let cmd_buf = &self.cmd_buf;
        self.cache
            .shader
            .set_if_invalid(&shader.raw().scarce_index(), || {
                B::cmd_buf_bind_shader(cmd_buf.raw(), shader.raw())
            })?;

        Ok(self.deeper())
    }
}

impl<B, S> Layer<B, S>
where
    B: Backend,
    S: Stack<Level = ShaderScope>,
{
    /// Sets a uniform of the bound shader.
    ///
    /// ## Errors
    ///
    /// - [`Error::ForeignUniform`] if the uniform was looked up on another
    ///   shader.
    /// - [`Error::UniformTypeMismatch`] if the value does not have the type
    ///   the uniform was declared with.
    pub fn uniform<V>(self, uniform: &Uniform<B>, value: &V) -> Result<Self, B::Err>
    where
        V: UniformValue + ?Sized,
    {
        if self.cache.shader.get() != Some(uniform.shader()) {
            return Err(Error::ForeignUniform.into());
        }

        let found = value.uniform_type();

        if found != uniform.ty() {
            return Err(Error::UniformTypeMismatch {
                expected: uniform.ty(),
                found,
            }
            .into());
        }

        B::cmd_buf_set_uniform(self.cmd_buf.raw(), uniform.raw(), value.as_bytes())?;
        Ok(self)
    }

    /// Draws the whole vertex array.
    pub fn draw(self, vertex_array: &VertexArray<B>) -> Result<Self, B::Err> {
        let view = vertex_array.view(..)?;
        self.draw_view(view)
    }

    pub fn draw_view(self, view: VertexArrayView<'_, B>) -> Result<Self, B::Err> {
        B::cmd_buf_draw_vertex_array(
            self.cmd_buf.raw(),
            view.vertex_array().raw(),
            view.start(),
            view.count(),
            view.instance_count(),
        )?;

        Ok(self)
    }
}
