//! Backend interface of piksels.
//!
//! This crate holds the vocabulary shared by every piksels backend (render
//! states, pixel formats, texture storages, vertex layouts, shader uniform
//! types, etc.) along with the [`Backend`] trait itself.
//!
//! End users are not supposed to call [`Backend`] methods directly: the
//! `piksels-core` crate wraps them in a typed, validated and cached API. Only
//! backend authors should implement anything from here.

use std::{fmt::Debug, hash::Hash};

use blending::BlendingMode;
use color::RGBA32F;
use depth_stencil::{DepthTest, DepthWrite, StencilTest};
use extension::{
    logger::{Logger, LoggerExt},
    ExtensionsBuilder,
};
use face_culling::FaceCulling;
use pixel::Pixel;
use primitive::Connector;
use render_targets::{ColorAttachmentPoint, DepthStencilAttachmentPoint};
use scissor::Scissor;
use shader::{ShaderSources, UniformType};
use swap_chain::SwapChainMode;
use texture::{Rect, Sampling, Size, Storage};
use vertex_array::{VertexArrayData, VertexArrayUpdate};
use viewport::Viewport;

/// Creates getters returning copies of private fields.
macro_rules! mk_bckd_type_getters {
    ($ty:ty, $($method_name:ident -> $method_ret:ty),+ $(,)?) => {
        impl $ty {
            $(
                #[must_use]
                pub fn $method_name(&self) -> $method_ret {
                    self.$method_name
                }
            )+
        }
    };
}

pub mod blending;
pub mod cache;
pub mod color;
pub mod depth_stencil;
pub mod error;
pub mod extension;
pub mod face_culling;
pub mod pixel;
pub mod primitive;
pub mod render_targets;
pub mod scissor;
pub mod shader;
pub mod swap_chain;
pub mod texture;
pub mod vertex;
pub mod vertex_array;
pub mod viewport;

pub use error::Error;

/// Build information about a backend.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BackendInfo {
    pub version: &'static str,
    pub git_commit_hash: &'static str,
}

/// Scarce resources are backend objects that compete for a limited amount of
/// device slots (units). The index identifies the resource so that the core can
/// tell whether a unit is still bound to it.
pub trait Scarce<B>
where
    B: Backend,
{
    fn scarce_index(&self) -> B::ScarceIndex;

    /// Creates another handle to the same underlying resource.
    fn scarce_clone(&self) -> Self;
}

/// Device binding slot, such as a texture unit.
///
/// The default value is the first unit, and [`Unit::next_unit`] advances to the
/// following one.
pub trait Unit: Clone + Debug + Default + Eq + Hash + Ord {
    fn next_unit(&mut self);
}

impl Unit for u32 {
    fn next_unit(&mut self) {
        *self += 1;
    }
}

/// A graphics backend.
///
/// Functions taking `&self` act on the device. Functions acting on a single
/// resource are associated functions, so that resources can be released or
/// recorded into without borrowing the backend.
pub trait Backend: Sized {
    type Err: From<Error> + Debug;

    /// Index identifying scarce resources.
    type ScarceIndex: Clone + Debug + Eq + Hash;

    /// Binding slot for textures and uniform buffers.
    type Unit: Unit;

    type CmdBuf;
    type ColorAttachment;
    type DepthStencilAttachment;
    type RenderTargets: Scarce<Self>;
    type Shader: Scarce<Self>;
    type ShaderTextureBindingPoint;
    type ShaderUniformBufferBindingPoint;
    type SwapChain;
    type Texture: Scarce<Self>;
    type Uniform;
    type UniformBuffer: Scarce<Self>;
    type VertexArray;

    /// Builds the backend with the given extensions.
    fn build<L>(extensions: ExtensionsBuilder<LoggerExt<L>>) -> Result<Self, Self::Err>
    where
        L: 'static + Logger;

    /// Backend author.
    fn author(&self) -> Result<String, Self::Err>;

    /// Backend name.
    fn name(&self) -> Result<String, Self::Err>;

    /// Backend version.
    fn version(&self) -> Result<String, Self::Err>;

    /// Backend shading language version.
    fn shading_lang_version(&self) -> Result<String, Self::Err>;

    /// Build information.
    fn info(&self) -> Result<BackendInfo, Self::Err>;

    /// Exclusive upper bound of texture units.
    fn max_texture_units(&self) -> Result<Self::Unit, Self::Err>;

    /// Exclusive upper bound of uniform buffer units.
    fn max_uniform_buffer_units(&self) -> Result<Self::Unit, Self::Err>;

    fn new_vertex_array(
        &self,
        connector: Connector,
        vertices: &VertexArrayData,
        instances: &VertexArrayData,
        indices: &[u32],
    ) -> Result<Self::VertexArray, Self::Err>;

    fn drop_vertex_array(vertex_array: &Self::VertexArray);

    fn update_vertex_array(
        vertex_array: &Self::VertexArray,
        update: &VertexArrayUpdate,
    ) -> Result<(), Self::Err>;

    /// Creates render targets. Color attachment points are sorted by index
    /// and their indices are unique.
    fn new_render_targets(
        &self,
        color_attachment_points: &[ColorAttachmentPoint],
        depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
        storage: Storage,
    ) -> Result<Self::RenderTargets, Self::Err>;

    fn drop_render_targets(render_targets: &Self::RenderTargets);

    fn get_color_attachment(
        render_targets: &Self::RenderTargets,
        index: usize,
    ) -> Result<Self::ColorAttachment, Self::Err>;

    fn get_depth_stencil_attachment(
        render_targets: &Self::RenderTargets,
    ) -> Result<Self::DepthStencilAttachment, Self::Err>;

    fn new_shader(&self, sources: &ShaderSources) -> Result<Self::Shader, Self::Err>;

    fn drop_shader(shader: &Self::Shader);

    fn get_uniform(
        shader: &Self::Shader,
        name: &str,
        ty: UniformType,
    ) -> Result<Self::Uniform, Self::Err>;

    fn get_shader_texture_binding_point(
        shader: &Self::Shader,
        name: &str,
    ) -> Result<Self::ShaderTextureBindingPoint, Self::Err>;

    fn get_shader_uniform_buffer_binding_point(
        shader: &Self::Shader,
        name: &str,
    ) -> Result<Self::ShaderUniformBufferBindingPoint, Self::Err>;

    fn new_uniform_buffer(&self, bytes: &[u8]) -> Result<Self::UniformBuffer, Self::Err>;

    fn drop_uniform_buffer(uniform_buffer: &Self::UniformBuffer);

    fn update_uniform_buffer(
        uniform_buffer: &Self::UniformBuffer,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), Self::Err>;

    fn new_texture(
        &self,
        storage: Storage,
        pixel: Pixel,
        sampling: Sampling,
    ) -> Result<Self::Texture, Self::Err>;

    fn drop_texture(texture: &Self::Texture);

    /// Resizes a texture. Texels are lost.
    fn resize_texture(texture: &Self::Texture, size: Size) -> Result<(), Self::Err>;

    /// Uploads texels into a region of a mipmap level. If `mipmaps` is set,
    /// the levels below are regenerated.
    fn set_texels(
        texture: &Self::Texture,
        rect: Rect,
        mipmaps: bool,
        level: usize,
        texels: &[u8],
    ) -> Result<(), Self::Err>;

    /// Fills a region of the base level with a single pixel value.
    fn clear_texels(
        texture: &Self::Texture,
        rect: Rect,
        mipmaps: bool,
        clear_value: &[u8],
    ) -> Result<(), Self::Err>;

    fn new_cmd_buf(&self) -> Result<Self::CmdBuf, Self::Err>;

    fn drop_cmd_buf(cmd_buf: &Self::CmdBuf);

    fn cmd_buf_blending(cmd_buf: &Self::CmdBuf, blending: BlendingMode) -> Result<(), Self::Err>;

    fn cmd_buf_depth_test(cmd_buf: &Self::CmdBuf, depth_test: DepthTest)
        -> Result<(), Self::Err>;

    fn cmd_buf_depth_write(
        cmd_buf: &Self::CmdBuf,
        depth_write: DepthWrite,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_stencil_test(
        cmd_buf: &Self::CmdBuf,
        stencil_test: StencilTest,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_face_culling(
        cmd_buf: &Self::CmdBuf,
        face_culling: FaceCulling,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_viewport(cmd_buf: &Self::CmdBuf, viewport: Viewport) -> Result<(), Self::Err>;

    fn cmd_buf_scissor(cmd_buf: &Self::CmdBuf, scissor: Scissor) -> Result<(), Self::Err>;

    /// Color used to clear color attachments when render targets get bound;
    /// `None` disables color clearing.
    fn cmd_buf_clear_color(
        cmd_buf: &Self::CmdBuf,
        clear_color: Option<RGBA32F>,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_clear_depth(
        cmd_buf: &Self::CmdBuf,
        clear_depth: Option<f32>,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_clear_stencil(
        cmd_buf: &Self::CmdBuf,
        clear_stencil: Option<i32>,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_srgb(cmd_buf: &Self::CmdBuf, srgb: bool) -> Result<(), Self::Err>;

    /// Sets a uniform of the currently bound shader. `value` holds exactly
    /// [`UniformType::size`] bytes.
    fn cmd_buf_set_uniform(
        cmd_buf: &Self::CmdBuf,
        uniform: &Self::Uniform,
        value: &[u8],
    ) -> Result<(), Self::Err>;

    fn cmd_buf_bind_texture(
        cmd_buf: &Self::CmdBuf,
        texture: &Self::Texture,
        unit: &Self::Unit,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_associate_texture_unit(
        cmd_buf: &Self::CmdBuf,
        unit: &Self::Unit,
        binding_point: &Self::ShaderTextureBindingPoint,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_bind_uniform_buffer(
        cmd_buf: &Self::CmdBuf,
        uniform_buffer: &Self::UniformBuffer,
        unit: &Self::Unit,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_associate_uniform_buffer_unit(
        cmd_buf: &Self::CmdBuf,
        unit: &Self::Unit,
        binding_point: &Self::ShaderUniformBufferBindingPoint,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_bind_render_targets(
        cmd_buf: &Self::CmdBuf,
        render_targets: &Self::RenderTargets,
    ) -> Result<(), Self::Err>;

    fn cmd_buf_bind_shader(cmd_buf: &Self::CmdBuf, shader: &Self::Shader)
        -> Result<(), Self::Err>;

    /// Draws `count` elements starting at `start`, `instances` times.
    fn cmd_buf_draw_vertex_array(
        cmd_buf: &Self::CmdBuf,
        vertex_array: &Self::VertexArray,
        start: usize,
        count: usize,
        instances: usize,
    ) -> Result<(), Self::Err>;

    /// Submits the recorded commands.
    fn cmd_buf_finish(cmd_buf: &Self::CmdBuf) -> Result<(), Self::Err>;

    fn new_swap_chain(
        &self,
        width: u32,
        height: u32,
        mode: SwapChainMode,
    ) -> Result<Self::SwapChain, Self::Err>;

    fn drop_swap_chain(swap_chain: &Self::SwapChain);

    fn swap_chain_render_targets(
        swap_chain: &Self::SwapChain,
    ) -> Result<Self::RenderTargets, Self::Err>;

    fn present_render_targets(
        swap_chain: &Self::SwapChain,
        render_targets: &Self::RenderTargets,
    ) -> Result<(), Self::Err>;
}
