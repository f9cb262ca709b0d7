//! Resources and the state they live in.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use piksels_backend::{
    color::RGBA32F,
    extension::logger::{BackendLogger, LogEntry, Logger},
    pixel::{ChannelBits, Format, Pixel, Type},
    primitive::Connector,
    render_targets::{ColorAttachmentPoint, DepthStencilAttachmentPoint},
    swap_chain::SwapChainMode,
    texture::{Sampling, Storage},
    vertex_array::{MemoryLayout, VertexArrayData},
    Error,
};
use smallvec::SmallVec;
use structures::pool::{Id, Pool};

use crate::{
    command::{Command, Presentation, Submission},
    error::HeadlessError,
    shader::Declarations,
    texels::Texels,
};

/// State shared by the backend and every handle it gave out.
pub(crate) struct Shared {
    pub state: Mutex<State>,
    logger: Box<dyn Logger>,
}

impl Shared {
    pub fn new(logger: Box<dyn Logger>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            logger,
        }
    }
}

impl BackendLogger for Shared {
    fn log(&self, entry: LogEntry) {
        self.logger.log(entry);
    }
}

#[derive(Default)]
pub(crate) struct State {
    pub vertex_arrays: Pool<VertexArrayRes>,
    pub textures: Pool<TextureRes>,
    pub render_targets: Pool<RenderTargetsRes>,
    pub shaders: Pool<ShaderRes>,
    pub uniform_buffers: Pool<UniformBufferRes>,
    pub cmd_bufs: Pool<CmdBufRes>,
    pub swap_chains: Pool<SwapChainRes>,
    pub submissions: Vec<Submission>,
    pub presentations: Vec<Presentation>,
}

/// A resource kind, named in errors.
pub(crate) trait Resource: Sized {
    const KIND: &'static str;
}

macro_rules! resources {
    ($($ty:ident => $kind:literal),+ $(,)?) => {
        $(
            impl Resource for $ty {
                const KIND: &'static str = $kind;
            }
        )+
    };
}

resources!(
    VertexArrayRes => "vertex array",
    TextureRes => "texture",
    RenderTargetsRes => "render targets",
    ShaderRes => "shader",
    UniformBufferRes => "uniform buffer",
    CmdBufRes => "command buffer",
    SwapChainRes => "swap chain",
);

pub(crate) fn get<T>(pool: &Pool<T>, id: Id<T>) -> Result<&T, HeadlessError>
where
    T: Resource,
{
    pool.get(id)
        .ok_or(HeadlessError::UnknownResource { kind: T::KIND })
}

pub(crate) fn get_mut<T>(pool: &mut Pool<T>, id: Id<T>) -> Result<&mut T, HeadlessError>
where
    T: Resource,
{
    pool.get_mut(id)
        .ok_or(HeadlessError::UnknownResource { kind: T::KIND })
}

/// A backend handle: the identifier of a resource along with the state it
/// lives in.
pub struct Handle<T> {
    id: Id<T>,
    shared: Arc<Shared>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: Id<T>, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    #[must_use]
    pub fn id(&self) -> Id<T> {
        self.id
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            shared: self.shared.clone(),
        }
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

/// An attachment of render targets.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub(crate) render_targets: Id<RenderTargetsRes>,
    pub(crate) texture: Id<TextureRes>,
}

impl Attachment {
    #[must_use]
    pub fn render_targets(&self) -> Id<RenderTargetsRes> {
        self.render_targets
    }

    #[must_use]
    pub fn texture(&self) -> Id<TextureRes> {
        self.texture
    }
}

/// A named declaration of a shader: a uniform or a binding point.
#[derive(Clone, Debug)]
pub struct ShaderName {
    pub(crate) shader: Id<ShaderRes>,
    pub(crate) name: String,
}

impl ShaderName {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct VertexArrayRes {
    pub(crate) connector: Connector,
    pub(crate) vertices: VertexArrayData,
    pub(crate) instances: VertexArrayData,
    pub(crate) indices: Vec<u32>,
}

impl VertexArrayRes {
    #[must_use]
    pub fn connector(&self) -> Connector {
        self.connector
    }

    #[must_use]
    pub fn vertices(&self) -> &VertexArrayData {
        &self.vertices
    }

    #[must_use]
    pub fn instances(&self) -> &VertexArrayData {
        &self.instances
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// Overwrites `data.len()` elements of `target`, starting at `start`.
pub(crate) fn patch_vertex_data(
    target: &VertexArrayData,
    start: usize,
    data: &VertexArrayData,
) -> Result<VertexArrayData, HeadlessError> {
    let out_of_bounds = || Error::UpdateOutOfBounds {
        start,
        count: data.len(),
        len: target.len(),
    };

    let splice = |dst: &mut Vec<u8>, elem_size: usize, src: &[u8]| {
        let offset = start.checked_mul(elem_size).ok_or_else(out_of_bounds)?;
        let end = offset
            .checked_add(src.len())
            .filter(|&end| end <= dst.len())
            .ok_or_else(out_of_bounds)?;

        dst[offset..end].copy_from_slice(src);
        Ok::<_, Error>(())
    };

    let layout = match (target.layout(), data.layout()) {
        (MemoryLayout::Interleaved { bytes }, MemoryLayout::Interleaved { bytes: src }) => {
            let mut bytes = bytes.clone();
            splice(&mut bytes, target.stride(), src)?;
            MemoryLayout::Interleaved { bytes }
        }

        (
            MemoryLayout::Deinterleaved { bytes_per_attr },
            MemoryLayout::Deinterleaved {
                bytes_per_attr: src,
            },
        ) => {
            let mut bytes_per_attr = bytes_per_attr.clone();

            for ((attr, dst), src) in target.attrs().iter().zip(&mut bytes_per_attr).zip(src) {
                splice(dst, attr.size(), src)?;
            }

            MemoryLayout::Deinterleaved { bytes_per_attr }
        }

        _ => {
            return Err(Error::InvalidVertexData {
                reason: "memory layout differs from the vertex array one".to_owned(),
            }
            .into())
        }
    };

    Ok(VertexArrayData::new(target.attrs().to_vec(), layout))
}

pub struct TextureRes {
    pub(crate) pixel: Pixel,
    pub(crate) sampling: Sampling,
    pub(crate) texels: Texels,
}

impl TextureRes {
    pub(crate) fn new(storage: Storage, pixel: Pixel, sampling: Sampling) -> Self {
        Self {
            pixel,
            sampling,
            texels: Texels::new(storage, pixel),
        }
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        self.texels.storage()
    }

    #[must_use]
    pub fn pixel(&self) -> Pixel {
        self.pixel
    }

    #[must_use]
    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Texels of a mipmap level.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&[u8]> {
        self.texels.level(level)
    }

    #[must_use]
    pub fn mipmap_levels(&self) -> usize {
        self.texels.level_count()
    }

    fn clear_color(&mut self, color: RGBA32F) -> Result<(), HeadlessError> {
        let value = encode_color(color, self.pixel)?;
        self.texels
            .for_each_texel_mut(0, |texel| texel.copy_from_slice(&value));
        Ok(())
    }

    fn clear_depth_stencil(
        &mut self,
        depth: Option<f32>,
        stencil: Option<i32>,
    ) -> Result<(), HeadlessError> {
        let has_stencil = depth_stencil_layout(self.pixel)?;

        self.texels.for_each_texel_mut(0, |texel| {
            if let Some(depth) = depth {
                texel[..4].copy_from_slice(&depth.to_le_bytes());
            }

            if let (true, Some(stencil)) = (has_stencil, stencil) {
                // only the low bits are stored
                texel[4] = stencil as u8;
            }
        });

        Ok(())
    }
}

/// Whether a depth/stencil pixel has a stencil. Only `Depth(32)` and
/// `DepthStencil(32, 8)` can be cleared.
fn depth_stencil_layout(pixel: Pixel) -> Result<bool, HeadlessError> {
    match pixel.format {
        Format::Depth(ChannelBits::ThirtyTwo) => Ok(false),
        Format::DepthStencil(ChannelBits::ThirtyTwo, ChannelBits::Eight) => Ok(true),
        _ => Err(unimplemented_clear(pixel)),
    }
}

fn unimplemented_clear(pixel: Pixel) -> HeadlessError {
    HeadlessError::Unimplemented {
        what: format!("clearing {pixel:?} attachments"),
    }
}

/// Encodes a clear color into a pixel. 8-bit channels are quantized, 32-bit
/// floating channels are stored as is.
fn encode_color(color: RGBA32F, pixel: Pixel) -> Result<SmallVec<[u8; 16]>, HeadlessError> {
    let channels = pixel.channels_len();
    let size = pixel.format.bytes();

    if size == channels {
        let q = color.to_rgba8();
        Ok(SmallVec::from_slice(&[q.r, q.g, q.b, q.a][..channels]))
    } else if size == 4 * channels && pixel.encoding == Type::Floating {
        Ok([color.r, color.g, color.b, color.a][..channels]
            .iter()
            .flat_map(|c| c.to_le_bytes())
            .collect())
    } else {
        Err(unimplemented_clear(pixel))
    }
}

pub struct RenderTargetsRes {
    pub(crate) storage: Storage,
    pub(crate) color: SmallVec<[(ColorAttachmentPoint, Id<TextureRes>); 4]>,
    pub(crate) depth_stencil: Option<(DepthStencilAttachmentPoint, Id<TextureRes>)>,

    /// The owning swap chain, if any.
    pub(crate) swap_chain: Option<Id<SwapChainRes>>,
}

impl RenderTargetsRes {
    #[must_use]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    /// Textures of the color attachments, by attachment point.
    pub fn color_textures(&self) -> impl Iterator<Item = (ColorAttachmentPoint, Id<TextureRes>)> + '_ {
        self.color.iter().copied()
    }

    #[must_use]
    pub fn depth_stencil_texture(&self) -> Option<Id<TextureRes>> {
        self.depth_stencil.map(|(_, texture)| texture)
    }
}

pub struct ShaderRes {
    pub(crate) declarations: Declarations,
}

pub struct UniformBufferRes {
    pub(crate) bytes: Vec<u8>,
}

impl UniformBufferRes {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Clears to run when a command buffer is submitted.
pub(crate) struct Clear {
    pub render_targets: Id<RenderTargetsRes>,
    pub color: Option<RGBA32F>,
    pub depth: Option<f32>,
    pub stencil: Option<i32>,
}

#[derive(Default)]
pub struct CmdBufRes {
    pub(crate) commands: Vec<Command>,
    pub(crate) clear_color: Option<RGBA32F>,
    pub(crate) clear_depth: Option<f32>,
    pub(crate) clear_stencil: Option<i32>,
    pub(crate) clears: Vec<Clear>,
    pub(crate) shader: Option<Id<ShaderRes>>,
}

impl CmdBufRes {
    /// Commands recorded since the last submission.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

pub struct SwapChainRes {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) mode: SwapChainMode,
    pub(crate) render_targets: Id<RenderTargetsRes>,
    pub(crate) frames: u64,
}

impl SwapChainRes {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn mode(&self) -> SwapChainMode {
        self.mode
    }
}

impl State {
    /// Creates render targets along with one texture per attachment.
    pub fn new_render_targets(
        &mut self,
        color_attachment_points: &[ColorAttachmentPoint],
        depth_stencil_attachment_point: Option<DepthStencilAttachmentPoint>,
        storage: Storage,
        swap_chain: Option<Id<SwapChainRes>>,
    ) -> Id<RenderTargetsRes> {
        let sampling = Sampling::default();

        let color = color_attachment_points
            .iter()
            .map(|point| {
                let texture = TextureRes::new(storage, point.ty().pixel(), sampling);
                (*point, self.textures.insert(texture))
            })
            .collect();

        let depth_stencil = depth_stencil_attachment_point.map(|point| {
            let texture = TextureRes::new(storage, point.ty().pixel(), sampling);
            (point, self.textures.insert(texture))
        });

        self.render_targets.insert(RenderTargetsRes {
            storage,
            color,
            depth_stencil,
            swap_chain,
        })
    }

    /// Removes render targets and their attachment textures.
    pub fn remove_render_targets(&mut self, id: Id<RenderTargetsRes>) {
        if let Some(render_targets) = self.render_targets.remove(id) {
            for (_, texture) in render_targets.color {
                self.textures.remove(texture);
            }

            if let Some((_, texture)) = render_targets.depth_stencil {
                self.textures.remove(texture);
            }
        }
    }

    /// Fails if `clear` could not run, without touching any texel.
    pub fn check_clear(&self, clear: &Clear) -> Result<(), HeadlessError> {
        let render_targets = get(&self.render_targets, clear.render_targets)?;

        if let Some(value) = clear.color {
            for (_, id) in &render_targets.color {
                encode_color(value, get(&self.textures, *id)?.pixel)?;
            }
        }

        if clear.depth.is_some() || clear.stencil.is_some() {
            if let Some(id) = render_targets.depth_stencil_texture() {
                depth_stencil_layout(get(&self.textures, id)?.pixel)?;
            }
        }

        Ok(())
    }

    /// Runs a clear recorded at render targets binding time.
    pub fn clear(&mut self, clear: &Clear) -> Result<(), HeadlessError> {
        let render_targets = get(&self.render_targets, clear.render_targets)?;
        let color: SmallVec<[Id<TextureRes>; 4]> =
            render_targets.color.iter().map(|(_, id)| *id).collect();
        let depth_stencil = render_targets.depth_stencil_texture();

        if let Some(value) = clear.color {
            for id in color {
                get_mut(&mut self.textures, id)?.clear_color(value)?;
            }
        }

        if clear.depth.is_some() || clear.stencil.is_some() {
            if let Some(id) = depth_stencil {
                get_mut(&mut self.textures, id)?.clear_depth_stencil(clear.depth, clear.stencil)?;
            }
        }

        Ok(())
    }
}
