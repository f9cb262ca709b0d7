use std::sync::Arc;

use structures::pool::Id;

use crate::{
    command::{Presentation, Submission},
    error::HeadlessError,
    state::{
        get, CmdBufRes, RenderTargetsRes, Shared, SwapChainRes, TextureRes, UniformBufferRes,
        VertexArrayRes,
    },
};

/// Number of live resources of each kind.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LiveCounts {
    pub vertex_arrays: usize,
    pub textures: usize,
    pub render_targets: usize,
    pub shaders: usize,
    pub uniform_buffers: usize,
    pub cmd_bufs: usize,
    pub swap_chains: usize,
}

/// Read-only access to what the backend holds and did.
///
/// Inspectors stay valid after the backend is dropped, along with whatever
/// resources are still alive.
#[derive(Clone)]
pub struct Inspector {
    shared: Arc<Shared>,
}

/// Runs a closure on a resource while the state is locked.
macro_rules! inspect {
    ($($(#[$attr:meta])* $name:ident: $pool:ident -> $ty:ty),+ $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name<R>(&self, id: Id<$ty>, f: impl FnOnce(&$ty) -> R) -> Result<R, HeadlessError> {
                let state = self.shared.state.lock();
                get(&state.$pool, id).map(f)
            }
        )+
    };
}

impl Inspector {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Every command buffer finished so far, oldest first.
    #[must_use]
    pub fn submissions(&self) -> Vec<Submission> {
        self.shared.state.lock().submissions.clone()
    }

    /// Every presentation so far, oldest first.
    #[must_use]
    pub fn presentations(&self) -> Vec<Presentation> {
        self.shared.state.lock().presentations.clone()
    }

    /// A copy of the texels of a mipmap level.
    ///
    /// ## Returns
    ///
    /// `None` if the level does not exist.
    pub fn texels(&self, texture: Id<TextureRes>, level: usize) -> Result<Option<Vec<u8>>, HeadlessError> {
        self.texture(texture, |texture| texture.level(level).map(<[u8]>::to_vec))
    }

    #[must_use]
    pub fn live(&self) -> LiveCounts {
        let state = self.shared.state.lock();

        LiveCounts {
            vertex_arrays: state.vertex_arrays.len(),
            textures: state.textures.len(),
            render_targets: state.render_targets.len(),
            shaders: state.shaders.len(),
            uniform_buffers: state.uniform_buffers.len(),
            cmd_bufs: state.cmd_bufs.len(),
            swap_chains: state.swap_chains.len(),
        }
    }

    inspect!(
        vertex_array: vertex_arrays -> VertexArrayRes,
        /// Also gives access to render target attachments, through
        /// [`RenderTargetsRes::color_textures`].
        texture: textures -> TextureRes,
        render_targets: render_targets -> RenderTargetsRes,
        uniform_buffer: uniform_buffers -> UniformBufferRes,
        swap_chain: swap_chains -> SwapChainRes,
        /// Commands recorded but not submitted yet are in
        /// [`CmdBufRes::commands`].
        cmd_buf: cmd_bufs -> CmdBufRes,
    );
}
