use piksels_backend::{
    blending::BlendingMode,
    color::RGBA32F,
    depth_stencil::{DepthTest, DepthWrite, StencilTest},
    face_culling::FaceCulling,
    scissor::Scissor,
    viewport::Viewport,
};

bitflags::bitflags! {
    /// Buffers cleared when render targets get bound.
    pub struct ClearBuffers: u8 {
        const COLOR = 0x1;
        const DEPTH = 0x2;
        const STENCIL = 0x4;
    }
}

impl Default for ClearBuffers {
    fn default() -> Self {
        ClearBuffers::empty()
    }
}

/// A recorded command. Resources are referred to by their scarce index.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Blending(BlendingMode),
    DepthTest(DepthTest),
    DepthWrite(DepthWrite),
    StencilTest(StencilTest),
    FaceCulling(FaceCulling),
    Viewport(Viewport),
    Scissor(Scissor),
    ClearColor(Option<RGBA32F>),
    ClearDepth(Option<f32>),
    ClearStencil(Option<i32>),
    Srgb(bool),
    SetUniform {
        name: String,
        value: Vec<u8>,
    },
    BindTexture {
        texture: u64,
        unit: u32,
    },
    AssociateTextureUnit {
        unit: u32,
        binding_point: String,
    },
    BindUniformBuffer {
        uniform_buffer: u64,
        unit: u32,
    },
    AssociateUniformBufferUnit {
        unit: u32,
        binding_point: String,
    },
    BindRenderTargets {
        render_targets: u64,
        clear: ClearBuffers,
    },
    BindShader {
        shader: u64,
    },
    Draw {
        vertex_array: u64,
        start: usize,
        count: usize,
        instances: usize,
    },
}

/// A finished command buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub commands: Vec<Command>,
}

impl Submission {
    /// The draw commands, in submission order.
    pub fn draws(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::Draw { .. }))
    }
}

/// Swap chain render targets, as they were when presented.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Presentation {
    pub swap_chain: u64,

    /// Counts presentations of the swap chain, from 0.
    pub frame: u64,

    /// Base level of the color attachment at presentation time.
    pub texels: Vec<u8>,
}
