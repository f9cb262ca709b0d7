//! piksels, a low-level and strongly typed graphics API.
//!
//! Start from a [`Device`] built over a [`Backend`]. Resources are created
//! from the device and release themselves when dropped. Commands are recorded
//! through [`Layer`]s, whose type tracks what is bound:
//!
//! ```ignore
//! device
//!     .new_layers()?
//!     .clear_color(Some(RGBA32F::BLACK))?
//!     .render_targets(&render_targets)?
//!     .shader(&shader)?
//!     .uniform(&time, &1.5f32)?
//!     .draw(&vertex_array)?
//!     .done()
//!     .done()
//!     .finish()?;
//! ```
//!
//! With the `headless` feature, the CPU-side reference backend is available
//! as [`headless`].

pub use piksels_backend as backend;
pub use piksels_backend::{
    blending, color, depth_stencil, face_culling, pixel, primitive, scissor, vertex, viewport,
    Backend, BackendInfo, Error,
};
pub use piksels_core::*;

#[cfg(feature = "headless")]
pub use piksels_backend_headless as headless;

/// Backend vocabulary the core API takes as input.
pub mod vocabulary {
    pub use piksels_backend::{
        extension::{
            logger::{LogFacade, LogLevel, Logger, LoggerExt},
            ExtensionsBuilder,
        },
        render_targets::{ColorAttachmentPoint, ColorType, DepthStencilAttachmentPoint, DepthStencilType},
        shader::{ShaderSources, UniformType, UniformTypeBase},
        swap_chain::SwapChainMode,
        texture::{Offset, Rect, Sampling, Size, Storage},
        vertex_array::{MemoryLayout, VertexArrayData, VertexArrayUpdate},
    };
}
