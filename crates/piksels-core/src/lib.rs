//! Typed API over piksels backends.
//!
//! [`Device`] is the entry point: it wraps a [`Backend`](piksels_backend::Backend),
//! validates everything handed to it and returns resources that release
//! themselves when dropped. Commands are recorded through [`layers`].

pub mod cmd_buf;
pub mod device;
pub mod layers;
pub mod pipeline;
pub mod render_targets;
pub mod shader;
pub mod swap_chain;
pub mod texture;
pub mod uniform;
pub mod units;
pub mod vertex_array;

pub use device::Device;
pub use layers::Layer;
