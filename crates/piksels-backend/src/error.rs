use thiserror::Error;

use crate::shader::UniformType;

/// Failures shared by every backend.
///
/// Backends wrap these in their own error type, which must implement
/// `From<Error>`.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum Error {
    #[error("no more units available on device")]
    NoMoreUnits,

    #[error("extension check failed: {reason}")]
    ExtensionCheck { reason: String },

    #[error("expected {expected} bytes of texels, found {found}")]
    TexelsSizeMismatch { expected: usize, found: usize },

    #[error("region is out of the texture bounds")]
    RegionOutOfBounds,

    #[error("size does not match the texture dimensionality")]
    IncompatibleSize,

    #[error("uniform type mismatch: expected {expected}, found {found}")]
    UniformTypeMismatch {
        expected: UniformType,
        found: UniformType,
    },

    #[error("uniform does not belong to the bound shader")]
    ForeignUniform,

    #[error("invalid vertex data: {reason}")]
    InvalidVertexData { reason: String },

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("view of {count} elements at {start} exceeds the {len} drawable elements")]
    InvalidView {
        start: usize,
        count: usize,
        len: usize,
    },

    #[error("update of {count} elements at {start} exceeds the {len} elements")]
    UpdateOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },

    #[error("color attachment index {0} is used more than once")]
    DuplicateAttachmentIndex(usize),
}
