use piksels_backend::shader::UniformType;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HeadlessError {
    #[error(transparent)]
    Common(#[from] piksels_backend::Error),

    /// The handle outlived its resource.
    #[error("unknown {kind} resource")]
    UnknownResource { kind: &'static str },

    #[error("render targets have no {attachment}")]
    NoSuchAttachment { attachment: String },

    #[error("shader compilation failed: {reason}")]
    ShaderCompilation { reason: String },

    #[error("shader does not declare `{name}`")]
    UnknownUniform { name: String },

    #[error("`{name}` is declared as {declared}, requested as {requested}")]
    UniformTypeMismatch {
        name: String,
        declared: UniformType,
        requested: UniformType,
    },

    /// Presenting render targets that belong to another swap chain, or to no
    /// swap chain at all.
    #[error("render targets do not belong to the swap chain")]
    ForeignRenderTargets,

    #[error("not supported by the headless backend: {what}")]
    Unimplemented { what: String },
}
