/// A vertex attribute, as declared by the vertex shader consuming it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttr {
    pub index: usize,
    pub name: &'static str,
    pub ty: Type,
    pub array: Option<usize>,
}

impl VertexAttr {
    #[must_use]
    pub fn new(index: usize, name: &'static str, ty: Type) -> Self {
        Self {
            index,
            name,
            ty,
            array: None,
        }
    }

    #[must_use]
    pub fn array(mut self, len: usize) -> Self {
        self.array = Some(len);
        self
    }

    /// Size in bytes of one value of the attribute.
    #[must_use]
    pub fn size(&self) -> usize {
        self.ty.size() * self.array.unwrap_or(1)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    Int(Normalized),
    Int2(Normalized),
    Int3(Normalized),
    Int4(Normalized),
    Uint(Normalized),
    Uint2(Normalized),
    Uint3(Normalized),
    Uint4(Normalized),
    Float,
    Float2,
    Float3,
    Float4,
    Double,
    Double2,
    Double3,
    Double4,
    Bool,
    Bool2,
    Bool3,
    Bool4,
}

impl Type {
    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        let scalar = match self {
            Self::Double | Self::Double2 | Self::Double3 | Self::Double4 => 8,
            _ => 4,
        };

        scalar * self.vector_dim()
    }

    /// Number of components. Scalars have one.
    #[must_use]
    pub fn vector_dim(&self) -> usize {
        match self {
            Self::Int2(_) | Self::Uint2(_) | Self::Float2 | Self::Double2 | Self::Bool2 => 2,
            Self::Int3(_) | Self::Uint3(_) | Self::Float3 | Self::Double3 | Self::Bool3 => 3,
            Self::Int4(_) | Self::Uint4(_) | Self::Float4 | Self::Double4 | Self::Bool4 => 4,
            _ => 1,
        }
    }

    /// The normalized version of an integral type. Other types are returned
    /// as-is.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Int(_) => Self::Int(Normalized::Yes),
            Self::Int2(_) => Self::Int2(Normalized::Yes),
            Self::Int3(_) => Self::Int3(Normalized::Yes),
            Self::Int4(_) => Self::Int4(Normalized::Yes),
            Self::Uint(_) => Self::Uint(Normalized::Yes),
            Self::Uint2(_) => Self::Uint2(Normalized::Yes),
            Self::Uint3(_) => Self::Uint3(Normalized::Yes),
            Self::Uint4(_) => Self::Uint4(Normalized::Yes),
            _ => self,
        }
    }
}

/// Whether integral values are exposed to shaders as floating-point values in
/// `[0, 1]` (`[-1, 1]` when signed).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Normalized {
    Yes,
    #[default]
    No,
}
