/// Sources of the stages of a shader program. Stages left empty are absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderSources<'a> {
    tess_ctrl_stage: &'a str,
    tess_eval_stage: &'a str,
    vertex_stage: &'a str,
    geometry_stage: &'a str,
    fragment_stage: &'a str,
}

impl<'a> ShaderSources<'a> {
    #[must_use]
    pub fn tess_ctrl(mut self, tess_ctrl_stage: &'a str) -> Self {
        self.tess_ctrl_stage = tess_ctrl_stage;
        self
    }

    #[must_use]
    pub fn tess_eval(mut self, tess_eval_stage: &'a str) -> Self {
        self.tess_eval_stage = tess_eval_stage;
        self
    }

    #[must_use]
    pub fn vertex(mut self, vertex_stage: &'a str) -> Self {
        self.vertex_stage = vertex_stage;
        self
    }

    #[must_use]
    pub fn geometry(mut self, geometry_stage: &'a str) -> Self {
        self.geometry_stage = geometry_stage;
        self
    }

    #[must_use]
    pub fn fragment(mut self, fragment_stage: &'a str) -> Self {
        self.fragment_stage = fragment_stage;
        self
    }

    #[must_use]
    pub fn tess_ctrl_stage(&self) -> &'a str {
        self.tess_ctrl_stage
    }

    #[must_use]
    pub fn tess_eval_stage(&self) -> &'a str {
        self.tess_eval_stage
    }

    #[must_use]
    pub fn vertex_stage(&self) -> &'a str {
        self.vertex_stage
    }

    #[must_use]
    pub fn geometry_stage(&self) -> &'a str {
        self.geometry_stage
    }

    #[must_use]
    pub fn fragment_stage(&self) -> &'a str {
        self.fragment_stage
    }

    /// Every non-empty stage, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = &'a str> {
        [
            self.vertex_stage,
            self.tess_ctrl_stage,
            self.tess_eval_stage,
            self.geometry_stage,
            self.fragment_stage,
        ]
        .into_iter()
        .filter(|stage| !stage.is_empty())
    }
}

/// Type of a uniform, possibly an array.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UniformType {
    base: UniformTypeBase,
    array: Option<usize>,
}

impl From<UniformTypeBase> for UniformType {
    fn from(base: UniformTypeBase) -> Self {
        Self { base, array: None }
    }
}

impl std::fmt::Display for UniformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.array {
            Some(len) => write!(f, "{:?}[{len}]", self.base),
            None => write!(f, "{:?}", self.base),
        }
    }
}

impl UniformType {
    #[must_use]
    pub fn new(base: UniformTypeBase, array: impl Into<Option<usize>>) -> Self {
        Self {
            base,
            array: array.into(),
        }
    }

    #[must_use]
    pub fn array(mut self, len: usize) -> Self {
        self.array = Some(len);
        self
    }

    #[must_use]
    pub fn base(&self) -> UniformTypeBase {
        self.base
    }

    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        self.array
    }

    /// Size in bytes of a tightly packed value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.base.size() * self.array.unwrap_or(1)
    }
}

/// Uniform types. Matrices are named by columns then rows, so `FloatMat23` has
/// two columns of three rows.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UniformTypeBase {
    Int,
    Int2,
    Int3,
    Int4,
    Uint,
    Uint2,
    Uint3,
    Uint4,
    Bool,
    Bool2,
    Bool3,
    Bool4,
    Float,
    Float2,
    Float3,
    Float4,
    Double,
    Double2,
    Double3,
    Double4,
    FloatMat22,
    FloatMat23,
    FloatMat24,
    FloatMat32,
    FloatMat33,
    FloatMat34,
    FloatMat42,
    FloatMat43,
    FloatMat44,
    DoubleMat22,
    DoubleMat23,
    DoubleMat24,
    DoubleMat32,
    DoubleMat33,
    DoubleMat34,
    DoubleMat42,
    DoubleMat43,
    DoubleMat44,
}

impl UniformTypeBase {
    /// Size in bytes of a tightly packed value. Booleans take 4 bytes.
    #[must_use]
    pub fn size(self) -> usize {
        use UniformTypeBase::*;

        match self {
            Int | Uint | Bool | Float => 4,
            Int2 | Uint2 | Bool2 | Float2 => 8,
            Int3 | Uint3 | Bool3 | Float3 => 12,
            Int4 | Uint4 | Bool4 | Float4 => 16,
            Double => 8,
            Double2 => 16,
            Double3 => 24,
            Double4 => 32,
            FloatMat22 => 4 * 4,
            FloatMat23 | FloatMat32 => 4 * 6,
            FloatMat24 | FloatMat42 => 4 * 8,
            FloatMat33 => 4 * 9,
            FloatMat34 | FloatMat43 => 4 * 12,
            FloatMat44 => 4 * 16,
            DoubleMat22 => 8 * 4,
            DoubleMat23 | DoubleMat32 => 8 * 6,
            DoubleMat24 | DoubleMat42 => 8 * 8,
            DoubleMat33 => 8 * 9,
            DoubleMat34 | DoubleMat43 => 8 * 12,
            DoubleMat44 => 8 * 16,
        }
    }
}
