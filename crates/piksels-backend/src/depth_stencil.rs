/// Comparison performed by depth and stencil tests. `a` is the incoming
/// fragment value and `b` the stored one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Comparison {
    Never,
    Always,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    /// Whether the test passes for the incoming value `a` against the stored
    /// value `b`.
    #[must_use]
    pub fn compare<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Comparison::Never => false,
            Comparison::Always => true,
            Comparison::Equal => a == b,
            Comparison::NotEqual => a != b,
            Comparison::Less => a < b,
            Comparison::LessOrEqual => a <= b,
            Comparison::Greater => a > b,
            Comparison::GreaterOrEqual => a >= b,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DepthTest {
    /// Fragments always pass, whatever the order they are written in.
    #[default]
    Off,
    On(Comparison),
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DepthWrite {
    #[default]
    On,
    Off,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum StencilTest {
    #[default]
    Off,
    On(StencilFunc),
}

/// Stencil comparison along with the operations to run depending on the
/// outcome of the depth and stencil tests.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StencilFunc {
    comparison: Comparison,
    reference: u8,
    mask: u8,
    depth_passes_stencil_fails: StencilOp,
    depth_fails_stencil_passes: StencilOp,
    depth_stencil_pass: StencilOp,
}

mk_bckd_type_getters!(
    StencilFunc,
    comparison -> Comparison,
    reference -> u8,
    mask -> u8,
    depth_passes_stencil_fails -> StencilOp,
    depth_fails_stencil_passes -> StencilOp,
    depth_stencil_pass -> StencilOp,
);

impl StencilFunc {
    /// A stencil function that keeps the stored value in every case.
    #[must_use]
    pub fn new(comparison: Comparison, reference: u8, mask: u8) -> Self {
        Self {
            comparison,
            reference,
            mask,
            depth_passes_stencil_fails: StencilOp::Keep,
            depth_fails_stencil_passes: StencilOp::Keep,
            depth_stencil_pass: StencilOp::Keep,
        }
    }

    #[must_use]
    pub fn with_ops(
        mut self,
        depth_passes_stencil_fails: StencilOp,
        depth_fails_stencil_passes: StencilOp,
        depth_stencil_pass: StencilOp,
    ) -> Self {
        self.depth_passes_stencil_fails = depth_passes_stencil_fails;
        self.depth_fails_stencil_passes = depth_fails_stencil_passes;
        self.depth_stencil_pass = depth_stencil_pass;
        self
    }

    /// Whether a stored stencil value passes the test. Both the reference and
    /// the stored value are masked first.
    #[must_use]
    pub fn passes(&self, stored: u8) -> bool {
        self.comparison
            .compare(self.reference & self.mask, stored & self.mask)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    /// Clamps at the maximum value.
    Increment,
    IncrementWrap,
    /// Clamps at zero.
    Decrement,
    DecrementWrap,
    /// Bit-wise inversion.
    Invert,
}

impl StencilOp {
    /// The new stencil value after applying the operation to `value`.
    #[must_use]
    pub fn apply(self, value: u8, reference: u8) -> u8 {
        match self {
            StencilOp::Keep => value,
            StencilOp::Zero => 0,
            StencilOp::Replace => reference,
            StencilOp::Increment => value.saturating_add(1),
            StencilOp::IncrementWrap => value.wrapping_add(1),
            StencilOp::Decrement => value.saturating_sub(1),
            StencilOp::DecrementWrap => value.wrapping_sub(1),
            StencilOp::Invert => !value,
        }
    }
}
