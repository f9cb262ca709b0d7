/// Blending equation. States how factors and pixel data are combined.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Equation {
    /// `blended = src * srcK + dst * dstK`
    Additive,

    /// `blended = src * srcK - dst * dstK`
    Subtract,

    /// `blended = dst * dstK - src * srcK`
    ReverseSubtract,

    /// `blended = min(src, dst)`
    Min,

    /// `blended = max(src, dst)`
    Max,
}

/// Blending factors. Pixel data are multiplied by these before the equation
/// is applied.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Factor {
    /// `1 * color`
    One,

    /// `0 * color`
    Zero,

    /// `src * color`
    SrcColor,

    /// `(1 - src) * color`
    SrcColorComplement,

    /// `dst * color`
    DestColor,

    /// `(1 - dst) * color`
    DestColorComplement,

    /// `srcA * color`
    SrcAlpha,

    /// `(1 - srcA) * color`
    SrcAlphaComplement,

    /// `dstA * color`
    DstAlpha,

    /// `(1 - dstA) * color`
    DstAlphaComplement,

    /// `min(srcA, 1 - dstA)` for colors, `1` for alpha.
    SrcAlphaSaturate,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Blending {
    pub equation: Equation,
    pub src: Factor,
    pub dst: Factor,
}

impl Blending {
    #[must_use]
    pub fn new(equation: Equation, src: Factor, dst: Factor) -> Self {
        Self { equation, src, dst }
    }
}

/// Blending configuration, either for all of RGBA at once or for RGB and
/// alpha separately.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum BlendingMode {
    #[default]
    Off,
    Combined(Blending),
    Separate { rgb: Blending, alpha: Blending },
}
