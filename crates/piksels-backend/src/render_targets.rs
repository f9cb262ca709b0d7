use crate::pixel::{ChannelBits, Format, Pixel, Type};

/// A color attachment point, as declared by shaders writing into it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ColorAttachmentPoint {
    index: usize,
    name: &'static str,
    ty: ColorType,
}

mk_bckd_type_getters!(
    ColorAttachmentPoint,
    index -> usize,
    name -> &'static str,
    ty -> ColorType,
);

impl ColorAttachmentPoint {
    #[must_use]
    pub fn new(index: usize, name: &'static str, ty: ColorType) -> Self {
        Self { index, name, ty }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DepthStencilAttachmentPoint {
    index: usize,
    name: &'static str,
    ty: DepthStencilType,
}

mk_bckd_type_getters!(
    DepthStencilAttachmentPoint,
    index -> usize,
    name -> &'static str,
    ty -> DepthStencilType,
);

impl DepthStencilAttachmentPoint {
    #[must_use]
    pub fn new(index: usize, name: &'static str, ty: DepthStencilType) -> Self {
        Self { index, name, ty }
    }
}

/// Color attachment type. `I*` variants are signed, `Uint*` unsigned. `S*`
/// variants are in the sRGB color space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColorType {
    IR {
        red_bits: ChannelBits,
    },
    IRG {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
    },
    IRGB {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
    },
    ISRGB {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
    },
    IRGBA {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
        alpha_bits: ChannelBits,
    },
    ISRGBA {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
        alpha_bits: ChannelBits,
    },
    UintR {
        red_bits: ChannelBits,
    },
    UintRG {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
    },
    UintRGB {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
    },
    UintSRGB {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
    },
    UintRGBA {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
        alpha_bits: ChannelBits,
    },
    UintSRGBA {
        red_bits: ChannelBits,
        green_bits: ChannelBits,
        blue_bits: ChannelBits,
        alpha_bits: ChannelBits,
    },
}

impl ColorType {
    /// 8-bit unsigned RGBA, the usual backbuffer format.
    pub const RGBA8: Self = ColorType::UintRGBA {
        red_bits: ChannelBits::Eight,
        green_bits: ChannelBits::Eight,
        blue_bits: ChannelBits::Eight,
        alpha_bits: ChannelBits::Eight,
    };

    /// The pixel stored by an attachment of this type.
    #[must_use]
    pub fn pixel(self) -> Pixel {
        use ColorType::*;

        let (encoding, format) = match self {
            IR { red_bits } => (Type::Integral, Format::R(red_bits)),
            UintR { red_bits } => (Type::Unsigned, Format::R(red_bits)),
            IRG {
                red_bits,
                green_bits,
            } => (Type::Integral, Format::RG(red_bits, green_bits)),
            UintRG {
                red_bits,
                green_bits,
            } => (Type::Unsigned, Format::RG(red_bits, green_bits)),
            IRGB {
                red_bits,
                green_bits,
                blue_bits,
            } => (Type::Integral, Format::RGB(red_bits, green_bits, blue_bits)),
            UintRGB {
                red_bits,
                green_bits,
                blue_bits,
            } => (Type::Unsigned, Format::RGB(red_bits, green_bits, blue_bits)),
            ISRGB {
                red_bits,
                green_bits,
                blue_bits,
            } => (Type::Integral, Format::SRGB(red_bits, green_bits, blue_bits)),
            UintSRGB {
                red_bits,
                green_bits,
                blue_bits,
            } => (Type::Unsigned, Format::SRGB(red_bits, green_bits, blue_bits)),
            IRGBA {
                red_bits,
                green_bits,
                blue_bits,
                alpha_bits,
            } => (
                Type::Integral,
                Format::RGBA(red_bits, green_bits, blue_bits, alpha_bits),
            ),
            UintRGBA {
                red_bits,
                green_bits,
                blue_bits,
                alpha_bits,
            } => (
                Type::Unsigned,
                Format::RGBA(red_bits, green_bits, blue_bits, alpha_bits),
            ),
            ISRGBA {
                red_bits,
                green_bits,
                blue_bits,
                alpha_bits,
            } => (
                Type::Integral,
                Format::SRGBA(red_bits, green_bits, blue_bits, alpha_bits),
            ),
            UintSRGBA {
                red_bits,
                green_bits,
                blue_bits,
                alpha_bits,
            } => (
                Type::Unsigned,
                Format::SRGBA(red_bits, green_bits, blue_bits, alpha_bits),
            ),
        };

        Pixel::new(encoding, format)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DepthStencilType {
    Depth {
        depth_bits: ChannelBits,
    },
    DepthStencil {
        depth_bits: ChannelBits,
        stencil_bits: ChannelBits,
    },
}

impl DepthStencilType {
    #[must_use]
    pub fn pixel(self) -> Pixel {
        match self {
            DepthStencilType::Depth { depth_bits } => {
                Pixel::new(Type::Floating, Format::Depth(depth_bits))
            }
            DepthStencilType::DepthStencil {
                depth_bits,
                stencil_bits,
            } => Pixel::new(
                Type::Floating,
                Format::DepthStencil(depth_bits, stencil_bits),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_pixels() {
        let p = ColorType::RGBA8.pixel();
        assert_eq!(p.encoding, Type::Unsigned);
        assert_eq!(p.format.bytes(), 4);

        let ds = DepthStencilType::DepthStencil {
            depth_bits: ChannelBits::ThirtyTwo,
            stencil_bits: ChannelBits::Eight,
        };
        assert!(ds.pixel().is_depth_pixel());

        let point = ColorAttachmentPoint::new(2, "color", ColorType::RGBA8);
        assert_eq!(point.index(), 2);
        assert_eq!(point.name(), "color");
    }
}
