/// Pixel encoding along with its channel layout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Pixel {
    pub encoding: Type,
    pub format: Format,
}

impl Pixel {
    pub const RGBA8_UNORM: Self = Self::new(
        Type::NormUnsigned,
        Format::RGBA(
            ChannelBits::Eight,
            ChannelBits::Eight,
            ChannelBits::Eight,
            ChannelBits::Eight,
        ),
    );

    pub const RGBA32F: Self = Self::new(
        Type::Floating,
        Format::RGBA(
            ChannelBits::ThirtyTwo,
            ChannelBits::ThirtyTwo,
            ChannelBits::ThirtyTwo,
            ChannelBits::ThirtyTwo,
        ),
    );

    pub const DEPTH32F: Self = Self::new(Type::Floating, Format::Depth(ChannelBits::ThirtyTwo));

    #[must_use]
    pub const fn new(encoding: Type, format: Format) -> Self {
        Self { encoding, format }
    }

    #[must_use]
    pub fn is_color_pixel(self) -> bool {
        !self.is_depth_pixel()
    }

    #[must_use]
    pub fn is_depth_pixel(self) -> bool {
        matches!(self.format, Format::Depth(_) | Format::DepthStencil(..))
    }

    #[must_use]
    pub fn channels_len(self) -> usize {
        match self.format {
            Format::R(_) | Format::Depth(_) => 1,
            Format::RG(..) | Format::DepthStencil(..) => 2,
            Format::RGB(..) | Format::SRGB(..) => 3,
            Format::RGBA(..) | Format::SRGBA(..) => 4,
        }
    }
}

/// Pixel encoding.
///
/// Normalized types are stored as integers but read as floating-point values
/// in `[0, 1]` (or `[-1, 1]` when signed) by shaders.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    NormIntegral,
    NormUnsigned,
    Integral,
    Unsigned,
    Floating,
}

/// Channel layout of a pixel. Each channel carries its width in bits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    R(ChannelBits),
    RG(ChannelBits, ChannelBits),
    RGB(ChannelBits, ChannelBits, ChannelBits),
    RGBA(ChannelBits, ChannelBits, ChannelBits, ChannelBits),
    SRGB(ChannelBits, ChannelBits, ChannelBits),
    SRGBA(ChannelBits, ChannelBits, ChannelBits, ChannelBits),
    Depth(ChannelBits),
    DepthStencil(ChannelBits, ChannelBits),
}

impl Format {
    /// Size of a pixel in bytes. Packed formats round down, so an
    /// `RGB(Eleven, Eleven, Ten)` pixel is 4 bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        let bits = match self {
            Format::R(r) | Format::Depth(r) => r.bits(),
            Format::RG(r, g) | Format::DepthStencil(r, g) => r.bits() + g.bits(),
            Format::RGB(r, g, b) | Format::SRGB(r, g, b) => r.bits() + g.bits() + b.bits(),
            Format::RGBA(r, g, b, a) | Format::SRGBA(r, g, b, a) => {
                r.bits() + g.bits() + b.bits() + a.bits()
            }
        };

        bits / 8
    }
}

/// Width of a pixel channel.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChannelBits {
    Eight,
    Ten,
    Eleven,
    Sixteen,
    ThirtyTwo,
}

impl ChannelBits {
    #[must_use]
    pub fn bits(self) -> usize {
        match self {
            ChannelBits::Eight => 8,
            ChannelBits::Ten => 10,
            ChannelBits::Eleven => 11,
            ChannelBits::Sixteen => 16,
            ChannelBits::ThirtyTwo => 32,
        }
    }
}
