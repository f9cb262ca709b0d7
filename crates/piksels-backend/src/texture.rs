//! Texture storages, sampling and addressing.
//!
//! Every storage maps onto a three dimensional texel grid (see
//! [`Storage::extent`]). The third axis is the depth of 3D textures, the face
//! of cubemaps, the layer of layered textures, and `6 * layer + face` for
//! layered cubemaps. Layered storages are addressed with three dimensional
//! [`Rect`]s.

use geometry::{Extent, Point, Region};

use crate::depth_stencil::Comparison;

/// How texture coordinates outside of `[0, 1]` are wrapped.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
    Nearest,
    Linear,
}

/// How a texture is sampled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampling {
    pub wrap_r: Wrap,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,

    /// Depth comparison for depth textures.
    pub depth_comparison: Option<Comparison>,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            wrap_r: Wrap::ClampToEdge,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
            min_filter: MinFilter::Linear,
            mag_filter: MagFilter::Linear,
            depth_comparison: None,
        }
    }
}

/// Texture storage.
///
/// Flat textures hold a single image per mipmap level. Layered textures hold
/// an array of images per level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Storage {
    Flat1D {
        width: u32,
    },
    Flat2D {
        width: u32,
        height: u32,
    },
    Flat2DMultiSample {
        width: u32,
        height: u32,
        samples: u32,
    },
    Flat3D {
        width: u32,
        height: u32,
        depth: u32,
    },
    FlatCubemap {
        size: u32,
    },
    Layered1D {
        width: u32,
        layers: u32,
    },
    Layered2D {
        width: u32,
        height: u32,
        layers: u32,
    },
    Layered2DMultiSample {
        width: u32,
        height: u32,
        layers: u32,
        samples: u32,
    },
    LayeredCubemap {
        size: u32,
        layers: u32,
    },
}

impl Storage {
    /// The texel grid of the base level.
    #[must_use]
    pub fn extent(&self) -> Extent {
        match *self {
            Storage::Flat1D { width } => Extent::new(width, 1, 1),
            Storage::Flat2D { width, height } | Storage::Flat2DMultiSample { width, height, .. } => {
                Extent::new(width, height, 1)
            }
            Storage::Flat3D {
                width,
                height,
                depth,
            } => Extent::new(width, height, depth),
            Storage::FlatCubemap { size } => Extent::new(size, size, 6),
            Storage::Layered1D { width, layers } => Extent::new(width, 1, layers),
            Storage::Layered2D {
                width,
                height,
                layers,
            }
            | Storage::Layered2DMultiSample {
                width,
                height,
                layers,
                ..
            } => Extent::new(width, height, layers),
            Storage::LayeredCubemap { size, layers } => {
                Extent::new(size, size, layers.saturating_mul(6))
            }
        }
    }

    /// The dimensions of the base level, without layers or faces.
    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Storage::Flat1D { width } | Storage::Layered1D { width, .. } => Size::Dim1 { width },
            Storage::Flat2D { width, height }
            | Storage::Flat2DMultiSample { width, height, .. }
            | Storage::Layered2D { width, height, .. }
            | Storage::Layered2DMultiSample { width, height, .. } => Size::Dim2 { width, height },
            Storage::Flat3D {
                width,
                height,
                depth,
            } => Size::Dim3 {
                width,
                height,
                depth,
            },
            Storage::FlatCubemap { size } | Storage::LayeredCubemap { size, .. } => {
                Size::Cubemap { size }
            }
        }
    }

    #[must_use]
    pub fn is_multisample(&self) -> bool {
        matches!(
            self,
            Storage::Flat2DMultiSample { .. } | Storage::Layered2DMultiSample { .. }
        )
    }

    /// Which axes of [`Storage::extent`] shrink along the mipmap chain.
    fn mip_axes(&self) -> (bool, bool, bool) {
        match self {
            Storage::Flat1D { .. } | Storage::Layered1D { .. } => (true, false, false),
            Storage::Flat3D { .. } => (true, true, true),
            Storage::Flat2DMultiSample { .. } | Storage::Layered2DMultiSample { .. } => {
                (false, false, false)
            }
            _ => (true, true, false),
        }
    }

    /// Length of the full mipmap chain, base level included.
    #[must_use]
    pub fn mipmap_levels(&self) -> usize {
        let extent = self.extent();
        let (x, y, z) = self.mip_axes();

        let largest = [(x, extent.width), (y, extent.height), (z, extent.depth)]
            .into_iter()
            .filter_map(|(mips, dim)| mips.then_some(dim))
            .max()
            .unwrap_or(0);

        // 1 + floor(log2(largest))
        ((u32::BITS - largest.leading_zeros()) as usize).max(1)
    }

    /// The texel grid of a mipmap level.
    ///
    /// ## Returns
    ///
    /// `None` if the level is past the end of the mipmap chain.
    #[must_use]
    pub fn level_extent(&self, level: usize) -> Option<Extent> {
        if level >= self.mipmap_levels() {
            return None;
        }

        let extent = self.extent();
        let (x, y, z) = self.mip_axes();
        let shrink = |mips: bool, dim: u32| {
            if mips && dim > 0 {
                (dim >> level).max(1)
            } else {
                dim
            }
        };

        Some(Extent::new(
            shrink(x, extent.width),
            shrink(y, extent.height),
            shrink(z, extent.depth),
        ))
    }

    /// The same kind of storage with a different size. Layer and sample
    /// counts are kept.
    ///
    /// ## Returns
    ///
    /// `None` if the size does not have the dimensionality of the storage.
    #[must_use]
    pub fn resized(&self, size: Size) -> Option<Self> {
        let storage = match (*self, size) {
            (Storage::Flat1D { .. }, Size::Dim1 { width }) => Storage::Flat1D { width },
            (Storage::Flat2D { .. }, Size::Dim2 { width, height }) => {
                Storage::Flat2D { width, height }
            }
            (Storage::Flat2DMultiSample { samples, .. }, Size::Dim2 { width, height }) => {
                Storage::Flat2DMultiSample {
                    width,
                    height,
                    samples,
                }
            }
            (
                Storage::Flat3D { .. },
                Size::Dim3 {
                    width,
                    height,
                    depth,
                },
            ) => Storage::Flat3D {
                width,
                height,
                depth,
            },
            (Storage::FlatCubemap { .. }, Size::Cubemap { size }) => Storage::FlatCubemap { size },
            (Storage::Layered1D { layers, .. }, Size::Dim1 { width }) => {
                Storage::Layered1D { width, layers }
            }
            (Storage::Layered2D { layers, .. }, Size::Dim2 { width, height }) => {
                Storage::Layered2D {
                    width,
                    height,
                    layers,
                }
            }
            (
                Storage::Layered2DMultiSample {
                    layers, samples, ..
                },
                Size::Dim2 { width, height },
            ) => Storage::Layered2DMultiSample {
                width,
                height,
                layers,
                samples,
            },
            (Storage::LayeredCubemap { layers, .. }, Size::Cubemap { size }) => {
                Storage::LayeredCubemap { size, layers }
            }
            _ => return None,
        };

        Some(storage)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Position of the face along the third texel axis.
    #[must_use]
    pub fn index(self) -> u32 {
        match self {
            CubeFace::PosX => 0,
            CubeFace::NegX => 1,
            CubeFace::PosY => 2,
            CubeFace::NegY => 3,
            CubeFace::PosZ => 4,
            CubeFace::NegZ => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Size {
    Dim1 { width: u32 },
    Dim2 { width: u32, height: u32 },
    Dim3 { width: u32, height: u32, depth: u32 },
    /// A single square face.
    Cubemap { size: u32 },
}

impl Size {
    #[must_use]
    pub fn extent(&self) -> Extent {
        match *self {
            Size::Dim1 { width } => Extent::new(width, 1, 1),
            Size::Dim2 { width, height } => Extent::new(width, height, 1),
            Size::Dim3 {
                width,
                height,
                depth,
            } => Extent::new(width, height, depth),
            Size::Cubemap { size } => Extent::new(size, size, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Offset {
    Dim1 { x: u32 },
    Dim2 { x: u32, y: u32 },
    Dim3 { x: u32, y: u32, z: u32 },
    Cubemap { x: u32, y: u32, face: CubeFace },
}

impl Offset {
    #[must_use]
    pub fn point(&self) -> Point {
        match *self {
            Offset::Dim1 { x } => Point::new(x, 0, 0),
            Offset::Dim2 { x, y } => Point::new(x, y, 0),
            Offset::Dim3 { x, y, z } => Point::new(x, y, z),
            Offset::Cubemap { x, y, face } => Point::new(x, y, face.index()),
        }
    }
}

/// A box of texels in a mipmap level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Rect {
    offset: Offset,
    size: Size,
}

mk_bckd_type_getters!(Rect, offset -> Offset, size -> Size);

impl Rect {
    #[must_use]
    pub fn new(offset: Offset, size: Size) -> Self {
        Self { offset, size }
    }

    /// The rect covering a whole level of the given storage.
    #[must_use]
    pub fn whole(storage: &Storage, level: usize) -> Option<Self> {
        let extent = storage.level_extent(level)?;

        Some(Self::new(
            Offset::Dim3 { x: 0, y: 0, z: 0 },
            Size::Dim3 {
                width: extent.width,
                height: extent.height,
                depth: extent.depth,
            },
        ))
    }

    /// The texel region covered by the rect, or `None` if it overflows the
    /// addressable range.
    #[must_use]
    pub fn region(&self) -> Option<Region> {
        Region::new(self.offset.point(), self.size.extent())
    }

    #[must_use]
    pub fn texel_count(&self) -> u64 {
        geometry::texel_count(self.size.extent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extents() {
        assert_eq!(
            Storage::FlatCubemap { size: 8 }.extent(),
            Extent::new(8, 8, 6)
        );
        assert_eq!(
            Storage::LayeredCubemap { size: 8, layers: 2 }.extent(),
            Extent::new(8, 8, 12)
        );
        assert_eq!(
            Storage::Layered1D {
                width: 16,
                layers: 3
            }
            .extent(),
            Extent::new(16, 1, 3)
        );
    }

    #[test]
    fn mipmap_chain() {
        let storage = Storage::Flat2D {
            width: 100,
            height: 20,
        };

        assert_eq!(storage.mipmap_levels(), 7);
        assert_eq!(storage.level_extent(1), Some(Extent::new(50, 10, 1)));
        assert_eq!(storage.level_extent(6), Some(Extent::new(1, 1, 1)));
        assert_eq!(storage.level_extent(7), None);

        let layered = Storage::Layered2D {
            width: 4,
            height: 4,
            layers: 5,
        };
        assert_eq!(layered.mipmap_levels(), 3);
        assert_eq!(layered.level_extent(2), Some(Extent::new(1, 1, 5)));

        let msaa = Storage::Flat2DMultiSample {
            width: 256,
            height: 256,
            samples: 4,
        };
        assert_eq!(msaa.mipmap_levels(), 1);
    }

    #[test]
    fn resize_keeps_kind() {
        let storage = Storage::Layered2DMultiSample {
            width: 4,
            height: 4,
            layers: 2,
            samples: 8,
        };

        assert_eq!(
            storage.resized(Size::Dim2 {
                width: 8,
                height: 2
            }),
            Some(Storage::Layered2DMultiSample {
                width: 8,
                height: 2,
                layers: 2,
                samples: 8,
            })
        );
        assert_eq!(storage.resized(Size::Dim1 { width: 8 }), None);
    }

    #[test]
    fn cubemap_rect() {
        let rect = Rect::new(
            Offset::Cubemap {
                x: 1,
                y: 2,
                face: CubeFace::NegY,
            },
            Size::Cubemap { size: 2 },
        );

        let region = rect.region().unwrap();
        assert_eq!(region.origin(), Point::new(1, 2, 3));
        assert_eq!(region.extent(), Extent::new(2, 2, 1));
        assert_eq!(rect.texel_count(), 4);
    }
}
