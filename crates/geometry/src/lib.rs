//! Texel-space geometry.
//!
//! Every texture storage, whatever its kind, is addressed as a three
//! dimensional grid of texels. The third axis is depth for 3D textures, the
//! layer for layered textures and the face for cubemaps.

use std::ops::Range;

pub use euclid::{Point3D, Size3D};

/// Unit tag for coordinates expressed in texels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexelSpace;

pub type Point = Point3D<u32, TexelSpace>;
pub type Extent = Size3D<u32, TexelSpace>;

/// Number of texels in a grid of the given extent.
#[must_use]
pub fn texel_count(extent: Extent) -> u64 {
    u64::from(extent.width) * u64::from(extent.height) * u64::from(extent.depth)
}

/// An axis-aligned box of texels. The upper bound is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region(euclid::Box3D<u32, TexelSpace>);

impl Region {
    /// Builds a region from its origin and extent.
    ///
    /// ## Returns
    ///
    /// `None` if the far corner of the region does not fit in a `u32`.
    #[must_use]
    pub fn new(origin: Point, extent: Extent) -> Option<Self> {
        let max = Point::new(
            origin.x.checked_add(extent.width)?,
            origin.y.checked_add(extent.height)?,
            origin.z.checked_add(extent.depth)?,
        );

        Some(Self(euclid::Box3D::new(origin, max)))
    }

    /// The region covering a whole grid.
    #[must_use]
    pub fn whole(extent: Extent) -> Self {
        Self(euclid::Box3D::new(
            Point::origin(),
            Point::new(extent.width, extent.height, extent.depth),
        ))
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.0.min
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(
            self.0.max.x - self.0.min.x,
            self.0.max.y - self.0.min.y,
            self.0.max.z - self.0.min.z,
        )
    }

    #[must_use]
    pub fn texel_count(&self) -> u64 {
        texel_count(self.extent())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texel_count() == 0
    }

    /// Whether `other` lies entirely inside this region. Empty regions are
    /// contained as long as their origin is.
    #[must_use]
    pub fn contains_region(&self, other: &Region) -> bool {
        let (a, b) = (&self.0, &other.0);

        a.min.x <= b.min.x
            && a.min.y <= b.min.y
            && a.min.z <= b.min.z
            && b.max.x <= a.max.x
            && b.max.y <= a.max.y
            && b.max.z <= a.max.z
    }

    #[must_use]
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        self.0.intersection(&other.0).map(Region)
    }

    /// Iterates over the rows of this region, as ranges of linear texel
    /// indices into a grid of the given extent.
    ///
    /// ## Panics
    ///
    /// Panics if the region does not fit in the grid.
    #[must_use]
    pub fn rows(&self, grid: Extent) -> RowIter {
        assert!(
            Region::whole(grid).contains_region(self),
            "region does not fit in the grid"
        );

        RowIter {
            grid,
            region: *self,
            y: self.0.min.y,
            z: self.0.min.z,
        }
    }
}

/// Rows of a [`Region`] in a texel grid.
pub struct RowIter {
    grid: Extent,
    region: Region,
    y: u32,
    z: u32,
}

impl Iterator for RowIter {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let min = self.region.0.min;
        let max = self.region.0.max;

        if min.x == max.x || self.y >= max.y || self.z >= max.z {
            return None;
        }

        let width = self.grid.width as usize;
        let height = self.grid.height as usize;
        let start = (self.z as usize * height + self.y as usize) * width + min.x as usize;
        let row = start..start + (max.x - min.x) as usize;

        self.y += 1;
        if self.y == max.y {
            self.y = min.y;
            self.z += 1;
        }

        Some(row)
    }
}
