//! In-memory texel storage.

use geometry::{texel_count, Extent, Region};
use piksels_backend::{pixel::Pixel, texture::Rect, texture::Storage, Error};

/// Texels of a whole mipmap chain, one tightly packed buffer per level. Texels
/// of a level are laid out x first, then y, then z (layers and cubemap faces).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Texels {
    storage: Storage,
    pixel_size: usize,
    levels: Vec<Vec<u8>>,
}

impl Texels {
    /// Zeroed texels.
    pub fn new(storage: Storage, pixel: Pixel) -> Self {
        let pixel_size = pixel.format.bytes();
        let levels = (0..storage.mipmap_levels())
            .filter_map(|level| storage.level_extent(level))
            .map(|extent| vec![0; texel_count(extent) as usize * pixel_size])
            .collect();

        Self {
            storage,
            pixel_size,
            levels,
        }
    }

    pub fn storage(&self) -> Storage {
        self.storage
    }

    pub fn level(&self, level: usize) -> Option<&[u8]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn region(&self, rect: Rect, level: usize) -> Result<(Region, Extent), Error> {
        let extent = self
            .storage
            .level_extent(level)
            .ok_or(Error::RegionOutOfBounds)?;
        let region = rect.region().ok_or(Error::RegionOutOfBounds)?;

        if Region::whole(extent).contains_region(&region) {
            Ok((region, extent))
        } else {
            Err(Error::RegionOutOfBounds)
        }
    }

    /// Copies `texels` into `rect` of `level`.
    pub fn set(&mut self, rect: Rect, level: usize, texels: &[u8]) -> Result<(), Error> {
        let (region, extent) = self.region(rect, level)?;

        let expected = region.texel_count() as usize * self.pixel_size;
        if texels.len() != expected {
            return Err(Error::TexelsSizeMismatch {
                expected,
                found: texels.len(),
            });
        }

        if region.is_empty() || self.pixel_size == 0 {
            return Ok(());
        }

        let ps = self.pixel_size;
        let row_len = region.extent().width as usize * ps;
        let dst = &mut self.levels[level];

        for (row, src) in region.rows(extent).zip(texels.chunks_exact(row_len)) {
            dst[row.start * ps..row.end * ps].copy_from_slice(src);
        }

        Ok(())
    }

    /// Fills `rect` of the base level with `value`, a single pixel.
    pub fn clear(&mut self, rect: Rect, value: &[u8]) -> Result<(), Error> {
        let (region, extent) = self.region(rect, 0)?;

        if value.len() != self.pixel_size {
            return Err(Error::TexelsSizeMismatch {
                expected: self.pixel_size,
                found: value.len(),
            });
        }

        if self.pixel_size == 0 {
            return Ok(());
        }

        let ps = self.pixel_size;
        let dst = &mut self.levels[0];

        for row in region.rows(extent) {
            for texel in dst[row.start * ps..row.end * ps].chunks_exact_mut(ps) {
                texel.copy_from_slice(value);
            }
        }

        Ok(())
    }

    /// Calls `f` on every texel of `level`.
    pub fn for_each_texel_mut(&mut self, level: usize, mut f: impl FnMut(&mut [u8])) {
        if self.pixel_size == 0 {
            return;
        }

        if let Some(texels) = self.levels.get_mut(level) {
            texels.chunks_exact_mut(self.pixel_size).for_each(&mut f);
        }
    }

    /// Rebuilds every level below `from` by nearest downsampling of the level
    /// above it.
    pub fn regenerate_mipmaps(&mut self, from: usize) {
        let ps = self.pixel_size;

        for level in from + 1..self.levels.len() {
            let (Some(src_extent), Some(dst_extent)) = (
                self.storage.level_extent(level - 1),
                self.storage.level_extent(level),
            ) else {
                return;
            };

            let (above, below) = self.levels.split_at_mut(level);
            let src = &above[level - 1];
            let dst = &mut below[0];

            let scale = |x: u32, src: u32, dst: u32| (u64::from(x) * u64::from(src) / u64::from(dst)) as usize;
            let mut i = 0;

            for z in 0..dst_extent.depth {
                let sz = scale(z, src_extent.depth, dst_extent.depth);

                for y in 0..dst_extent.height {
                    let sy = scale(y, src_extent.height, dst_extent.height);

                    for x in 0..dst_extent.width {
                        let sx = scale(x, src_extent.width, dst_extent.width);
                        let s = ((sz * src_extent.height as usize + sy) * src_extent.width as usize
                            + sx)
                            * ps;

                        dst[i..i + ps].copy_from_slice(&src[s..s + ps]);
                        i += ps;
                    }
                }
            }
        }
    }
}
