use bytemuck::Pod;
use geometry::Region;
use piksels_backend::{
    pixel::Pixel,
    texture::{Rect, Sampling, Size, Storage},
    Backend, Error,
};

#[derive(Debug)]
pub struct Texture<B>
where
    B: Backend,
{
    raw: B::Texture,
    storage: Storage,
    pixel: Pixel,
    sampling: Sampling,
}

impl<B> Drop for Texture<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_texture(&self.raw);
    }
}

impl<B> Texture<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(
        raw: B::Texture,
        storage: Storage,
        pixel: Pixel,
        sampling: Sampling,
    ) -> Self {
        Self {
            raw,
            storage,
            pixel,
            sampling,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &B::Texture {
        &self.raw
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    #[must_use]
    pub fn pixel(&self) -> Pixel {
        self.pixel
    }

    #[must_use]
    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Resizes the texture, keeping its kind, layers and samples. Texels are
    /// lost.
    ///
    /// ## Errors
    ///
    /// [`Error::IncompatibleSize`] if the size does not have the dimensionality
    /// of the texture.
    pub fn resize(&mut self, size: Size) -> Result<(), B::Err> {
        let storage = self.storage.resized(size).ok_or(Error::IncompatibleSize)?;

        B::resize_texture(&self.raw, size)?;
        self.storage = storage;

        log::debug!("resized texture to {storage:?}");
        Ok(())
    }

    /// Uploads texels into `rect` of the mipmap `level`. If `mipmaps` is set,
    /// the levels below are regenerated from it.
    ///
    /// ## Errors
    ///
    /// - [`Error::RegionOutOfBounds`] if the level does not exist or `rect`
    ///   does not fit in it.
    /// - [`Error::TexelsSizeMismatch`] if `texels` does not hold exactly one
    ///   pixel per texel of `rect`.
    pub fn set(&self, rect: Rect, mipmaps: bool, level: usize, texels: &[u8]) -> Result<(), B::Err> {
        self.check_rect(rect, level)?;

        let expected = usize::try_from(rect.texel_count())
            .ok()
            .and_then(|count| count.checked_mul(self.pixel.format.bytes()))
            .unwrap_or(usize::MAX);

        if texels.len() != expected {
            return Err(Error::TexelsSizeMismatch {
                expected,
                found: texels.len(),
            }
            .into());
        }

        B::set_texels(&self.raw, rect, mipmaps, level, texels)
    }

    /// Same as [`Texture::set`], with typed texels.
    ///
    /// ## Errors
    ///
    /// See [`Texture::set`].
    pub fn set_texels<T>(
        &self,
        rect: Rect,
        mipmaps: bool,
        level: usize,
        texels: &[T],
    ) -> Result<(), B::Err>
    where
        T: Pod,
    {
        self.set(rect, mipmaps, level, bytemuck::cast_slice(texels))
    }

    /// Fills `rect` of the base level with a single pixel.
    ///
    /// ## Errors
    ///
    /// - [`Error::RegionOutOfBounds`] if `rect` does not fit in the base
    ///   level.
    /// - [`Error::TexelsSizeMismatch`] if `value` is not exactly one pixel.
    pub fn clear(&self, rect: Rect, mipmaps: bool, value: &[u8]) -> Result<(), B::Err> {
        self.check_rect(rect, 0)?;

        let expected = self.pixel.format.bytes();
        if value.len() != expected {
            return Err(Error::TexelsSizeMismatch {
                expected,
                found: value.len(),
            }
            .into());
        }

        B::clear_texels(&self.raw, rect, mipmaps, value)
    }

    fn check_rect(&self, rect: Rect, level: usize) -> Result<(), Error> {
        let level_extent = self
            .storage
            .level_extent(level)
            .ok_or(Error::RegionOutOfBounds)?;
        let region = rect.region().ok_or(Error::RegionOutOfBounds)?;

        if Region::whole(level_extent).contains_region(&region) {
            Ok(())
        } else {
            Err(Error::RegionOutOfBounds)
        }
    }
}
