use piksels_backend::{shader::UniformType, Backend, Error, Scarce};

#[derive(Debug)]
pub struct Shader<B>
where
    B: Backend,
{
    raw: B::Shader,
}

impl<B> Drop for Shader<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_shader(&self.raw);
    }
}

impl<B> Shader<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(raw: B::Shader) -> Self {
        Self { raw }
    }

    #[must_use]
    pub fn raw(&self) -> &B::Shader {
        &self.raw
    }

    /// Looks up a uniform declared with type `ty`.
    pub fn uniform(&self, name: impl AsRef<str>, ty: impl Into<UniformType>) -> Result<Uniform<B>, B::Err> {
        let ty = ty.into();
        B::get_uniform(&self.raw, name.as_ref(), ty).map(|raw| Uniform {
            raw,
            ty,
            shader: self.raw.scarce_index(),
        })
    }

    pub fn texture_binding_point(
        &self,
        name: impl AsRef<str>,
    ) -> Result<ShaderTextureBindingPoint<B>, B::Err> {
        B::get_shader_texture_binding_point(&self.raw, name.as_ref())
            .map(|raw| ShaderTextureBindingPoint { raw })
    }

    pub fn uniform_buffer_binding_point(
        &self,
        name: impl AsRef<str>,
    ) -> Result<ShaderUniformBufferBindingPoint<B>, B::Err> {
        B::get_shader_uniform_buffer_binding_point(&self.raw, name.as_ref())
            .map(|raw| ShaderUniformBufferBindingPoint { raw })
    }
}

/// A uniform of a [`Shader`], along with its declared type.
#[derive(Debug)]
pub struct Uniform<B>
where
    B: Backend,
{
    raw: B::Uniform,
    ty: UniformType,
    shader: B::ScarceIndex,
}

impl<B> Uniform<B>
where
    B: Backend,
{
    #[must_use]
    pub fn raw(&self) -> &B::Uniform {
        &self.raw
    }

    #[must_use]
    pub fn ty(&self) -> UniformType {
        self.ty
    }

    /// Index of the shader the uniform belongs to.
    #[must_use]
    pub fn shader(&self) -> &B::ScarceIndex {
        &self.shader
    }
}

#[derive(Debug)]
pub struct ShaderTextureBindingPoint<B>
where
    B: Backend,
{
    raw: B::ShaderTextureBindingPoint,
}

impl<B> ShaderTextureBindingPoint<B>
where
    B: Backend,
{
    #[must_use]
    pub fn raw(&self) -> &B::ShaderTextureBindingPoint {
        &self.raw
    }
}

#[derive(Debug)]
pub struct ShaderUniformBufferBindingPoint<B>
where
    B: Backend,
{
    raw: B::ShaderUniformBufferBindingPoint,
}

impl<B> ShaderUniformBufferBindingPoint<B>
where
    B: Backend,
{
    #[must_use]
    pub fn raw(&self) -> &B::ShaderUniformBufferBindingPoint {
        &self.raw
    }
}

/// A block of uniform data, bound to shaders through units.
#[derive(Debug)]
pub struct UniformBuffer<B>
where
    B: Backend,
{
    raw: B::UniformBuffer,
    len: usize,
}

impl<B> Drop for UniformBuffer<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_uniform_buffer(&self.raw);
    }
}

impl<B> UniformBuffer<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(raw: B::UniformBuffer, len: usize) -> Self {
        Self { raw, len }
    }

    #[must_use]
    pub fn raw(&self) -> &B::UniformBuffer {
        &self.raw
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Overwrites bytes starting at `offset`.
    ///
    /// ## Errors
    ///
    /// [`Error::UpdateOutOfBounds`] if the bytes do not fit.
    pub fn update(&self, offset: usize, bytes: &[u8]) -> Result<(), B::Err> {
        if offset
            .checked_add(bytes.len())
            .map_or(true, |end| end > self.len)
        {
            return Err(Error::UpdateOutOfBounds {
                start: offset,
                count: bytes.len(),
                len: self.len,
            }
            .into());
        }

        B::update_uniform_buffer(&self.raw, offset, bytes)
    }

    /// Same as [`UniformBuffer::update`], with a typed value.
    pub fn update_with<T>(&self, offset: usize, value: &T) -> Result<(), B::Err>
    where
        T: bytemuck::Pod,
    {
        self.update(offset, bytemuck::bytes_of(value))
    }
}
