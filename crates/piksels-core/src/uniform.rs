//! Rust values that can be sent to shader uniforms.
//!
//! Vectors are arrays (`[f32; 3]` is a `Float3`) and matrices are arrays of
//! columns (`[[f32; 3]; 2]` is a `FloatMat23`). Uniform arrays are slices of
//! those.

use bytemuck::Pod;
use piksels_backend::shader::{UniformType, UniformTypeBase};

/// A value with a uniform type and a byte representation.
pub trait UniformValue {
    fn uniform_type(&self) -> UniformType;

    fn as_bytes(&self) -> &[u8];
}

/// Values mapping to a single, non-array uniform type.
pub trait UniformBase: Pod {
    const BASE: UniformTypeBase;
}

impl<T> UniformValue for [T]
where
    T: UniformBase,
{
    fn uniform_type(&self) -> UniformType {
        UniformType::new(T::BASE, self.len())
    }

    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self)
    }
}

macro_rules! impl_uniform {
    ($($ty:ty => $base:ident),+ $(,)?) => {
        $(
            impl UniformBase for $ty {
                const BASE: UniformTypeBase = UniformTypeBase::$base;
            }

            impl UniformValue for $ty {
                fn uniform_type(&self) -> UniformType {
                    UniformTypeBase::$base.into()
                }

                fn as_bytes(&self) -> &[u8] {
                    bytemuck::bytes_of(self)
                }
            }
        )+
    };
}

impl_uniform!(
    i32 => Int,
    [i32; 2] => Int2,
    [i32; 3] => Int3,
    [i32; 4] => Int4,
    u32 => Uint,
    [u32; 2] => Uint2,
    [u32; 3] => Uint3,
    [u32; 4] => Uint4,
    f32 => Float,
    [f32; 2] => Float2,
    [f32; 3] => Float3,
    [f32; 4] => Float4,
    f64 => Double,
    [f64; 2] => Double2,
    [f64; 3] => Double3,
    [f64; 4] => Double4,
    [[f32; 2]; 2] => FloatMat22,
    [[f32; 3]; 2] => FloatMat23,
    [[f32; 4]; 2] => FloatMat24,
    [[f32; 2]; 3] => FloatMat32,
    [[f32; 3]; 3] => FloatMat33,
    [[f32; 4]; 3] => FloatMat34,
    [[f32; 2]; 4] => FloatMat42,
    [[f32; 3]; 4] => FloatMat43,
    [[f32; 4]; 4] => FloatMat44,
    [[f64; 2]; 2] => DoubleMat22,
    [[f64; 3]; 2] => DoubleMat23,
    [[f64; 4]; 2] => DoubleMat24,
    [[f64; 2]; 3] => DoubleMat32,
    [[f64; 3]; 3] => DoubleMat33,
    [[f64; 4]; 3] => DoubleMat34,
    [[f64; 2]; 4] => DoubleMat42,
    [[f64; 3]; 4] => DoubleMat43,
    [[f64; 4]; 4] => DoubleMat44,
);
