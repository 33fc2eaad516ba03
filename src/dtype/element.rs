//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::Pod;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be elements of a tensor
///
/// # Bounds
/// - `Pod` - buffers are moved between devices as raw bytes
/// - `Add + Sub + Mul + Div` - arithmetic with `Output = Self`
/// - `PartialOrd` - ordering for user-defined operators such as `max`
///
/// `Neg` and `Rem` are not required here. The operator catalog asks for them
/// only where an expression negates or takes a remainder.
pub trait Element:
    Copy
    + Send
    + Sync
    + Pod
    + fmt::Debug
    + fmt::Display
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 (used by the textual rendering to size columns)
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;
}

macro_rules! impl_element_float {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }
        }
    };
}

macro_rules! impl_element_int {
    ($ty:ty, $dtype:expr) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn zero() -> Self {
                0
            }
        }
    };
}

impl_element_float!(f64, DType::F64);
impl_element_float!(f32, DType::F32);

impl_element_int!(i64, DType::I64);
impl_element_int!(i32, DType::I32);
impl_element_int!(i16, DType::I16);
impl_element_int!(i8, DType::I8);
impl_element_int!(u64, DType::U64);
impl_element_int!(u32, DType::U32);
impl_element_int!(u16, DType::U16);
impl_element_int!(u8, DType::U8);

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::f16::ZERO
    }
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }

    #[inline]
    fn zero() -> Self {
        half::bf16::ZERO
    }
}
