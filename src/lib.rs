//! # lazytensor
//!
//! **Lazy elementwise tensor expressions over device-aware storage.**
//!
//! Arithmetic on tensors builds an expression tree instead of computing a
//! result. The tree is evaluated in one fused pass when a tensor assigns from
//! it, so `&a * &b + &c` never materializes `a * b`.
//!
//! ## Features
//!
//! - **Tensors**: one contiguous owned buffer plus a shape; reshape, row
//!   slicing, dot product, formatted printing
//! - **Expressions**: scalar, unary, binary and ternary nodes; `+ - * / %`,
//!   negation, `axpy`, and user operators or closures
//! - **Devices**: host memory and, with `cuda`, NVIDIA GPUs; copies between
//!   runtimes are picked at compile time per (source, destination) pair
//!
//! ## Quick Start
//!
//! ```rust
//! use lazytensor::prelude::*;
//!
//! let a = Tensor::<i32>::from_elements(&[1, 2, 3])?;
//! let b = Tensor::<i32>::from_elements(&[2, 3, 4])?;
//!
//! let mut d = Tensor::<i32>::new([3])?;
//! d.assign((&a / &b + 2) % &a)?;
//! assert_eq!(d.as_slice(), &[0, 0, 2]);
//!
//! assert_eq!(dot(&a, &a)?, 14);
//! # Ok::<(), lazytensor::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cuda`: NVIDIA CUDA storage backend
//! - `f16`: Half-precision element types (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod expr;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::expr::{Expr, IntoExpr, axpy};
    pub use crate::runtime::cpu::{CpuDevice, CpuRuntime};
    pub use crate::runtime::{Device, Runtime, Transfer};
    pub use crate::shape;
    pub use crate::tensor::{Shape, Tensor, dot};

    #[cfg(feature = "cuda")]
    pub use crate::runtime::cuda::{CudaDevice, CudaRuntime};
}

/// Default runtime based on enabled features
///
/// - With `cuda` feature: `CudaRuntime`
/// - Otherwise: `CpuRuntime`
#[cfg(feature = "cuda")]
pub type DefaultRuntime = runtime::cuda::CudaRuntime;

/// Default runtime based on enabled features
#[cfg(not(feature = "cuda"))]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
