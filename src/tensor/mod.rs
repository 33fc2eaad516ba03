//! Tensor types and operations
//!
//! This module provides the core `Tensor` type, which owns one contiguous
//! buffer on a compute device (CPU, GPU) together with its shape.

mod core;
mod display;
mod eval;
mod shape;
mod slice;
mod storage;

pub use core::Tensor;
pub use eval::dot;
pub use shape::Shape;
pub use storage::Storage;
