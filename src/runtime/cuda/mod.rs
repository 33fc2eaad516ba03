//! CUDA runtime implementation
//!
//! Accelerator memory through NVIDIA CUDA, using cudarc for direct driver
//! access. Only storage and copies live here: expressions are evaluated on
//! the host, so CUDA tensors are moved with `Tensor::to_device` before they
//! take part in one.
//!
//! - `CudaDevice` - a GPU by ordinal
//! - `CudaRuntime` - implements `Runtime` and the `Transfer` pairs with the CPU

mod cache;
mod device;
mod runtime;

pub use device::CudaDevice;
pub use runtime::{CudaRuntime, is_cuda_available};
