//! CPU runtime implementation
//!
//! The CPU runtime uses standard heap allocation. It is the only runtime on
//! which expressions are evaluated; other runtimes hold data and move it
//! through [`Transfer`](crate::runtime::Transfer).

mod device;
mod runtime;

pub use device::CpuDevice;
pub use runtime::CpuRuntime;
