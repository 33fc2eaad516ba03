//! Copies between a source and a destination runtime

use super::Runtime;
use crate::error::Result;

/// Copy path from runtime `Src` into the implementing (destination) runtime
///
/// One impl exists per supported (source, destination) pair. Which primitive
/// runs is decided by trait selection when the generic code is instantiated;
/// there is no runtime branch on the kind of device.
///
/// | Source | Destination | Primitive |
/// |--------|-------------|-----------|
/// | CPU    | CPU         | host `memmove` |
/// | CPU    | CUDA        | upload |
/// | CUDA   | CUDA        | device-local copy (host staging across devices) |
/// | CUDA   | CPU         | download |
///
/// All copies are blocking.
pub trait Transfer<Src: Runtime>: Runtime {
    /// Copy `size_bytes` bytes from `src` on `src_device` to `dst` on `dst_device`
    fn transfer(
        src: u64,
        src_device: &Src::Device,
        dst: u64,
        dst_device: &Self::Device,
        size_bytes: usize,
    ) -> Result<()>;
}
