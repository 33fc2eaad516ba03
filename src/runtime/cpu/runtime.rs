//! CPU runtime implementation

use super::device::CpuDevice;
use crate::error::{Error, Result};
use crate::runtime::{Runtime, Transfer};
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc};

/// Alignment of every host buffer (AVX-512 width, covers all element types)
const ALIGN: usize = 64;

/// CPU compute runtime
///
/// This is the default runtime that works on any platform.
/// Memory is allocated on the heap using the system allocator.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

impl Runtime for CpuRuntime {
    type Device = CpuDevice;

    fn name() -> &'static str {
        "cpu"
    }

    fn allocate(size_bytes: usize, _device: &Self::Device) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        let layout = AllocLayout::from_size_align(size_bytes, ALIGN)
            .map_err(|_| Error::OutOfMemory { size: size_bytes })?;

        // Zeroed so that a freshly shaped tensor never exposes stale heap bytes.
        let ptr = unsafe { alloc_zeroed(layout) };

        if ptr.is_null() {
            return Err(Error::OutOfMemory { size: size_bytes });
        }

        log::trace!("cpu: allocated {} bytes at 0x{:x}", size_bytes, ptr as u64);
        Ok(ptr as u64)
    }

    fn deallocate(ptr: u64, size_bytes: usize, _device: &Self::Device) {
        if ptr == 0 || size_bytes == 0 {
            return;
        }

        // The layout was valid when the buffer was allocated.
        if let Ok(layout) = AllocLayout::from_size_align(size_bytes, ALIGN) {
            log::trace!("cpu: released {} bytes at 0x{:x}", size_bytes, ptr);
            unsafe {
                dealloc(ptr as *mut u8, layout);
            }
        }
    }

    fn copy_to_device(src: &[u8], dst: u64, _device: &Self::Device) -> Result<()> {
        if src.is_empty() || dst == 0 {
            return Ok(());
        }

        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len());
        }
        Ok(())
    }

    fn copy_from_device(src: u64, dst: &mut [u8], _device: &Self::Device) -> Result<()> {
        if dst.is_empty() || src == 0 {
            return Ok(());
        }

        unsafe {
            std::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }

    fn copy_within_device(
        src: u64,
        dst: u64,
        size_bytes: usize,
        _device: &Self::Device,
    ) -> Result<()> {
        if size_bytes == 0 || src == 0 || dst == 0 {
            return Ok(());
        }

        unsafe {
            // Use copy (not copy_nonoverlapping) in case src and dst overlap
            std::ptr::copy(src as *const u8, dst as *mut u8, size_bytes);
        }
        Ok(())
    }

    fn default_device() -> Self::Device {
        CpuDevice::new()
    }
}

/// Host to host
impl Transfer<CpuRuntime> for CpuRuntime {
    fn transfer(
        src: u64,
        _src_device: &CpuDevice,
        dst: u64,
        dst_device: &CpuDevice,
        size_bytes: usize,
    ) -> Result<()> {
        Self::copy_within_device(src, dst, size_bytes, dst_device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zero_bytes() {
        let device = CpuDevice::new();
        assert_eq!(CpuRuntime::allocate(0, &device).unwrap(), 0);
        CpuRuntime::deallocate(0, 0, &device);
    }

    #[test]
    fn test_allocate_is_zeroed_and_aligned() {
        let device = CpuDevice::new();
        let ptr = CpuRuntime::allocate(32, &device).unwrap();
        assert_ne!(ptr, 0);
        assert_eq!(ptr as usize % ALIGN, 0);

        let mut out = [0xffu8; 32];
        CpuRuntime::copy_from_device(ptr, &mut out, &device).unwrap();
        assert_eq!(out, [0u8; 32]);

        CpuRuntime::deallocate(ptr, 32, &device);
    }

    #[test]
    fn test_allocate_too_large() {
        let device = CpuDevice::new();
        let result = CpuRuntime::allocate(usize::MAX, &device);
        assert!(matches!(result, Err(Error::OutOfMemory { size }) if size == usize::MAX));
    }

    #[test]
    fn test_round_trip_copy() {
        let device = CpuDevice::new();
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let a = CpuRuntime::allocate(src.len(), &device).unwrap();
        let b = CpuRuntime::allocate(src.len(), &device).unwrap();

        CpuRuntime::copy_to_device(&src, a, &device).unwrap();
        <CpuRuntime as Transfer<CpuRuntime>>::transfer(a, &device, b, &device, src.len())
            .unwrap();

        let mut out = [0u8; 8];
        CpuRuntime::copy_from_device(b, &mut out, &device).unwrap();
        assert_eq!(out, src);

        CpuRuntime::deallocate(a, src.len(), &device);
        CpuRuntime::deallocate(b, src.len(), &device);
    }
}
