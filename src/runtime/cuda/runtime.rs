//! CUDA runtime implementation

use super::cache::handle;
use super::device::CudaDevice;
use crate::error::{Error, Result};
use crate::runtime::cpu::{CpuDevice, CpuRuntime};
use crate::runtime::{Device, Runtime, Transfer};
use cudarc::driver::sys::{self, CUresult};
use std::ffi::c_void;

/// CUDA Runtime adapter
///
/// Implements the generic Runtime trait on top of the cudarc driver API.
/// Every copy synchronizes its stream before returning.
#[derive(Clone, Debug, Default)]
pub struct CudaRuntime;

impl Runtime for CudaRuntime {
    type Device = CudaDevice;

    fn name() -> &'static str {
        "cuda"
    }

    /// Allocate GPU memory.
    ///
    /// Returns `Err(OutOfMemory)` if CUDA memory allocation fails.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        let handle = handle(device)?;
        let mut ptr: u64 = 0;
        let result =
            unsafe { sys::cuMemAllocAsync(&mut ptr, size_bytes, handle.stream.cu_stream()) };

        if result != CUresult::CUDA_SUCCESS {
            log::debug!(
                "cuda: allocation of {} bytes on device {} failed ({:?})",
                size_bytes,
                device.index,
                result
            );
            return Err(Error::OutOfMemory { size: size_bytes });
        }

        log::trace!("cuda: allocated {} bytes at 0x{:x}", size_bytes, ptr);
        Ok(ptr)
    }

    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device) {
        if ptr == 0 {
            return;
        }

        // Deallocation runs from Drop on any thread; failures are reported, never raised.
        // The device context must be current on this thread before freeing.
        let handle = match handle(device) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!(
                    "cuda: cannot bind device {} to free 0x{:x}: {}",
                    device.index,
                    ptr,
                    e
                );
                return;
            }
        };

        let result = unsafe { sys::cuMemFreeAsync(ptr, handle.stream.cu_stream()) };
        if result != CUresult::CUDA_SUCCESS {
            log::warn!(
                "cuda: freeing {} bytes at 0x{:x} failed ({:?})",
                size_bytes,
                ptr,
                result
            );
        }
    }

    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device) -> Result<()> {
        if src.is_empty() || dst == 0 {
            return Ok(());
        }

        let handle = handle(device)?;
        let result = unsafe {
            sys::cuMemcpyHtoDAsync_v2(
                dst,
                src.as_ptr() as *const c_void,
                src.len(),
                handle.stream.cu_stream(),
            )
        };
        if result != CUresult::CUDA_SUCCESS {
            return Err(Error::Backend(format!(
                "CUDA host-to-device copy failed: {} bytes ({:?})",
                src.len(),
                result
            )));
        }

        handle.stream.synchronize()?;
        Ok(())
    }

    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device) -> Result<()> {
        if dst.is_empty() || src == 0 {
            return Ok(());
        }

        let handle = handle(device)?;
        let result = unsafe {
            sys::cuMemcpyDtoHAsync_v2(
                dst.as_mut_ptr() as *mut c_void,
                src,
                dst.len(),
                handle.stream.cu_stream(),
            )
        };
        if result != CUresult::CUDA_SUCCESS {
            return Err(Error::Backend(format!(
                "CUDA device-to-host copy failed: {} bytes ({:?})",
                dst.len(),
                result
            )));
        }

        handle.stream.synchronize()?;
        Ok(())
    }

    fn copy_within_device(
        src: u64,
        dst: u64,
        size_bytes: usize,
        device: &Self::Device,
    ) -> Result<()> {
        if size_bytes == 0 || src == 0 || dst == 0 {
            return Ok(());
        }

        let handle = handle(device)?;
        let result = unsafe {
            sys::cuMemcpyDtoDAsync_v2(dst, src, size_bytes, handle.stream.cu_stream())
        };
        if result != CUresult::CUDA_SUCCESS {
            return Err(Error::Backend(format!(
                "CUDA device-to-device copy failed: {} bytes ({:?})",
                size_bytes, result
            )));
        }

        handle.stream.synchronize()?;
        Ok(())
    }

    fn default_device() -> Self::Device {
        CudaDevice::new(0)
    }
}

/// Host to accelerator (upload)
impl Transfer<CpuRuntime> for CudaRuntime {
    fn transfer(
        src: u64,
        _src_device: &CpuDevice,
        dst: u64,
        dst_device: &CudaDevice,
        size_bytes: usize,
    ) -> Result<()> {
        if size_bytes == 0 || src == 0 {
            return Ok(());
        }
        let host = unsafe { std::slice::from_raw_parts(src as *const u8, size_bytes) };
        Self::copy_to_device(host, dst, dst_device)
    }
}

/// Accelerator to host (download)
impl Transfer<CudaRuntime> for CpuRuntime {
    fn transfer(
        src: u64,
        src_device: &CudaDevice,
        dst: u64,
        _dst_device: &CpuDevice,
        size_bytes: usize,
    ) -> Result<()> {
        if size_bytes == 0 || dst == 0 {
            return Ok(());
        }
        let host = unsafe { std::slice::from_raw_parts_mut(dst as *mut u8, size_bytes) };
        CudaRuntime::copy_from_device(src, host, src_device)
    }
}

/// Accelerator to accelerator
impl Transfer<CudaRuntime> for CudaRuntime {
    fn transfer(
        src: u64,
        src_device: &CudaDevice,
        dst: u64,
        dst_device: &CudaDevice,
        size_bytes: usize,
    ) -> Result<()> {
        if src_device.is_same(dst_device) {
            return Self::copy_within_device(src, dst, size_bytes, dst_device);
        }

        // Different GPUs: stage through host memory.
        log::debug!(
            "cuda: staging {} bytes from device {} to device {} through host",
            size_bytes,
            src_device.index,
            dst_device.index
        );
        let mut staging = vec![0u8; size_bytes];
        Self::copy_from_device(src, &mut staging, src_device)?;
        Self::copy_to_device(&staging, dst, dst_device)
    }
}

/// Check if CUDA is available on this system
pub fn is_cuda_available() -> bool {
    std::panic::catch_unwind(|| handle(&CudaDevice::new(0)).is_ok()).unwrap_or(false)
}
