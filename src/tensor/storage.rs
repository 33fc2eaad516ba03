//! Storage: single-owner device memory

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuRuntime;
use crate::runtime::{Device, Runtime, Transfer};

/// Storage for tensor data on a device
///
/// A `Storage` owns exactly one buffer of `len` elements of `dtype`, allocated
/// through `R::allocate` and released through `R::deallocate` when dropped.
/// The length is fixed at allocation time; changing it means allocating a new
/// `Storage`. There is no sharing: moving a `Storage` moves the buffer, and
/// [`Storage::take`] leaves an empty storage behind.
pub struct Storage<R: Runtime> {
    /// Raw device pointer (GPU address or CPU ptr cast to u64), 0 when empty
    ptr: u64,
    /// Number of elements (not bytes)
    len: usize,
    /// Element type
    dtype: DType,
    /// Device where memory is allocated
    device: R::Device,
}

impl<R: Runtime> Storage<R> {
    /// Allocate storage for `len` elements of `dtype` on `device`
    ///
    /// Contents are unspecified until written.
    pub fn new(len: usize, dtype: DType, device: &R::Device) -> Result<Self> {
        let size_bytes = len
            .checked_mul(dtype.size_in_bytes())
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        let ptr = R::allocate(size_bytes, device)?;

        Ok(Self {
            ptr,
            len,
            dtype,
            device: device.clone(),
        })
    }

    /// Storage with no buffer
    pub fn empty(dtype: DType, device: &R::Device) -> Self {
        Self {
            ptr: 0,
            len: 0,
            dtype,
            device: device.clone(),
        }
    }

    /// Allocate storage on `device` and upload `data` from the host
    pub fn from_slice<T: Element>(data: &[T], device: &R::Device) -> Result<Self> {
        let mut storage = Self::new(data.len(), T::DTYPE, device)?;
        storage.write_slice(data)?;
        Ok(storage)
    }

    /// Allocate storage on `device` holding a copy of `len` elements of `src`
    /// starting at element `start`
    pub fn copy_of_range<S: Runtime>(
        src: &Storage<S>,
        start: usize,
        len: usize,
        device: &R::Device,
    ) -> Result<Self>
    where
        R: Transfer<S>,
    {
        let mut storage = Self::new(len, src.dtype, device)?;
        storage.copy_range_from(src, start, len)?;
        Ok(storage)
    }

    /// Overwrite the first `len` elements with `src[start..start + len]`
    ///
    /// The copy path is the `Transfer` impl for the `(S, R)` pair.
    pub fn copy_range_from<S: Runtime>(
        &mut self,
        src: &Storage<S>,
        start: usize,
        len: usize,
    ) -> Result<()>
    where
        R: Transfer<S>,
    {
        Error::check_dtype(self.dtype, src.dtype)?;
        let end = start
            .checked_add(len)
            .ok_or_else(|| Error::invalid_range(start, usize::MAX, src.len))?;
        if end > src.len {
            return Err(Error::invalid_range(start, end, src.len));
        }
        if len > self.len {
            return Err(Error::invalid_range(0, len, self.len));
        }
        if len == 0 {
            return Ok(());
        }

        let elem_size = self.dtype.size_in_bytes();
        let src_ptr = src.ptr + (start * elem_size) as u64;
        log::trace!(
            "transfer {} x {} from {}({}) to {}({})",
            len,
            self.dtype,
            S::name(),
            src.device.id(),
            R::name(),
            self.device.id()
        );
        R::transfer(
            src_ptr,
            &src.device,
            self.ptr,
            &self.device,
            len * elem_size,
        )
    }

    /// Upload host elements into the front of this buffer
    ///
    /// `T` must match the storage dtype.
    pub fn write_slice<T: Element>(&mut self, data: &[T]) -> Result<()> {
        Error::check_dtype(self.dtype, T::DTYPE)?;
        if data.len() > self.len {
            return Err(Error::invalid_range(0, data.len(), self.len));
        }
        R::copy_to_device(bytemuck::cast_slice(data), self.ptr, &self.device)
    }

    /// Download the whole buffer into a host `Vec`
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        Error::check_dtype(self.dtype, T::DTYPE)?;
        let mut result = vec![T::zeroed(); self.len];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        R::copy_from_device(self.ptr, bytes, &self.device)?;
        Ok(result)
    }

    /// Move the buffer out, leaving this storage empty on the same device
    pub fn take(&mut self) -> Self {
        let empty = Self::empty(self.dtype, &self.device);
        std::mem::replace(self, empty)
    }

    /// Get the raw device pointer
    #[inline]
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if storage is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        &self.device
    }

    /// Get size in bytes
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        self.len * self.dtype.size_in_bytes()
    }
}

impl Storage<CpuRuntime> {
    /// Host memory as a typed slice
    pub(crate) fn as_slice<T: Element>(&self) -> &[T] {
        debug_assert_eq!(self.dtype, T::DTYPE);
        if self.ptr == 0 {
            return &[];
        }
        // ptr is 64-byte aligned and holds len initialized (zeroed or written) T values
        unsafe { std::slice::from_raw_parts(self.ptr as *const T, self.len) }
    }

    /// Host memory as a mutable typed slice
    pub(crate) fn as_mut_slice<T: Element>(&mut self) -> &mut [T] {
        debug_assert_eq!(self.dtype, T::DTYPE);
        if self.ptr == 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.ptr as *mut T, self.len) }
    }
}

impl<R: Runtime> Drop for Storage<R> {
    fn drop(&mut self) {
        if self.ptr != 0 {
            R::deallocate(self.ptr, self.size_in_bytes(), &self.device);
        }
    }
}

impl<R: Runtime> std::fmt::Debug for Storage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("ptr", &format!("0x{:x}", self.ptr))
            .field("len", &self.len)
            .field("dtype", &self.dtype)
            .field("device", &self.device)
            .finish()
    }
}
