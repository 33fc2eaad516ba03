//! Core Tensor type

use super::{Shape, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuRuntime;
use crate::runtime::{Runtime, Transfer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// N-dimensional array stored on a compute device
///
/// `Tensor` owns exactly one [`Storage`] buffer and one [`Shape`], with
/// `storage.len() == shape.size()` at all times. The element type `T` is a
/// compile-time parameter; the runtime `R` decides where the buffer lives.
///
/// # Ownership
///
/// There are no views and no shared buffers:
/// - [`Tensor::try_clone`] and [`Tensor::to_device`] deep-copy the buffer
/// - [`Tensor::take`] moves the buffer out and leaves this tensor empty
/// - [`Tensor::slice`] copies a row range into a new, independent tensor
///
/// Mutating the same tensor from several threads is not synchronized; `&mut`
/// access rules this out in safe code.
///
/// # Evaluation
///
/// Expressions are evaluated on the host only: [`Tensor::assign`] and the
/// element accessors exist for `Tensor<T, CpuRuntime>`. Tensors on another
/// runtime move through [`Tensor::to_device`].
///
/// # Example
///
/// ```
/// use lazytensor::prelude::*;
///
/// let a = Tensor::<i32>::from_elements(&[1, 2, 3])?;
/// let b = Tensor::<i32>::from_elements(&[2, 3, 4])?;
///
/// let mut c = Tensor::<i32>::new([3])?;
/// c.assign(&a * &b + 1)?;
/// assert_eq!(c.to_vec()?, [3, 7, 13]);
/// # Ok::<(), lazytensor::error::Error>(())
/// ```
pub struct Tensor<T: Element, R: Runtime = CpuRuntime> {
    /// Device memory
    storage: Storage<R>,
    /// Dimensions
    shape: Shape,
    _marker: PhantomData<T>,
}

impl<T: Element, R: Runtime> Tensor<T, R> {
    fn from_parts(storage: Storage<R>, shape: Shape) -> Self {
        debug_assert_eq!(storage.len(), shape.size());
        Self {
            storage,
            shape,
            _marker: PhantomData,
        }
    }

    /// Create a tensor of the given shape on the runtime's default device
    ///
    /// On the host, the buffer starts zeroed; other runtimes leave it
    /// unspecified until written.
    pub fn new(shape: impl Into<Shape>) -> Result<Self> {
        Self::new_on(shape, &R::default_device())
    }

    /// Create a tensor of the given shape on `device`
    pub fn new_on(shape: impl Into<Shape>, device: &R::Device) -> Result<Self> {
        let shape = shape.into();
        let storage = Storage::new(shape.size(), T::DTYPE, device)?;
        Ok(Self::from_parts(storage, shape))
    }

    /// Create an empty tensor (rank 0, no buffer) on the default device
    pub fn empty() -> Self {
        Self::from_parts(
            Storage::empty(T::DTYPE, &R::default_device()),
            Shape::new(),
        )
    }

    /// Create a tensor from host data and a shape, on the default device
    ///
    /// Returns `ShapeMismatch` if `data.len()` differs from `shape.size()`.
    pub fn from_slice(data: &[T], shape: impl Into<Shape>) -> Result<Self> {
        Self::from_slice_on(data, shape, &R::default_device())
    }

    /// Create a tensor from host data and a shape, on `device`
    pub fn from_slice_on(data: &[T], shape: impl Into<Shape>, device: &R::Device) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.size() {
            return Err(Error::shape_mismatch(shape.as_slice(), &[data.len()]));
        }
        let storage = Storage::from_slice(data, device)?;
        Ok(Self::from_parts(storage, shape))
    }

    /// Create a tensor from the flat element range `range` of `src`
    ///
    /// The new tensor lives on the same device as `src`. Returns
    /// `ShapeMismatch` if the range length differs from `shape.size()`, and
    /// `InvalidRange` if the range does not fit in `src`.
    pub fn from_range(src: &Tensor<T, R>, range: Range<usize>, shape: impl Into<Shape>) -> Result<Self>
    where
        R: Transfer<R>,
    {
        Self::from_range_on(src, range, shape, src.device())
    }

    /// Create a tensor on `device` from the flat element range `range` of
    /// `src`, which may live on another runtime
    pub fn from_range_on<S: Runtime>(
        src: &Tensor<T, S>,
        range: Range<usize>,
        shape: impl Into<Shape>,
        device: &R::Device,
    ) -> Result<Self>
    where
        R: Transfer<S>,
    {
        let shape = shape.into();
        if range.start > range.end || range.end > src.numel() {
            return Err(Error::invalid_range(range.start, range.end, src.numel()));
        }
        if range.len() != shape.size() {
            return Err(Error::shape_mismatch(shape.as_slice(), &[range.len()]));
        }
        let storage = Storage::copy_of_range(&src.storage, range.start, range.len(), device)?;
        Ok(Self::from_parts(storage, shape))
    }

    /// Deep copy on the same device
    pub fn try_clone(&self) -> Result<Self>
    where
        R: Transfer<R>,
    {
        self.to_device::<R>(self.device())
    }

    /// Deep copy onto `device` of runtime `D`
    ///
    /// The copy path is picked by the `Transfer` impl for the `(R, D)` pair.
    pub fn to_device<D: Runtime>(&self, device: &D::Device) -> Result<Tensor<T, D>>
    where
        D: Transfer<R>,
    {
        Tensor::from_range_on(self, 0..self.numel(), self.shape.clone(), device)
    }

    /// Copy the contents of `other` into this tensor
    ///
    /// With equal shapes the values are copied in place. Otherwise a buffer
    /// of `other`'s size is allocated on this tensor's device, filled, and
    /// swapped in, after which the old buffer is released. If allocation or
    /// the copy fails, this tensor is left as it was.
    pub fn copy_from<S: Runtime>(&mut self, other: &Tensor<T, S>) -> Result<()>
    where
        R: Transfer<S>,
    {
        if self.shape == other.shape {
            return self
                .storage
                .copy_range_from(&other.storage, 0, other.numel());
        }

        log::debug!(
            "reallocating {} tensor {} -> {}",
            T::DTYPE,
            self.shape,
            other.shape
        );
        let storage = Storage::copy_of_range(&other.storage, 0, other.numel(), self.device())?;
        self.storage = storage;
        self.shape = other.shape.clone();
        Ok(())
    }

    /// Assign from a host element sequence
    ///
    /// An equal element count overwrites the values in place and keeps the
    /// shape. Any other length replaces the buffer and makes the tensor 1-D.
    pub fn assign_slice(&mut self, data: &[T]) -> Result<()> {
        if data.len() == self.numel() {
            return self.storage.write_slice(data);
        }

        log::debug!(
            "reallocating {} tensor {} -> ({},)",
            T::DTYPE,
            self.shape,
            data.len()
        );
        let storage = Storage::from_slice(data, self.device())?;
        self.storage = storage;
        self.shape = Shape::from([data.len()]);
        Ok(())
    }

    /// Change the shape without touching the buffer
    ///
    /// Returns `ShapeMismatch` and leaves the tensor unchanged if the new
    /// shape has a different element count.
    pub fn reshape(&mut self, shape: impl Into<Shape>) -> Result<()> {
        let shape = shape.into();
        if shape.size() != self.numel() {
            return Err(Error::shape_mismatch(shape.as_slice(), self.shape.as_slice()));
        }
        self.shape = shape;
        Ok(())
    }

    /// Reshape to the shape of `other`
    pub fn reshape_like<U: Element, S: Runtime>(&mut self, other: &Tensor<U, S>) -> Result<()> {
        self.reshape(other.shape())
    }

    /// Move the buffer and shape out, leaving this tensor empty
    ///
    /// The empty tensor has rank 0 and size 0; element access on it fails with
    /// `IndexOutOfBounds`. It may be dropped or assigned to again.
    pub fn take(&mut self) -> Self {
        let storage = self.storage.take();
        let shape = std::mem::take(&mut self.shape);
        Self::from_parts(storage, shape)
    }

    /// Download the elements into a host `Vec` in flat order
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.storage.to_vec()
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the dimensions as a slice
    #[inline]
    pub fn dims(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    /// Check if the tensor holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Get the element type tag
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Get the underlying storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut Storage<R> {
        &mut self.storage
    }
}

impl<T: Element> Tensor<T, CpuRuntime> {
    /// Create a 1-D host tensor holding a copy of `data`
    ///
    /// ```
    /// use lazytensor::prelude::*;
    ///
    /// let t = Tensor::<f32>::from_elements(&[1.0, 2.0, 3.0])?;
    /// assert_eq!(t.dims(), &[3]);
    /// # Ok::<(), lazytensor::error::Error>(())
    /// ```
    pub fn from_elements(data: &[T]) -> Result<Self> {
        Self::from_slice(data, [data.len()])
    }
}

impl<T: Element, R: Runtime> Default for Tensor<T, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Element, R: Runtime> fmt::Debug for Tensor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("dtype", &T::DTYPE)
            .field("runtime", &R::name())
            .field("device", self.device())
            .finish()
    }
}
