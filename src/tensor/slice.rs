//! Row slicing along the leading dimension

use super::{Shape, Tensor};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::{Runtime, Transfer};

impl<T: Element, R: Runtime + Transfer<R>> Tensor<T, R> {
    /// Copy rows `[begin, end)` of the leading dimension into a new tensor
    ///
    /// The result has shape `[end - begin, d1, d2, ...]`, lives on the same
    /// device, and owns its buffer: later writes to either tensor are not
    /// seen by the other.
    ///
    /// Returns `IndexOutOfBounds` for a rank-0 tensor and `InvalidRange`
    /// unless `begin < end <= d0`.
    ///
    /// ```
    /// use lazytensor::prelude::*;
    ///
    /// let t = Tensor::<i32>::from_slice(&[1, 2, 3, 4, 5, 6], [3, 2])?;
    /// let rows = t.slice(1, 3)?;
    /// assert_eq!(rows.dims(), &[2, 2]);
    /// assert_eq!(rows.as_slice(), &[3, 4, 5, 6]);
    /// # Ok::<(), lazytensor::error::Error>(())
    /// ```
    pub fn slice(&self, begin: usize, end: usize) -> Result<Self> {
        let rows = self.shape().dim(0)?;
        if begin >= end || end > rows {
            return Err(Error::invalid_range(begin, end, rows));
        }

        let row_len = self.shape().size_from(1)?;
        let shape: Shape = std::iter::once(end - begin)
            .chain(self.dims()[1..].iter().copied())
            .collect();
        Self::from_range(self, begin * row_len..end * row_len, shape)
    }

    /// Rows `[begin, d0)`
    pub fn slice_from(&self, begin: usize) -> Result<Self> {
        let rows = self.shape().dim(0)?;
        self.slice(begin, rows)
    }

    /// Rows `[0, end)`
    pub fn slice_to(&self, end: usize) -> Result<Self> {
        self.slice(0, end)
    }
}
