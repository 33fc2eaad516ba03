//! Shape type: dimensions of a tensor

use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::fmt;
use std::iter::FromIterator;

/// Stack allocation threshold for dimensions
/// Most tensors have 4 or fewer dimensions, so we stack-allocate up to 4
pub(crate) const STACK_DIMS: usize = 4;

/// Shape type: dimensions of a tensor, plus their cached product
///
/// A shape is a plain value: owners copy it, they never share it. Every
/// dimension access is range-checked and reports `IndexOutOfBounds` instead of
/// reading past the end.
///
/// A rank-0 shape (no dimensions) has size 0. Any extent of 0 also gives size 0.
///
/// # Example
///
/// ```
/// use lazytensor::shape;
///
/// let s = shape![2, 3, 4];
/// assert_eq!(s.size(), 24);
/// assert_eq!(s.dim(1).unwrap(), 3);
/// assert_eq!(s.size_from(1).unwrap(), 12);
/// ```
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; STACK_DIMS]>,
    size: usize,
}

impl Shape {
    /// Create a rank-0 shape (size 0).
    pub fn new() -> Self {
        Self::default()
    }

    fn from_dims(dims: SmallVec<[usize; STACK_DIMS]>) -> Self {
        let size = product(&dims);
        Self { dims, size }
    }

    /// Replace all dimensions, recomputing the size.
    pub fn set<S: Into<Shape>>(&mut self, dims: S) {
        *self = dims.into();
    }

    /// View the dimensions as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        self.dims.as_slice()
    }

    /// Number of dimensions in this shape.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Extent of one dimension.
    pub fn dim(&self, index: usize) -> Result<usize> {
        self.dims
            .get(index)
            .copied()
            .ok_or_else(|| Error::index_out_of_bounds(index, self.ndim()))
    }

    /// Product of the extents of dimensions `[start, end)`.
    ///
    /// An empty range (`start == end`) yields 1.
    pub fn size_range(&self, start: usize, end: usize) -> Result<usize> {
        if end > self.ndim() {
            return Err(Error::index_out_of_bounds(end, self.ndim()));
        }
        if start > end {
            return Err(Error::invalid_range(start, end, self.ndim()));
        }
        Ok(checked_product(&self.dims[start..end]))
    }

    /// Product of the extents from `start` to the last dimension.
    pub fn size_from(&self, start: usize) -> Result<usize> {
        self.size_range(start, self.ndim())
    }

    /// Product of the extents of the first `end` dimensions.
    pub fn size_to(&self, end: usize) -> Result<usize> {
        self.size_range(0, end)
    }

    /// Iterate over the extents.
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.dims.iter()
    }
}

/// Element count of a whole shape: rank 0 counts as empty.
fn product(dims: &[usize]) -> usize {
    if dims.is_empty() {
        return 0;
    }
    checked_product(dims)
}

/// Product of extents (1 for none), saturating at `usize::MAX`.
///
/// Any zero extent makes the product 0, even after an overflowing prefix.
fn checked_product(dims: &[usize]) -> usize {
    if dims.contains(&0) {
        return 0;
    }
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .unwrap_or(usize::MAX)
}

/// Build a [`Shape`] from a list of extents, like `vec!`.
///
/// `shape![]` is the rank-0 shape. Every extent must be a `usize`; other
/// integer types are not converted.
///
/// ```compile_fail
/// let s = lazytensor::shape![-1];
/// ```
///
/// ```compile_fail
/// let n: i32 = 3;
/// let s = lazytensor::shape![n, 2];
/// ```
#[macro_export]
macro_rules! shape {
    () => {
        $crate::tensor::Shape::new()
    };
    ($($dim:expr),+ $(,)?) => {
        $crate::tensor::Shape::from([$({
            let dim: usize = $dim;
            dim
        }),+])
    };
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dims.fmt(f)
    }
}

/// `(2,3,4)`, with a trailing comma for one dimension: `(6,)`.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i != 0 {
                f.write_str(",")?;
            }
            write!(f, "{d}")?;
        }
        if self.ndim() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self.dims.as_slice()
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.dims.iter()
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Self::from_dims(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Self::from_dims(value.iter().copied().collect())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Self::from_dims(value.into_iter().collect())
    }
}

impl From<&Shape> for Shape {
    fn from(value: &Shape) -> Self {
        value.clone()
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self::from_dims(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_product() {
        let s = Shape::from([2, 3, 4]);
        assert_eq!(s.size(), 24);
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.dim(0).unwrap(), 2);
        assert_eq!(s.dim(2).unwrap(), 4);
    }

    #[test]
    fn test_rank_zero_is_distinct_from_zero_extent() {
        let empty = Shape::new();
        assert_eq!(empty.ndim(), 0);
        assert_eq!(empty.size(), 0);
        assert_eq!(Shape::from(Vec::<usize>::new()), empty);

        let zero = shape![0];
        assert_eq!(zero.ndim(), 1);
        assert_eq!(zero.size(), 0);
        assert_ne!(zero, empty);
    }

    #[test]
    fn test_equality_by_dims() {
        assert_eq!(shape![2, 3, 4], Shape::from(vec![2, 3, 4]));
        assert_ne!(shape![2, 3], shape![3, 2]);
        assert_ne!(shape![6], shape![6, 1]);
    }

    #[test]
    fn test_dim_out_of_range() {
        let s = shape![3, 4];
        assert!(matches!(
            s.dim(2),
            Err(Error::IndexOutOfBounds { index: 2, size: 2 })
        ));
    }

    #[test]
    fn test_size_ranges() {
        let s = shape![3, 4, 5];
        assert_eq!(s.size_range(0, 3).unwrap(), 60);
        assert_eq!(s.size_range(1, 3).unwrap(), 20);
        assert_eq!(s.size_range(1, 1).unwrap(), 1);
        assert_eq!(s.size_from(1).unwrap(), 20);
        assert_eq!(s.size_from(3).unwrap(), 1);
        assert_eq!(s.size_to(2).unwrap(), 12);

        assert!(matches!(
            s.size_range(0, 4),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            s.size_range(2, 1),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_set_recomputes_size() {
        let mut s = shape![2, 3, 4];
        s.set([3, 4, 5]);
        assert_eq!(s, shape![3, 4, 5]);
        assert_eq!(s.size(), 60);

        s.set(Vec::<usize>::new());
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn test_overflow_saturates() {
        let s = shape![usize::MAX, 2];
        assert_eq!(s.size(), usize::MAX);

        // a later zero extent still empties the shape
        let s = shape![usize::MAX, 2, 0];
        assert_eq!(s.size(), 0);
        assert_eq!(s.size_range(0, 2).unwrap(), usize::MAX);
        assert_eq!(s.size_range(1, 3).unwrap(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(shape![2, 3, 4].to_string(), "(2,3,4)");
        assert_eq!(shape![6].to_string(), "(6,)");
        assert_eq!(Shape::new().to_string(), "()");
    }
}
