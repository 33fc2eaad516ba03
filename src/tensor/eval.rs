//! Host evaluation: expression assignment and element access

use super::{Shape, Tensor};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::expr::{Expr, IntoExpr};
use crate::runtime::cpu::CpuRuntime;

/// A host tensor is an expression leaf: element `i` is read straight from
/// the buffer.
impl<T: Element> Expr for Tensor<T, CpuRuntime> {
    type Output = T;

    #[inline]
    fn eval_at(&self, index: usize) -> T {
        self.as_slice()[index]
    }

    fn check_numel(&self, expected: usize) -> Result<()> {
        if self.numel() != expected {
            return Err(Error::shape_mismatch(&[expected], self.dims()));
        }
        Ok(())
    }
}

impl<T: Element> Tensor<T, CpuRuntime> {
    /// Evaluate `expr` at every flat index and store the results
    ///
    /// This is the only place where expressions compute anything. Every leaf
    /// of `expr` must hold exactly `self.numel()` elements, otherwise
    /// `ShapeMismatch` is returned before any element is written. A scalar
    /// fills the whole tensor.
    ///
    /// An expression cannot borrow the tensor it is assigned to; build a new
    /// tensor with [`Tensor::from_expr`] for that.
    ///
    /// ```
    /// use lazytensor::prelude::*;
    /// use lazytensor::expr::axpy;
    ///
    /// let a = Tensor::<i32>::from_elements(&[1, 2, 3])?;
    /// let b = Tensor::<i32>::from_elements(&[2, 3, 4])?;
    /// let c = Tensor::<i32>::from_elements(&[3, 4, 5])?;
    ///
    /// let mut d = Tensor::<i32>::new([3])?;
    /// d.assign(axpy(&a, &b, &c))?;
    /// assert_eq!(d.as_slice(), &[5, 10, 17]);
    ///
    /// d.assign(-1)?;
    /// assert_eq!(d.as_slice(), &[-1, -1, -1]);
    /// # Ok::<(), lazytensor::error::Error>(())
    /// ```
    pub fn assign<E>(&mut self, expr: E) -> Result<()>
    where
        E: IntoExpr,
        E::Expr: Expr<Output = T>,
    {
        let expr = expr.into_expr();
        let n = self.numel();
        expr.check_numel(n)?;

        log::trace!("evaluating {} elements of {}", n, T::DTYPE);
        for (i, out) in self.as_mut_slice().iter_mut().enumerate() {
            *out = expr.eval_at(i);
        }
        Ok(())
    }

    /// Allocate a host tensor of `shape` and assign `expr` into it
    ///
    /// Unlike [`Tensor::assign`], the expression may borrow a tensor that is
    /// about to be replaced by the result:
    ///
    /// ```
    /// use lazytensor::prelude::*;
    ///
    /// let mut b = Tensor::<i32>::from_elements(&[1, 2, 3])?;
    /// b = Tensor::from_expr(b.shape(), &b * 3)?;
    /// assert_eq!(b.as_slice(), &[3, 6, 9]);
    /// # Ok::<(), lazytensor::error::Error>(())
    /// ```
    pub fn from_expr<E>(shape: impl Into<Shape>, expr: E) -> Result<Self>
    where
        E: IntoExpr,
        E::Expr: Expr<Output = T>,
    {
        let mut out = Self::new(shape)?;
        out.assign(expr)?;
        Ok(out)
    }

    /// Set every element to `value`
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// Element at flat index `index`
    pub fn get(&self, index: usize) -> Result<T> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or_else(|| Error::index_out_of_bounds(index, self.numel()))
    }

    /// Overwrite the element at flat index `index`
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let size = self.numel();
        let slot = self
            .as_mut_slice()
            .get_mut(index)
            .ok_or_else(|| Error::index_out_of_bounds(index, size))?;
        *slot = value;
        Ok(())
    }

    /// View the elements in flat order
    pub fn as_slice(&self) -> &[T] {
        self.storage().as_slice()
    }

    /// Mutably view the elements in flat order
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage_mut().as_mut_slice()
    }

    /// Sum of elementwise products, see [`dot`]
    pub fn dot(&self, other: &Self) -> Result<T> {
        dot(self, other)
    }
}

/// Sum of elementwise products of two host tensors
///
/// The shapes may differ; the element counts must not (`ShapeMismatch`).
/// Products are accumulated left to right in flat index order, so floating
/// point results are reproducible.
pub fn dot<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<T> {
    if a.numel() != b.numel() {
        return Err(Error::shape_mismatch(a.dims(), b.dims()));
    }
    Ok(a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_scalar_times_tensor() {
        let t = Tensor::<i32>::from_elements(&[1, -2, 3]).unwrap();
        let mut t2 = Tensor::<i32>::new([3]).unwrap();
        t2.assign(3 * &t).unwrap();
        assert_eq!(t2.as_slice(), &[3, -6, 9]);

        t2.assign(&t * 3).unwrap();
        assert_eq!(t2.as_slice(), &[3, -6, 9]);
    }

    #[test]
    fn test_assign_rejects_mismatched_leaf() {
        let a = Tensor::<f64>::from_elements(&[1.0, 2.0, 3.0]).unwrap();
        let b = Tensor::<f64>::from_elements(&[1.0, 2.0]).unwrap();
        let mut out = Tensor::<f64>::from_elements(&[7.0, 7.0, 7.0]).unwrap();

        let err = out.assign(&a + &b).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
        assert_eq!(out.as_slice(), &[7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_assign_uses_element_count_not_shape() {
        let a = Tensor::<i32>::from_slice(&[1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
        let mut out = Tensor::<i32>::new([6]).unwrap();
        out.assign(&a - 1).unwrap();
        assert_eq!(out.as_slice(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fill_and_scalar_assign() {
        let mut t = Tensor::<u16>::new([2, 2]).unwrap();
        t.fill(4);
        assert_eq!(t.as_slice(), &[4, 4, 4, 4]);
        t.assign(9u16).unwrap();
        assert_eq!(t.as_slice(), &[9, 9, 9, 9]);
    }

    #[test]
    fn test_get_set() {
        let mut t = Tensor::<i32>::from_elements(&[2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(t.get(2).unwrap(), 4);
        t.set(3, -1).unwrap();
        assert_eq!(t.get(3).unwrap(), -1);

        assert!(matches!(
            t.get(6),
            Err(Error::IndexOutOfBounds { index: 6, size: 6 })
        ));
        assert!(t.set(6, 0).is_err());
    }

    #[test]
    fn test_from_expr_over_self() {
        let mut b = Tensor::<i32>::from_slice(&[2, 3, 4, 5, 6, 7], [1, 6, 1]).unwrap();
        b = Tensor::from_expr(b.shape(), &b * 3).unwrap();
        assert_eq!(b.get(2).unwrap(), 12);
        assert_eq!(b.dims(), &[1, 6, 1]);
    }

    #[test]
    fn test_dot() {
        let a = Tensor::<i32>::from_elements(&[1, 2, 3]).unwrap();
        assert_eq!(dot(&a, &a).unwrap(), 14);

        let b = Tensor::<i32>::from_slice(&[1, 1, 1], [3, 1]).unwrap();
        assert_eq!(a.dot(&b).unwrap(), 6);

        let c = Tensor::<i32>::from_elements(&[1, 2]).unwrap();
        assert!(matches!(dot(&a, &c), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_tensor_access() {
        let mut a = Tensor::<f32>::from_elements(&[1.0]).unwrap();
        let _b = a.take();
        assert!(a.as_slice().is_empty());
        assert!(matches!(
            a.get(0),
            Err(Error::IndexOutOfBounds { index: 0, size: 0 })
        ));
    }
}
