//! Elementwise operator catalog
//!
//! An operator is a value that maps one, two or three operand values to a
//! result. The result type is an associated type, so the element type of a
//! whole expression tree is inferred at compile time from its leaves.
//!
//! The catalog is open: implement [`UnaryOp`], [`BinaryOp`] or [`TernaryOp`]
//! for your own type, or wrap a closure in [`Func`].
//!
//! ```
//! use lazytensor::expr::BinaryOp;
//!
//! #[derive(Clone, Copy)]
//! struct Maximum;
//!
//! impl<T: PartialOrd + Copy> BinaryOp<T, T> for Maximum {
//!     type Output = T;
//!
//!     fn apply(&self, a: T, b: T) -> T {
//!         if a > b { a } else { b }
//!     }
//! }
//!
//! assert_eq!(Maximum.apply(3, 7), 7);
//! ```

use std::ops;

/// One-operand elementwise map
pub trait UnaryOp<A> {
    /// Result element type
    type Output: Copy;

    /// Map one operand value
    fn apply(&self, a: A) -> Self::Output;
}

/// Two-operand elementwise map
pub trait BinaryOp<A, B> {
    /// Result element type
    type Output: Copy;

    /// Map two operand values
    fn apply(&self, a: A, b: B) -> Self::Output;
}

/// Three-operand elementwise map
pub trait TernaryOp<A, B, C> {
    /// Result element type
    type Output: Copy;

    /// Map three operand values
    fn apply(&self, a: A, b: B, c: C) -> Self::Output;
}

/// `x`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<A: Copy> UnaryOp<A> for Identity {
    type Output = A;

    #[inline]
    fn apply(&self, a: A) -> A {
        a
    }
}

/// `-x`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Negate;

impl<A> UnaryOp<A> for Negate
where
    A: ops::Neg,
    A::Output: Copy,
{
    type Output = A::Output;

    #[inline]
    fn apply(&self, a: A) -> Self::Output {
        -a
    }
}

macro_rules! impl_arith_op {
    ($(#[$doc:meta])* $name:ident, $trait:ident, $op:tt) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl<A, B> BinaryOp<A, B> for $name
        where
            A: ops::$trait<B>,
            A::Output: Copy,
        {
            type Output = A::Output;

            #[inline]
            fn apply(&self, a: A, b: B) -> Self::Output {
                a $op b
            }
        }
    };
}

impl_arith_op!(
    /// `a + b`
    Plus, Add, +
);
impl_arith_op!(
    /// `a - b`
    Minus, Sub, -
);
impl_arith_op!(
    /// `a * b`
    Mul, Mul, *
);
impl_arith_op!(
    /// `a / b` (truncating for integers)
    Div, Div, /
);
impl_arith_op!(
    /// `a % b` (sign of the dividend for integers)
    Mod, Rem, %
);

/// Fused multiply-add: `a * x + y`
///
/// Evaluated as two native operations, not a single-rounding `mul_add`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Axpy;

impl<A, X, Y> TernaryOp<A, X, Y> for Axpy
where
    A: ops::Mul<X>,
    A::Output: ops::Add<Y>,
    <A::Output as ops::Add<Y>>::Output: Copy,
{
    type Output = <A::Output as ops::Add<Y>>::Output;

    #[inline]
    fn apply(&self, a: A, x: X, y: Y) -> Self::Output {
        a * x + y
    }
}

/// A closure used as an operator
///
/// The arity follows the closure: `Fn(A)`, `Fn(A, B)` and `Fn(A, B, C)` become
/// unary, binary and ternary operators respectively.
#[derive(Clone, Copy, Debug)]
pub struct Func<F>(pub F);

impl<F, A, O> UnaryOp<A> for Func<F>
where
    F: Fn(A) -> O,
    O: Copy,
{
    type Output = O;

    #[inline]
    fn apply(&self, a: A) -> O {
        (self.0)(a)
    }
}

impl<F, A, B, O> BinaryOp<A, B> for Func<F>
where
    F: Fn(A, B) -> O,
    O: Copy,
{
    type Output = O;

    #[inline]
    fn apply(&self, a: A, b: B) -> O {
        (self.0)(a, b)
    }
}

impl<F, A, B, C, O> TernaryOp<A, B, C> for Func<F>
where
    F: Fn(A, B, C) -> O,
    O: Copy,
{
    type Output = O;

    #[inline]
    fn apply(&self, a: A, b: B, c: C) -> O {
        (self.0)(a, b, c)
    }
}
