//! Lazy elementwise expressions
//!
//! Arithmetic on tensors does not compute anything. `&a * &b + 2` builds a
//! small tree of nodes that borrow their leaves:
//!
//! ```text
//! Binary<Plus>
//! ├── Binary<Mul>
//! │   ├── &a
//! │   └── &b
//! └── Scalar(2)
//! ```
//!
//! The tree is only evaluated when a tensor assigns from it
//! ([`Tensor::assign`](crate::tensor::Tensor::assign)), which pulls one flat
//! index at a time through the whole tree. No intermediate buffer exists
//! between chained operations.
//!
//! Every leaf reached by one expression must hold the same number of
//! elements. Evaluation applies index `i` to each of them and does not
//! broadcast; `assign` checks the counts before the first element is written.

mod ops;
mod overload;

pub use ops::{
    Axpy, BinaryOp, Div, Func, Identity, Minus, Mod, Mul, Negate, Plus, TernaryOp, UnaryOp,
};

use crate::error::Result;

/// A value that can produce an element for every flat index
///
/// Implemented by [`Scalar`], the composite nodes and host tensors. Nodes are
/// ephemeral: they borrow their leaves and live for one assignment.
pub trait Expr {
    /// Element type produced by this expression
    type Output: Copy;

    /// Value at flat index `index`
    ///
    /// `index` must be below the element count of every leaf; [`Expr::check_numel`]
    /// verifies that up front.
    fn eval_at(&self, index: usize) -> Self::Output;

    /// Verify that every leaf holds exactly `expected` elements
    ///
    /// Scalars have no element count and always pass.
    fn check_numel(&self, expected: usize) -> Result<()>;
}

impl<E: Expr + ?Sized> Expr for &E {
    type Output = E::Output;

    #[inline]
    fn eval_at(&self, index: usize) -> Self::Output {
        (**self).eval_at(index)
    }

    fn check_numel(&self, expected: usize) -> Result<()> {
        (**self).check_numel(expected)
    }
}

/// Conversion into an expression operand
///
/// Every [`Expr`] converts to itself; primitive numbers convert to a
/// [`Scalar`] node, which lets them mix with tensors: `&t + 3`, `2.0 * &t`.
pub trait IntoExpr {
    /// Resulting expression type
    type Expr: Expr;

    /// Perform the conversion
    fn into_expr(self) -> Self::Expr;
}

impl<E: Expr> IntoExpr for E {
    type Expr = E;

    #[inline]
    fn into_expr(self) -> E {
        self
    }
}

macro_rules! impl_into_expr_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpr for $ty {
                type Expr = Scalar<$ty>;

                #[inline]
                fn into_expr(self) -> Scalar<$ty> {
                    Scalar(self)
                }
            }
        )*
    };
}

impl_into_expr_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[cfg(feature = "f16")]
impl_into_expr_scalar!(half::f16, half::bf16);

/// A single value, repeated at every index
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scalar<T>(pub T);

impl<T: Copy> Expr for Scalar<T> {
    type Output = T;

    #[inline]
    fn eval_at(&self, _index: usize) -> T {
        self.0
    }

    fn check_numel(&self, _expected: usize) -> Result<()> {
        Ok(())
    }
}

/// `op(expr)`
#[derive(Clone, Copy, Debug)]
pub struct Unary<O, E> {
    op: O,
    expr: E,
}

impl<O, E> Unary<O, E> {
    /// Create a unary node
    pub fn new(op: O, expr: E) -> Self {
        Self { op, expr }
    }
}

impl<O, E> Expr for Unary<O, E>
where
    E: Expr,
    O: UnaryOp<E::Output>,
{
    type Output = O::Output;

    #[inline]
    fn eval_at(&self, index: usize) -> Self::Output {
        self.op.apply(self.expr.eval_at(index))
    }

    fn check_numel(&self, expected: usize) -> Result<()> {
        self.expr.check_numel(expected)
    }
}

/// `op(lhs, rhs)`
#[derive(Clone, Copy, Debug)]
pub struct Binary<O, L, R> {
    op: O,
    lhs: L,
    rhs: R,
}

impl<O, L, R> Binary<O, L, R> {
    /// Create a binary node
    pub fn new(op: O, lhs: L, rhs: R) -> Self {
        Self { op, lhs, rhs }
    }
}

impl<O, L, R> Expr for Binary<O, L, R>
where
    L: Expr,
    R: Expr,
    O: BinaryOp<L::Output, R::Output>,
{
    type Output = O::Output;

    #[inline]
    fn eval_at(&self, index: usize) -> Self::Output {
        self.op
            .apply(self.lhs.eval_at(index), self.rhs.eval_at(index))
    }

    fn check_numel(&self, expected: usize) -> Result<()> {
        self.lhs.check_numel(expected)?;
        self.rhs.check_numel(expected)
    }
}

/// `op(a, b, c)`
#[derive(Clone, Copy, Debug)]
pub struct Ternary<O, A, B, C> {
    op: O,
    a: A,
    b: B,
    c: C,
}

impl<O, A, B, C> Ternary<O, A, B, C> {
    /// Create a ternary node
    pub fn new(op: O, a: A, b: B, c: C) -> Self {
        Self { op, a, b, c }
    }
}

impl<O, A, B, C> Expr for Ternary<O, A, B, C>
where
    A: Expr,
    B: Expr,
    C: Expr,
    O: TernaryOp<A::Output, B::Output, C::Output>,
{
    type Output = O::Output;

    #[inline]
    fn eval_at(&self, index: usize) -> Self::Output {
        self.op.apply(
            self.a.eval_at(index),
            self.b.eval_at(index),
            self.c.eval_at(index),
        )
    }

    fn check_numel(&self, expected: usize) -> Result<()> {
        self.a.check_numel(expected)?;
        self.b.check_numel(expected)?;
        self.c.check_numel(expected)
    }
}

/// Wrap a value as a [`Scalar`] node
pub fn scalar<T: Copy>(value: T) -> Scalar<T> {
    Scalar(value)
}

/// Apply a unary operator to an operand
pub fn unary<O, E: IntoExpr>(op: O, expr: E) -> Unary<O, E::Expr> {
    Unary::new(op, expr.into_expr())
}

/// Apply a binary operator to two operands
///
/// Every arithmetic operator overload (`+ - * / %`) builds its node here.
pub fn binary<O, L: IntoExpr, R: IntoExpr>(op: O, lhs: L, rhs: R) -> Binary<O, L::Expr, R::Expr> {
    Binary::new(op, lhs.into_expr(), rhs.into_expr())
}

/// Apply a ternary operator to three operands
pub fn ternary<O, A: IntoExpr, B: IntoExpr, C: IntoExpr>(
    op: O,
    a: A,
    b: B,
    c: C,
) -> Ternary<O, A::Expr, B::Expr, C::Expr> {
    Ternary::new(op, a.into_expr(), b.into_expr(), c.into_expr())
}

/// Map a closure over one operand
pub fn map1<F, E: IntoExpr>(f: F, expr: E) -> Unary<Func<F>, E::Expr> {
    unary(Func(f), expr)
}

/// Map a closure over two operands
pub fn map2<F, L: IntoExpr, R: IntoExpr>(f: F, lhs: L, rhs: R) -> Binary<Func<F>, L::Expr, R::Expr> {
    binary(Func(f), lhs, rhs)
}

/// Map a closure over three operands
pub fn map3<F, A: IntoExpr, B: IntoExpr, C: IntoExpr>(
    f: F,
    a: A,
    b: B,
    c: C,
) -> Ternary<Func<F>, A::Expr, B::Expr, C::Expr> {
    ternary(Func(f), a, b, c)
}

/// `expr` unchanged
pub fn identity<E: IntoExpr>(expr: E) -> Unary<Identity, E::Expr> {
    unary(Identity, expr)
}

/// `-expr`
pub fn negate<E: IntoExpr>(expr: E) -> Unary<Negate, E::Expr> {
    unary(Negate, expr)
}

/// `a * x + y`
pub fn axpy<A: IntoExpr, X: IntoExpr, Y: IntoExpr>(
    a: A,
    x: X,
    y: Y,
) -> Ternary<Axpy, A::Expr, X::Expr, Y::Expr> {
    ternary(Axpy, a, x, y)
}
