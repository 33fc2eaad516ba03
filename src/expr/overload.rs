//! Arithmetic operator overloads for expression operands
//!
//! Each overload is a thin wrapper over [`binary`] or [`unary`] with the
//! matching catalog operator. Rust wants one impl per self type, so the impls
//! are stamped out by macro for borrowed tensors, every node type and, with
//! the scalar on the left, every primitive number type.

use super::{
    Binary, Div, Expr, IntoExpr, Minus, Mod, Mul, Negate, Plus, Scalar, Ternary, Unary, binary,
    unary,
};
use crate::dtype::Element;
use crate::tensor::Tensor;

/// `lhs <op> rhs` where `lhs` is an expression operand
macro_rules! expr_binary_op {
    ([$($gen:tt)*] $lhs:ty, $trait:ident, $method:ident, $op:ident) => {
        impl<$($gen)*, Rhs: IntoExpr> std::ops::$trait<Rhs> for $lhs
        where
            Self: Expr,
        {
            type Output = Binary<$op, Self, Rhs::Expr>;

            #[inline]
            fn $method(self, rhs: Rhs) -> Self::Output {
                binary($op, self, rhs)
            }
        }
    };
}

/// The full `+ - * / %` family plus unary `-` for one operand type
macro_rules! expr_ops {
    ([$($gen:tt)*] $ty:ty) => {
        expr_binary_op!([$($gen)*] $ty, Add, add, Plus);
        expr_binary_op!([$($gen)*] $ty, Sub, sub, Minus);
        expr_binary_op!([$($gen)*] $ty, Mul, mul, Mul);
        expr_binary_op!([$($gen)*] $ty, Div, div, Div);
        expr_binary_op!([$($gen)*] $ty, Rem, rem, Mod);

        impl<$($gen)*> std::ops::Neg for $ty
        where
            Self: Expr,
        {
            type Output = Unary<Negate, Self>;

            #[inline]
            fn neg(self) -> Self::Output {
                unary(Negate, self)
            }
        }
    };
}

expr_ops!(['a, T: Element] &'a Tensor<T>);
expr_ops!([T] Scalar<T>);
expr_ops!([O, E] Unary<O, E>);
expr_ops!([O, L, R] Binary<O, L, R>);
expr_ops!([O, A, B, C] Ternary<O, A, B, C>);

/// `scalar <op> rhs` for one primitive and one operand type
macro_rules! scalar_binary_op {
    ($s:ty, [$($gen:tt)*] $rhs:ty, $trait:ident, $method:ident, $op:ident) => {
        impl<$($gen)*> std::ops::$trait<$rhs> for $s
        where
            $rhs: Expr,
        {
            type Output = Binary<$op, Scalar<$s>, $rhs>;

            #[inline]
            fn $method(self, rhs: $rhs) -> Self::Output {
                binary($op, self, rhs)
            }
        }
    };
}

macro_rules! scalar_ops_rhs {
    ($s:ty, [$($gen:tt)*] $rhs:ty) => {
        scalar_binary_op!($s, [$($gen)*] $rhs, Add, add, Plus);
        scalar_binary_op!($s, [$($gen)*] $rhs, Sub, sub, Minus);
        scalar_binary_op!($s, [$($gen)*] $rhs, Mul, mul, Mul);
        scalar_binary_op!($s, [$($gen)*] $rhs, Div, div, Div);
        scalar_binary_op!($s, [$($gen)*] $rhs, Rem, rem, Mod);
    };
}

macro_rules! scalar_ops {
    ($($s:ty),* $(,)?) => {
        $(
            scalar_ops_rhs!($s, ['a, T: Element] &'a Tensor<T>);
            scalar_ops_rhs!($s, [U] Scalar<U>);
            scalar_ops_rhs!($s, [O, E] Unary<O, E>);
            scalar_ops_rhs!($s, [O, L, R] Binary<O, L, R>);
            scalar_ops_rhs!($s, [O, A, B, C] Ternary<O, A, B, C>);
        )*
    };
}

scalar_ops!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[cfg(feature = "f16")]
scalar_ops!(half::f16, half::bf16);
