//! Integration tests for lazy expression evaluation

mod common;

use common::{assert_allclose_f64, init_logging, iota};
use lazytensor::error::Error;
use lazytensor::expr::{
    BinaryOp, Expr, Plus, axpy, binary, identity, map1, map2, map3, negate, scalar,
};
use lazytensor::prelude::*;

/// User-defined operator, the larger of two values
#[derive(Clone, Copy)]
struct Maximum;

impl<T: PartialOrd + Copy> BinaryOp<T, T> for Maximum {
    type Output = T;

    fn apply(&self, a: T, b: T) -> T {
        if a > b { a } else { b }
    }
}

fn abc() -> (Tensor<i32>, Tensor<i32>, Tensor<i32>) {
    (
        Tensor::from_elements(&[1, 2, 3]).unwrap(),
        Tensor::from_elements(&[2, 3, 4]).unwrap(),
        Tensor::from_elements(&[3, 4, 5]).unwrap(),
    )
}

#[test]
fn test_scalar_times_tensor() {
    init_logging();
    let (a, _, _) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    let k = 3;
    d.assign(k * &a).unwrap();
    for i in 0..3 {
        assert_eq!(d.get(i).unwrap(), k * a.get(i).unwrap());
    }
}

#[test]
fn test_axpy() {
    let (a, b, c) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    d.assign(axpy(&a, &b, &c)).unwrap();
    for i in 0..3 {
        let expected = a.get(i).unwrap() * b.get(i).unwrap() + c.get(i).unwrap();
        assert_eq!(d.get(i).unwrap(), expected);
    }
    assert_eq!(d.as_slice(), &[5, 10, 17]);
}

#[test]
fn test_truncating_integer_division_and_modulo() {
    let (a, b, _) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    d.assign((&a / &b + 2) % &a).unwrap();
    assert_eq!(d.get(0).unwrap(), 0);
    for i in 0..3 {
        let (x, y) = (a.get(i).unwrap(), b.get(i).unwrap());
        assert_eq!(d.get(i).unwrap(), (x / y + 2) % x);
    }
}

#[test]
fn test_user_operator_in_tree() {
    let (a, b, c) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    d.assign((identity(&b) / binary(Maximum, &c, &b) + 2) % &a)
        .unwrap();
    for i in 0..3 {
        let (x, y, z) = (a.get(i).unwrap(), b.get(i).unwrap(), c.get(i).unwrap());
        assert_eq!(d.get(i).unwrap(), (y / z.max(y) + 2) % x);
    }
}

#[test]
fn test_closure_operators() {
    let (a, b, c) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    d.assign(map1(|x: i32| x * x, &a)).unwrap();
    assert_eq!(d.as_slice(), &[1, 4, 9]);

    d.assign(map2(|x: i32, y: i32| x.min(y), &c, 4)).unwrap();
    assert_eq!(d.as_slice(), &[3, 4, 4]);

    d.assign(map3(|x: i32, lo: i32, hi: i32| x.clamp(lo, hi), &b, 3, &c))
        .unwrap();
    assert_eq!(d.as_slice(), &[3, 3, 4]);
}

#[test]
fn test_negation_and_subtraction() {
    let (a, b, _) = abc();
    let mut d = Tensor::<i32>::new([3]).unwrap();

    d.assign(-&a).unwrap();
    assert_eq!(d.as_slice(), &[-1, -2, -3]);

    d.assign(negate(&a - &b)).unwrap();
    assert_eq!(d.as_slice(), &[1, 1, 1]);

    d.assign(10 - &a).unwrap();
    assert_eq!(d.as_slice(), &[9, 8, 7]);
}

#[test]
fn test_scalar_assignment() {
    let mut d = Tensor::<i32>::new([2, 2]).unwrap();
    d.assign(-1).unwrap();
    assert_eq!(d.as_slice(), &[-1, -1, -1, -1]);

    d.assign(scalar(7)).unwrap();
    assert_eq!(d.as_slice(), &[7, 7, 7, 7]);
}

#[test]
fn test_float_expression() {
    let x: Tensor<f64> = iota([2, 3]);
    let y = Tensor::<f64>::from_slice(&[0.5; 6], [2, 3]).unwrap();
    let mut out = Tensor::<f64>::new([2, 3]).unwrap();

    out.assign(2.0 * &x * &y - 1.0 / (&y + 1.5)).unwrap();
    let expected: Vec<f64> = (0..6).map(|i| i as f64 - 0.5).collect();
    assert_allclose_f64(out.as_slice(), &expected, 1e-12, 1e-12, "2xy - 1/(y+1.5)");

    out.assign(&x % 4.0).unwrap();
    assert_eq!(out.as_slice(), &[0.0, 1.0, 2.0, 3.0, 0.0, 1.0]);
}

#[test]
fn test_result_type_inferred_from_operator() {
    let (a, _, _) = abc();
    let mut halves = Tensor::<f64>::new([3]).unwrap();
    halves.assign(map1(|x: i32| f64::from(x) / 2.0, &a)).unwrap();
    assert_eq!(halves.as_slice(), &[0.5, 1.0, 1.5]);
}

#[test]
fn test_expression_is_inert_until_assigned() {
    let (a, b, _) = abc();
    let e = binary(Plus, &a, &b);
    // evaluation by hand, nothing was written anywhere
    assert_eq!(e.eval_at(2), 7);
    assert_eq!(a.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_mismatched_leaves_rejected_before_writing() {
    let (a, _, _) = abc();
    let long: Tensor<i32> = iota([4]);
    let mut d = Tensor::<i32>::from_elements(&[9, 9, 9]).unwrap();

    let err = d.assign(&a + &long).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert_eq!(d.as_slice(), &[9, 9, 9]);

    let err = d.assign(axpy(2, &long, 1)).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn test_recompute_from_self() {
    let mut b = Tensor::<i32>::from_elements(&[2, 3, 4, 5, 6, 7]).unwrap();
    b.set(3, -1).unwrap();
    b = Tensor::from_expr(b.shape(), &b * 3).unwrap();
    assert_eq!(b.as_slice(), &[6, 9, 12, -3, 18, 21]);
}
