//! Integration tests for Shape

use lazytensor::error::Error;
use lazytensor::shape;
use lazytensor::tensor::Shape;

#[test]
fn test_construction_forms_agree() {
    let s1 = shape![2, 3, 4];
    let s2 = Shape::from([2, 3, 4]);
    let s3 = Shape::from(vec![2, 3, 4]);
    let s4: Shape = [2usize, 3, 4].iter().copied().collect();

    assert_eq!(s1, s2);
    assert_eq!(s2, s3);
    assert_eq!(s3, s4);
    assert_eq!(s1.size(), 24);
}

#[test]
fn test_size_equals_product_of_extents() {
    for dims in [vec![1], vec![7], vec![2, 3], vec![4, 1, 5], vec![2, 3, 4, 5]] {
        let s = Shape::from(dims.clone());
        assert_eq!(s.size(), dims.iter().product::<usize>());
        assert_eq!(s.dim(0).unwrap(), dims[0]);
        assert_eq!(s.ndim(), dims.len());
    }
}

#[test]
fn test_macro_takes_usize_expressions() {
    let rows: usize = 4;
    let s = shape![rows, rows / 2, 1];
    assert_eq!(s, Shape::from([4, 2, 1]));
    assert_eq!(shape![usize::MAX].dim(0).unwrap(), usize::MAX);
}

#[test]
fn test_empty_shapes() {
    let s = shape![];
    assert_eq!(s.ndim(), 0);
    assert_eq!(s.size(), 0);
    assert!(matches!(s.dim(0), Err(Error::IndexOutOfBounds { .. })));

    let zero = shape![3, 0, 2];
    assert_eq!(zero.size(), 0);
    assert_eq!(zero.ndim(), 3);
}

#[test]
fn test_reassign() {
    let mut s = shape![2, 3, 4];
    assert_eq!(s.size(), 24);
    s = Shape::from([3, 4, 5]);
    assert_eq!(s, shape![3, 4, 5]);
    assert_eq!(s.dim(0).unwrap(), 3);
    assert_eq!(s.dim(1).unwrap(), 4);
    assert_eq!(s.dim(2).unwrap(), 5);
    assert_eq!(s.size_range(0, 3).unwrap(), 60);
    assert_eq!(s.size_range(1, 3).unwrap(), 20);

    s.set(Vec::<usize>::new());
    assert_eq!(s.ndim(), 0);
}

#[test]
fn test_iteration_and_display() {
    let s = shape![2, 3];
    let dims: Vec<usize> = s.iter().copied().collect();
    assert_eq!(dims, [2, 3]);
    assert_eq!(s.as_ref(), &[2, 3]);
    assert_eq!(format!("{s}"), "(2,3)");
    assert_eq!(format!("{}", shape![6]), "(6,)");
}
