//! Common test utilities
#![allow(dead_code)]

use lazytensor::dtype::Element;
#[cfg(feature = "cuda")]
use lazytensor::runtime::cuda::CudaDevice;
use lazytensor::tensor::{Shape, Tensor};

/// Route `log` output through the test harness (set `RUST_LOG` to see it)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host tensor holding `0, 1, 2, ...` in flat order
pub fn iota<T: Element>(shape: impl Into<Shape>) -> Tensor<T> {
    let shape = shape.into();
    let data: Vec<T> = (0..shape.size()).map(|i| T::from_f64(i as f64)).collect();
    Tensor::from_slice(&data, shape).unwrap()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Create a CUDA device, returning None if CUDA is unavailable
#[cfg(feature = "cuda")]
pub fn create_cuda_device() -> Option<CudaDevice> {
    if !lazytensor::runtime::cuda::is_cuda_available() {
        return None;
    }
    Some(CudaDevice::new(0))
}
