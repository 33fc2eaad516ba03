//! Error types for lazytensor

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using lazytensor's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lazytensor operations
///
/// Every variant is a programmer error surfaced at the call that caused it.
/// Nothing is retried; the operation that failed leaves its target unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// Element counts or shapes disagree (reshape, assignment, dot, construction)
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Element type of a buffer differs from the one requested
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Element type of the buffer
        expected: DType,
        /// Element type requested
        got: DType,
    },

    /// Dimension or flat element index out of range
    #[error("Index {index} out of bounds for size {size}")]
    IndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Number of valid positions
        size: usize,
    },

    /// A `[start, end)` range is empty, reversed or exceeds its extent
    #[error("Invalid range {start}..{end} for extent {size}")]
    InvalidRange {
        /// Range start
        start: usize,
        /// Range end (exclusive)
        end: usize,
        /// Extent the range must fit in
        size: usize,
    },

    /// Device allocation failed
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// A device primitive failed for a reason other than exhaustion
    #[error("Backend error: {0}")]
    Backend(String),

    /// CUDA driver error
    #[cfg(feature = "cuda")]
    #[error("CUDA error: {0}")]
    Cuda(#[from] cudarc::driver::DriverError),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Fail unless `got` equals `expected`
    pub fn check_dtype(expected: DType, got: DType) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::DTypeMismatch { expected, got })
        }
    }

    /// Create an index error
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Create an invalid range error
    pub fn invalid_range(start: usize, end: usize, size: usize) -> Self {
        Self::InvalidRange { start, end, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::shape_mismatch(&[2, 3], &[4]);
        assert_eq!(err.to_string(), "Shape mismatch: expected [2, 3], got [4]");

        let err = Error::invalid_range(3, 1, 4);
        assert_eq!(err.to_string(), "Invalid range 3..1 for extent 4");

        let err = Error::check_dtype(DType::U8, DType::U64).unwrap_err();
        assert_eq!(err.to_string(), "DType mismatch: expected u8, got u64");
        assert!(Error::check_dtype(DType::F32, DType::F32).is_ok());

        let err = Error::OutOfMemory { size: 64 };
        assert_eq!(err.to_string(), "Out of memory: failed to allocate 64 bytes");
    }
}
