//! CUDA device implementation

use crate::runtime::Device;

/// CUDA device, identified by its ordinal (0, 1, 2, ...)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CudaDevice {
    pub(crate) index: usize,
}

impl CudaDevice {
    /// Create a handle for the GPU with the given ordinal
    ///
    /// No driver call is made until memory is first allocated on it.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Ordinal of this GPU
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Device for CudaDevice {
    fn id(&self) -> usize {
        self.index
    }

    fn name(&self) -> String {
        "cuda".to_string()
    }
}
