//! Per-device context and stream cache

use super::device::CudaDevice;
use crate::error::Result;
use cudarc::driver::safe::{CudaContext, CudaStream};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Context and stream used for every primitive on one device
#[derive(Clone)]
pub(super) struct CudaHandle {
    pub(super) context: Arc<CudaContext>,
    pub(super) stream: Arc<CudaStream>,
}

/// Device index -> cached handle
static HANDLES: OnceLock<Mutex<HashMap<usize, CudaHandle>>> = OnceLock::new();

/// Get or create the handle for a device and bind its context to this thread.
pub(super) fn handle(device: &CudaDevice) -> Result<CudaHandle> {
    let cache = HANDLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock();

    let handle = match guard.get(&device.index) {
        Some(handle) => handle.clone(),
        None => {
            let context = CudaContext::new(device.index)?;
            let stream = context.new_stream()?;
            log::debug!("cuda: created context and stream for device {}", device.index);

            let handle = CudaHandle { context, stream };
            guard.insert(device.index, handle.clone());
            handle
        }
    };
    drop(guard);

    handle.context.bind_to_thread()?;
    Ok(handle)
}

