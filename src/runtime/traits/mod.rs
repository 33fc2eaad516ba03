//! Runtime traits for compute backend abstraction

pub mod device;
pub mod runtime;
pub mod transfer;

pub use device::Device;
pub use runtime::Runtime;
pub use transfer::Transfer;
