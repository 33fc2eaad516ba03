//! Runtime backends for tensor storage
//!
//! This module defines the `Runtime` trait and provides implementations
//! for the host (CPU) and, behind the `cuda` feature, NVIDIA accelerators.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity, allocation and same-device copies)
//! ├── Device (identifies a specific GPU/CPU)
//! └── Transfer<Src> (copy path from another runtime, one impl per pair)
//! ```

mod traits;

pub mod cpu;

#[cfg(feature = "cuda")]
pub mod cuda;

pub use traits::{Device, Runtime, Transfer};
