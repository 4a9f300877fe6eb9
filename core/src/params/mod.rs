//! Shared effect parameters.
//!
//! Provides [`ParameterAllocator`], which assigns every active effect instance
//! a row of a shared [`ParameterBuffer`], along with its configuration and
//! error types.

mod allocator;
mod buffer;
mod config;
mod error;
mod instance;

pub use allocator::{FlushResult, ParameterAllocator, Slot, UpdatedRegion};
pub use buffer::ParameterBuffer;
pub use config::{AllocatorConfig, CHANNELS_PER_TEXEL, DEFAULT_MAX_ROWS, GrowthPolicy};
pub use error::ParameterError;
pub use instance::InstanceId;
