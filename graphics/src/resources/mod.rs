//! GPU resources.
//!
//! - [`Texture`] - GPU texture created through a [`GpuBackend`]
//!
//! Resources are reference-counted with [`Arc`] and can be shared across
//! threads. Materials compare bindings by `Arc` pointer.
//!
//! [`GpuBackend`]: crate::backend::GpuBackend
//! [`Arc`]: std::sync::Arc

mod texture;

pub use texture::Texture;
