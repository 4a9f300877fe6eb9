//! GPU backend abstraction layer.
//!
//! This module provides a trait-based abstraction over the GPU API that
//! receives parameter textures.
//!
//! # Available Backends
//!
//! - Dummy (always available): Records texture creation and uploads, for testing
//! - `wgpu-backend`: Cross-platform backend using wgpu
//!
//! # Architecture
//!
//! Each backend implements the [`GpuBackend`] trait, which provides texture
//! creation, sub-region texture writes and the device texture limit.

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_backend;

pub mod dummy;

use std::sync::Arc;

use crate::error::GraphicsError;
use crate::types::{Extent3d, Origin3d, TextureDescriptor};

pub use dummy::{DummyBackend, TextureWrite};
#[cfg(feature = "wgpu-backend")]
pub use wgpu_backend::WgpuBackend;

/// Handle to a GPU texture resource.
#[allow(clippy::large_enum_variant)]
pub enum GpuTexture {
    /// Dummy backend texture, identified by a backend-unique id.
    Dummy {
        /// Identifier assigned by the creating [`DummyBackend`].
        id: u64,
    },
    /// wgpu backend texture
    #[cfg(feature = "wgpu-backend")]
    Wgpu {
        texture: Arc<wgpu::Texture>,
        view: Arc<wgpu::TextureView>,
    },
}

impl std::fmt::Debug for GpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dummy { id } => f.debug_struct("GpuTexture::Dummy").field("id", id).finish(),
            #[cfg(feature = "wgpu-backend")]
            Self::Wgpu { texture, view } => f
                .debug_struct("GpuTexture::Wgpu")
                .field("texture", texture)
                .field("view", view)
                .finish(),
        }
    }
}

impl Clone for GpuTexture {
    fn clone(&self) -> Self {
        match self {
            Self::Dummy { id } => Self::Dummy { id: *id },
            #[cfg(feature = "wgpu-backend")]
            Self::Wgpu { texture, view } => Self::Wgpu {
                texture: texture.clone(),
                view: view.clone(),
            },
        }
    }
}

/// GPU backend trait for abstracting different GPU APIs.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Largest width or height of a 2D texture the device accepts.
    fn max_texture_dimension(&self) -> u32;

    /// Create a texture resource.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<GpuTexture, GraphicsError>;

    /// Write tightly packed texel data into a sub-region of a texture.
    ///
    /// `data` holds `size.height` rows of `size.width * block_size` bytes.
    fn write_texture(
        &self,
        texture: &GpuTexture,
        descriptor: &TextureDescriptor,
        origin: Origin3d,
        size: Extent3d,
        data: &[u8],
    ) -> Result<(), GraphicsError>;
}

/// Which backend [`create_backend_of`] should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendType {
    /// Use the best available backend, falling back to the dummy backend.
    #[default]
    Auto,
    /// Always use the dummy backend.
    Dummy,
    /// Require the wgpu backend.
    Wgpu,
}

/// Create the best available backend.
pub fn create_backend() -> Arc<dyn GpuBackend> {
    match create_backend_of(BackendType::Auto) {
        Ok(backend) => backend,
        Err(e) => {
            log::warn!("Backend selection failed: {}", e);
            Arc::new(DummyBackend::new())
        }
    }
}

/// Create a backend of the requested type.
pub fn create_backend_of(backend_type: BackendType) -> Result<Arc<dyn GpuBackend>, GraphicsError> {
    match backend_type {
        BackendType::Dummy => {
            log::info!("Using dummy backend");
            Ok(Arc::new(DummyBackend::new()))
        }
        BackendType::Wgpu => {
            #[cfg(feature = "wgpu-backend")]
            {
                let backend = WgpuBackend::new()?;
                log::info!("Using wgpu backend");
                Ok(Arc::new(backend))
            }
            #[cfg(not(feature = "wgpu-backend"))]
            {
                Err(GraphicsError::InitializationFailed(
                    "wgpu backend not compiled in".to_string(),
                ))
            }
        }
        BackendType::Auto => {
            #[cfg(feature = "wgpu-backend")]
            {
                match WgpuBackend::new() {
                    Ok(backend) => {
                        log::info!("Using wgpu backend");
                        return Ok(Arc::new(backend));
                    }
                    Err(e) => {
                        log::warn!("Failed to create wgpu backend: {}", e);
                    }
                }
            }

            // Fall back to dummy backend
            log::info!("Using dummy backend");
            Ok(Arc::new(DummyBackend::new()))
        }
    }
}
