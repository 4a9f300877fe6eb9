//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It hands out texture
//! ids and records every texture write so tests can inspect what would have
//! reached the GPU.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use uifx_core::params::DEFAULT_MAX_ROWS;

use crate::error::GraphicsError;
use crate::types::{Extent3d, Origin3d, TextureDescriptor};

use super::{GpuBackend, GpuTexture};

/// A texture write captured by [`DummyBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureWrite {
    /// Id of the written texture.
    pub texture_id: u64,
    /// Destination offset.
    pub origin: Origin3d,
    /// Size of the written region.
    pub size: Extent3d,
    /// Written bytes.
    pub data: Vec<u8>,
}

/// Dummy GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    next_texture_id: AtomicU64,
    writes: Mutex<Vec<TextureWrite>>,
    max_texture_dimension: u32,
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self {
            next_texture_id: AtomicU64::new(0),
            writes: Mutex::new(Vec::new()),
            max_texture_dimension: DEFAULT_MAX_ROWS,
        }
    }
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate a device with a smaller 2D texture limit.
    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }

    /// Number of textures created so far.
    pub fn textures_created(&self) -> u64 {
        self.next_texture_id.load(Ordering::Acquire)
    }

    /// All texture writes recorded so far.
    pub fn writes(&self) -> Vec<TextureWrite> {
        self.writes.lock().clone()
    }

    /// Drain the recorded texture writes.
    pub fn take_writes(&self) -> Vec<TextureWrite> {
        std::mem::take(&mut *self.writes.lock())
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<GpuTexture, GraphicsError> {
        let max = self.max_texture_dimension;
        if descriptor.size.width > max || descriptor.size.height > max {
            return Err(GraphicsError::ResourceCreationFailed(format!(
                "texture {}x{} exceeds device limit {}",
                descriptor.size.width, descriptor.size.height, max
            )));
        }

        let id = self.next_texture_id.fetch_add(1, Ordering::AcqRel) + 1;
        log::trace!(
            "DummyBackend: creating texture {:?} ({}x{}) as #{}",
            descriptor.label,
            descriptor.size.width,
            descriptor.size.height,
            id
        );
        Ok(GpuTexture::Dummy { id })
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        descriptor: &TextureDescriptor,
        origin: Origin3d,
        size: Extent3d,
        data: &[u8],
    ) -> Result<(), GraphicsError> {
        #[allow(irrefutable_let_patterns)]
        let GpuTexture::Dummy { id } = texture else {
            return Err(GraphicsError::Internal(
                "write_texture called with non-Dummy texture".to_string(),
            ));
        };

        let expected = size.texel_count() * descriptor.format.block_size() as u64;
        if data.len() as u64 != expected {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture write of {} bytes does not match region of {} bytes",
                data.len(),
                expected
            )));
        }
        if origin.y + size.height > descriptor.size.height
            || origin.x + size.width > descriptor.size.width
        {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture write {:?}+{:?} exceeds texture size {:?}",
                origin, size, descriptor.size
            )));
        }

        log::trace!(
            "DummyBackend: write_texture #{} at row {} ({}x{}) len={}",
            id,
            origin.y,
            size.width,
            size.height,
            data.len()
        );
        self.writes.lock().push(TextureWrite {
            texture_id: *id,
            origin,
            size,
            data: data.to_vec(),
        });
        Ok(())
    }
}
