//! GPU texture resource.

use crate::backend::{GpuBackend, GpuTexture};
use crate::error::GraphicsError;
use crate::types::{Extent3d, TextureDescriptor, TextureFormat};

/// A GPU texture resource.
///
/// Textures pair the descriptor they were created from with the backend
/// handle, and are usually shared as `Arc<Texture>`.
///
/// # Example
///
/// ```ignore
/// let texture = Texture::create(&backend, TextureDescriptor::new_2d(
///     1, 256,
///     TextureFormat::Rgba8Unorm,
///     TextureUsage::TEXTURE_BINDING | TextureUsage::COPY_DST,
/// ))?;
/// println!("Texture size: {}x{}", texture.width(), texture.height());
/// ```
pub struct Texture {
    descriptor: TextureDescriptor,
    gpu: GpuTexture,
}

impl Texture {
    /// Create the texture on `backend`.
    pub fn create(
        backend: &dyn GpuBackend,
        descriptor: TextureDescriptor,
    ) -> Result<Self, GraphicsError> {
        let gpu = backend.create_texture(&descriptor)?;
        Ok(Self { descriptor, gpu })
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the backend handle.
    pub fn gpu_handle(&self) -> &GpuTexture {
        &self.gpu
    }

    /// Get the texture size.
    pub fn size(&self) -> Extent3d {
        self.descriptor.size
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.size.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.size.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Texture is Send + Sync
static_assertions::assert_impl_all!(Texture: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;
    use crate::types::TextureUsage;

    #[test]
    fn test_texture_debug() {
        let desc = TextureDescriptor::new_2d(
            2,
            256,
            TextureFormat::Rgba8Unorm,
            TextureUsage::TEXTURE_BINDING,
        )
        .with_label("params");
        let texture = Texture::create(&DummyBackend::new(), desc).unwrap();
        let debug = format!("{:?}", texture);
        assert!(debug.contains("Texture"));
        assert!(debug.contains("256"));
        assert_eq!(texture.label(), Some("params"));
    }

    #[test]
    fn test_texture_dimensions() {
        let desc = TextureDescriptor::new_2d(
            1,
            512,
            TextureFormat::Rgba32Float,
            TextureUsage::TEXTURE_BINDING,
        );
        let texture = Texture::create(&DummyBackend::new(), desc).unwrap();
        assert_eq!(texture.width(), 1);
        assert_eq!(texture.height(), 512);
        assert_eq!(texture.size().depth, 1);
        assert_eq!(texture.format(), TextureFormat::Rgba32Float);
        assert!(matches!(texture.gpu_handle(), GpuTexture::Dummy { id: 1 }));
    }
}
