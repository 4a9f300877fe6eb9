//! GPU-backed parameter texture.
//!
//! [`ParameterTexture`] owns a [`ParameterAllocator`] and mirrors its buffer
//! into a 2D texture. Each row is one effect instance; each texel holds four
//! channels. Materials registered with it have their parameter property bound
//! to the current texture and are rebound whenever the texture is recreated.

use std::sync::{Arc, Weak};

use uifx_core::params::{AllocatorConfig, FlushResult, ParameterAllocator, UpdatedRegion};

use crate::backend::GpuBackend;
use crate::error::GraphicsError;
use crate::materials::MaterialInstance;
use crate::resources::Texture;
use crate::types::{Extent3d, Origin3d, TextureDescriptor, TextureFormat, TextureUsage};

/// Default material property the parameter texture is bound to.
pub const PARAM_TEX_PROPERTY: &str = "_ParamTex";

/// Parameter allocator plus its backing texture and bound materials.
pub struct ParameterTexture {
    allocator: ParameterAllocator,
    format: TextureFormat,
    property_name: String,
    texture: Option<Arc<Texture>>,
    materials: Vec<Weak<MaterialInstance>>,
    /// The texture no longer matches the allocator size.
    needs_recreate: bool,
    /// Flushed rows not yet written to the texture.
    pending: Option<UpdatedRegion>,
}

impl ParameterTexture {
    /// Create a parameter texture. The GPU texture is created on first upload.
    pub fn new(config: AllocatorConfig, format: TextureFormat) -> Result<Self, GraphicsError> {
        Ok(Self::from_allocator(ParameterAllocator::new(config)?, format))
    }

    /// Wrap an existing allocator.
    pub fn from_allocator(allocator: ParameterAllocator, format: TextureFormat) -> Self {
        Self {
            allocator,
            format,
            property_name: PARAM_TEX_PROPERTY.to_string(),
            texture: None,
            materials: Vec::new(),
            needs_recreate: true,
            pending: None,
        }
    }

    /// Bind to a different material property.
    pub fn with_property_name(mut self, name: impl Into<String>) -> Self {
        self.property_name = name.into();
        self
    }

    /// Get the allocator.
    pub fn allocator(&self) -> &ParameterAllocator {
        &self.allocator
    }

    /// Get the allocator mutably.
    pub fn allocator_mut(&mut self) -> &mut ParameterAllocator {
        &mut self.allocator
    }

    /// Get the texel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Get the bound material property name.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Get the current backing texture, if one has been uploaded.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    /// Number of live registered materials.
    pub fn material_count(&self) -> usize {
        self.materials.iter().filter(|m| m.strong_count() > 0).count()
    }

    /// Register a material so its parameter property follows the texture.
    ///
    /// Registering the same instance twice is a no-op. If no texture exists
    /// yet, the binding happens on the next [`upload`](Self::upload).
    pub fn register_material(&mut self, material: &Arc<MaterialInstance>) {
        self.materials.retain(|m| m.strong_count() > 0);

        let weak = Arc::downgrade(material);
        if self.materials.iter().any(|m| Weak::ptr_eq(m, &weak)) {
            return;
        }
        self.materials.push(weak);

        if let Some(texture) = &self.texture {
            material.set_texture(&self.property_name, texture.clone());
        }
    }

    /// Cap allocator growth at the backend's texture limit.
    ///
    /// Called by [`upload`](Self::upload); hosts may call it earlier so
    /// that slot requests fail before a texture would be too large.
    pub fn fit_to_backend(&mut self, backend: &dyn GpuBackend) -> Result<(), GraphicsError> {
        let max = backend.max_texture_dimension();
        let width = self.allocator.texels_per_row();
        if width > max as usize {
            return Err(GraphicsError::InvalidParameter(format!(
                "parameter rows of {} texels exceed device limit {}",
                width, max
            )));
        }
        self.allocator.limit_max_rows(max)?;
        Ok(())
    }

    /// Commit pending parameter writes to the GPU.
    ///
    /// Creates the texture when it is missing or the allocator grew, rebinding
    /// every registered material, then writes the rows that changed. If the
    /// backend fails, the work stays pending and the next call retries it.
    ///
    /// The returned [`FlushResult`] describes what reached the GPU in this
    /// call: `resized` is set when a texture was created.
    pub fn upload(&mut self, backend: &dyn GpuBackend) -> Result<FlushResult, GraphicsError> {
        self.fit_to_backend(backend)?;

        let flushed = self.allocator.flush();
        if flushed.resized {
            self.needs_recreate = true;
        }
        if let Some(region) = flushed.region {
            self.pending = Some(match self.pending {
                Some(pending) => pending.union(region),
                None => region,
            });
        }

        let recreated = self.needs_recreate || self.texture.is_none();
        if recreated {
            self.recreate_texture(backend)?;
        }

        let mut result = FlushResult {
            resized: recreated,
            ..FlushResult::default()
        };
        if let (Some(texture), Some(region)) = (self.texture.clone(), self.pending) {
            self.write_region(backend, &texture, region)?;
            self.pending = None;
            result.requires_upload = true;
            result.region = Some(region);
        }
        Ok(result)
    }

    /// Encode the whole buffer as texel bytes, row-major.
    pub fn encode_texels(&self) -> Vec<u8> {
        self.encode_rows(UpdatedRegion {
            first_row: 0,
            row_count: self.allocator.rows(),
        })
    }

    fn encode_rows(&self, region: UpdatedRegion) -> Vec<u8> {
        let width = self.allocator.channels_per_row();
        let start = region.first_row as usize * width;
        let end = region.end_row() as usize * width;
        let values = &self.allocator.buffer().as_slice()[start..end];

        match self.format {
            TextureFormat::Rgba8Unorm => values
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8)
                .collect(),
            TextureFormat::Rgba32Float => bytemuck::cast_slice(values).to_vec(),
        }
    }

    fn recreate_texture(&mut self, backend: &dyn GpuBackend) -> Result<(), GraphicsError> {
        let texture = match Texture::create(backend, self.descriptor()) {
            Ok(texture) => Arc::new(texture),
            Err(e) => {
                log::warn!("Failed to create parameter texture: {}", e);
                return Err(e);
            }
        };
        log::info!(
            "Created parameter texture {}x{}",
            texture.width(),
            texture.height()
        );
        self.texture = Some(texture);
        self.needs_recreate = false;
        self.rebind_materials();

        // A fresh texture has undefined contents.
        self.pending = Some(UpdatedRegion {
            first_row: 0,
            row_count: self.allocator.rows(),
        });
        Ok(())
    }

    fn write_region(
        &self,
        backend: &dyn GpuBackend,
        texture: &Texture,
        region: UpdatedRegion,
    ) -> Result<(), GraphicsError> {
        let data = self.encode_rows(region);
        log::trace!(
            "Writing parameter rows {}..{} ({} bytes)",
            region.first_row,
            region.end_row(),
            data.len()
        );
        backend.write_texture(
            texture.gpu_handle(),
            texture.descriptor(),
            Origin3d::row(region.first_row),
            Extent3d::new_2d(texture.width(), region.row_count),
            &data,
        )
    }

    fn descriptor(&self) -> TextureDescriptor {
        TextureDescriptor::new_2d(
            self.allocator.texels_per_row() as u32,
            self.allocator.rows(),
            self.format,
            TextureUsage::TEXTURE_BINDING | TextureUsage::COPY_DST,
        )
        .with_label(self.property_name.clone())
    }

    fn rebind_materials(&mut self) {
        let Some(texture) = &self.texture else {
            return;
        };
        self.materials.retain(|weak| match weak.upgrade() {
            Some(material) => {
                material.set_texture(&self.property_name, texture.clone());
                true
            }
            None => false,
        });
    }
}

impl std::fmt::Debug for ParameterTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterTexture")
            .field("rows", &self.allocator.rows())
            .field("texels_per_row", &self.allocator.texels_per_row())
            .field("format", &self.format)
            .field("property_name", &self.property_name)
            .field("materials", &self.materials.len())
            .field("needs_recreate", &self.needs_recreate)
            .finish()
    }
}

static_assertions::assert_impl_all!(ParameterTexture: Send, Sync);
