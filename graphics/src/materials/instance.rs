//! Material instance with bound textures.
//!
//! A [`MaterialInstance`] holds the textures bound to named shader
//! properties. Multiple instances can share the same [`Material`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::resources::Texture;

use super::material::Material;

/// A material instance with bound textures.
///
/// Bindings use interior mutability so an instance shared as
/// `Arc<MaterialInstance>` between a graphic and a parameter texture can be
/// rebound when the texture is recreated.
///
/// # Example
///
/// ```ignore
/// let instance = MaterialInstance::new(material.clone()).with_label("transition");
/// instance.set_texture("_ParamTex", texture.clone());
/// ```
pub struct MaterialInstance {
    material: Arc<Material>,
    textures: RwLock<HashMap<String, Arc<Texture>>>,
    label: Option<String>,
}

impl MaterialInstance {
    /// Create a new material instance.
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            material,
            textures: RwLock::new(HashMap::new()),
            label: None,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the parent material.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Get the instance label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Bind `texture` to the named property, replacing any previous binding.
    pub fn set_texture(&self, property: &str, texture: Arc<Texture>) {
        self.textures.write().insert(property.to_string(), texture);
    }

    /// Get the texture bound to the named property.
    pub fn texture(&self, property: &str) -> Option<Arc<Texture>> {
        self.textures.read().get(property).cloned()
    }

    /// Returns true if the named property has a texture bound.
    pub fn has_texture(&self, property: &str) -> bool {
        self.textures.read().contains_key(property)
    }
}

impl std::fmt::Debug for MaterialInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialInstance")
            .field("shader", &self.material.shader())
            .field("texture_count", &self.textures.read().len())
            .field("label", &self.label)
            .finish()
    }
}

// Ensure MaterialInstance is Send + Sync
static_assertions::assert_impl_all!(MaterialInstance: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;
    use crate::types::{TextureDescriptor, TextureFormat, TextureUsage};

    fn create_test_texture() -> Arc<Texture> {
        let desc = TextureDescriptor::new_2d(
            1,
            4,
            TextureFormat::Rgba8Unorm,
            TextureUsage::TEXTURE_BINDING,
        );
        Arc::new(Texture::create(&DummyBackend::new(), desc).unwrap())
    }

    #[test]
    fn test_material_instance_creation() {
        let material = Arc::new(Material::new("UI/Test"));
        let instance = MaterialInstance::new(material.clone()).with_label("test_instance");

        assert!(Arc::ptr_eq(instance.material(), &material));
        assert_eq!(instance.label(), Some("test_instance"));
        assert!(!instance.has_texture("_MainTex"));
    }

    #[test]
    fn test_texture_replacement() {
        let instance = MaterialInstance::new(Arc::new(Material::new("UI/Test")));
        let first = create_test_texture();
        let second = create_test_texture();

        instance.set_texture("_ParamTex", first.clone());
        assert!(Arc::ptr_eq(&instance.texture("_ParamTex").unwrap(), &first));

        instance.set_texture("_ParamTex", second.clone());
        assert!(Arc::ptr_eq(&instance.texture("_ParamTex").unwrap(), &second));
        assert!(instance.texture("_MainTex").is_none());
    }
}
