//! Cache of generated material variants.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Material, MaterialInstance};

/// Generates one shared [`MaterialInstance`] per shader and keyword.
#[derive(Debug, Default)]
pub struct MaterialResolver {
    variants: HashMap<(String, String), Arc<MaterialInstance>>,
}

impl MaterialResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached variant of `shader` with `keyword` enabled, creating
    /// it on first request.
    pub fn get_or_generate_variant(
        &mut self,
        shader: &str,
        keyword: &str,
    ) -> Arc<MaterialInstance> {
        self.variants
            .entry((shader.to_string(), keyword.to_string()))
            .or_insert_with(|| {
                log::debug!("Generating material variant {} [{}]", shader, keyword);
                let label = format!("{shader}-{keyword}");
                let material = Material::new(shader)
                    .with_keyword(keyword)
                    .with_label(label.clone());
                Arc::new(MaterialInstance::new(Arc::new(material)).with_label(label))
            })
            .clone()
    }

    /// Number of cached variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true if no variant has been generated.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
