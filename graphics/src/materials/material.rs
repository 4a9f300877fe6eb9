//! Material definition.
//!
//! A [`Material`] identifies a shader and the keywords enabled on it. It is
//! immutable and shared across many [`MaterialInstance`]s.
//!
//! [`MaterialInstance`]: super::MaterialInstance

/// A shader variant: shader name plus enabled keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Material {
    shader: String,
    keywords: Vec<String>,
    label: Option<String>,
}

impl Material {
    /// Create a material for the named shader with no keywords.
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            keywords: Vec::new(),
            label: None,
        }
    }

    /// Enable a keyword. Keywords are kept sorted and unique.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if let Err(pos) = self.keywords.binary_search(&keyword) {
            self.keywords.insert(pos, keyword);
        }
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the shader name.
    pub fn shader(&self) -> &str {
        &self.shader
    }

    /// Get the enabled keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if `keyword` is enabled.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Get the material label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
