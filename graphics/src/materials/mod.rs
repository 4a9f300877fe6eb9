//! Material system for UI effects.
//!
//! This module provides a two-level material abstraction:
//!
//! - [`Material`] - Names the shader and the keywords of one variant
//! - [`MaterialInstance`] - Holds the textures bound to a material's properties
//!
//! [`MaterialResolver`] caches one instance per shader variant so every effect
//! in the same mode shares a single material.

mod instance;
mod material;
mod resolver;

pub use instance::MaterialInstance;
pub use material::Material;
pub use resolver::MaterialResolver;
