//! # UIFX Graphics
//!
//! GPU side of the UIFX parameter system and the UI transition effect.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`ParameterTexture`] - Mirrors a [`ParameterAllocator`] into a GPU texture
//! - [`GpuBackend`] - Trait for texture upload backends (wgpu and Dummy)
//! - [`materials`] - Shader variants and their texture bindings
//! - [`effect`] - The transition effect and its host lifecycle hooks
//!
//! ## Example
//!
//! ```ignore
//! use uifx_graphics::effect::{Activatable, EffectContext, EffectMode, TransitionEffect};
//!
//! let mut effect = TransitionEffect::new(EffectMode::Mono, 0.5);
//! effect.activate(&mut EffectContext::new(&mut graphic, &mut ptex, &mut resolver));
//! // Rebuild the mesh through MeshModifier, then once per frame:
//! ptex.upload(backend.as_ref())?;
//! ```
//!
//! [`ParameterAllocator`]: uifx_core::params::ParameterAllocator

pub mod backend;
pub mod effect;
pub mod error;
pub mod materials;
pub mod parameter_texture;
pub mod resources;
pub mod types;

// Re-export main types for convenience
pub use backend::{BackendType, DummyBackend, GpuBackend, GpuTexture, create_backend};
pub use effect::{
    Activatable, EffectContext, EffectMode, MeshModifier, TransitionEffect, TransitionSettings,
    UiGraphic,
};
pub use error::GraphicsError;
pub use materials::{Material, MaterialInstance, MaterialResolver};
pub use parameter_texture::{PARAM_TEX_PROPERTY, ParameterTexture};
pub use resources::Texture;
pub use types::{Extent3d, Origin3d, TextureDescriptor, TextureFormat, TextureUsage};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    uifx_core::init();
    log::info!("UIFX Graphics v{} initialized", VERSION);
}
