//! UI effects driven by the shared parameter texture.
//!
//! An effect is attached to a [`UiGraphic`] and follows the host's lifecycle
//! through [`Activatable`]. While active it owns one parameter slot and
//! rewrites the graphic's vertices through [`MeshModifier`] so the shader can
//! find that slot.

mod settings;
mod transition;

use std::sync::Arc;

use uifx_core::vertex::UiVertex;

use crate::materials::{MaterialInstance, MaterialResolver};
use crate::parameter_texture::ParameterTexture;

pub use settings::{CURRENT_VERSION, TransitionSettings, upgrade};
pub use transition::{
    EffectMode, SHADER_NAME, SHARED_CONFIG, TransitionEffect, shared_parameter_texture,
};

/// Host-side state of a UI element an effect is attached to.
#[derive(Debug, Default)]
pub struct UiGraphic {
    material: Option<Arc<MaterialInstance>>,
    vertices_dirty: bool,
}

impl UiGraphic {
    /// Create a graphic with no material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the assigned material.
    pub fn material(&self) -> Option<&Arc<MaterialInstance>> {
        self.material.as_ref()
    }

    /// Assign or clear the material.
    pub fn set_material(&mut self, material: Option<Arc<MaterialInstance>>) {
        self.material = material;
    }

    /// Request a mesh rebuild.
    pub fn set_vertices_dirty(&mut self) {
        self.vertices_dirty = true;
    }

    /// Returns true if a mesh rebuild was requested.
    pub fn vertices_dirty(&self) -> bool {
        self.vertices_dirty
    }

    /// Consume a pending mesh rebuild request.
    pub fn take_vertices_dirty(&mut self) -> bool {
        std::mem::take(&mut self.vertices_dirty)
    }
}

/// Everything an effect touches during a lifecycle callback.
pub struct EffectContext<'a> {
    /// The graphic the effect is attached to.
    pub graphic: &'a mut UiGraphic,
    /// The parameter texture holding the effect's slot.
    pub params: &'a mut ParameterTexture,
    /// Material variant cache.
    pub materials: &'a mut MaterialResolver,
}

impl<'a> EffectContext<'a> {
    /// Bundle the pieces of a lifecycle callback.
    pub fn new(
        graphic: &'a mut UiGraphic,
        params: &'a mut ParameterTexture,
        materials: &'a mut MaterialResolver,
    ) -> Self {
        Self {
            graphic,
            params,
            materials,
        }
    }
}

/// Host lifecycle hooks.
pub trait Activatable {
    /// Called when the effect becomes active.
    fn activate(&mut self, ctx: &mut EffectContext<'_>);

    /// Called when the effect becomes inactive.
    fn deactivate(&mut self, ctx: &mut EffectContext<'_>);

    /// Called after settings were changed externally.
    fn revalidate(&mut self, ctx: &mut EffectContext<'_>);
}

/// Mesh-rebuild hook.
pub trait MeshModifier {
    /// Rewrite `vertices` in place. Count and order must not change.
    fn modify_mesh(&self, params: &ParameterTexture, vertices: &mut [UiVertex]);
}
