//! Transition effect: fades or cuts off a UI element by a single factor.

use std::sync::LazyLock;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use uifx_core::pack::pack_uv;
use uifx_core::params::{AllocatorConfig, GrowthPolicy, InstanceId, ParameterAllocator};
use uifx_core::vertex::UiVertex;

use crate::parameter_texture::ParameterTexture;
use crate::types::TextureFormat;

use super::settings::{CURRENT_VERSION, TransitionSettings, upgrade};
use super::{Activatable, EffectContext, MeshModifier};

/// Shader used by every transition material variant.
pub const SHADER_NAME: &str = "UI/Hidden/UI-Effect-Transition";

/// Parameter channel holding the effect factor.
const FACTOR_CHANNEL: usize = 0;

/// Allocator layout of the shared parameter texture.
///
/// Rows stop at 2048, the 2D texture limit of downlevel devices.
pub const SHARED_CONFIG: AllocatorConfig = AllocatorConfig {
    channels: 1,
    initial_rows: 256,
    growth: GrowthPolicy::Doubling,
    max_rows: 2048,
};

static SHARED_PARAMETER_TEXTURE: LazyLock<Mutex<ParameterTexture>> = LazyLock::new(|| {
    let allocator = ParameterAllocator::new_or_default(SHARED_CONFIG);
    Mutex::new(ParameterTexture::from_allocator(allocator, TextureFormat::Rgba8Unorm))
});

/// Process-wide parameter texture shared by all transition effects.
pub fn shared_parameter_texture() -> &'static Mutex<ParameterTexture> {
    &SHARED_PARAMETER_TEXTURE
}

/// How the transition is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EffectMode {
    /// No effect; the graphic renders with its own material.
    #[default]
    None = 0,
    /// Fade towards a single color.
    Mono = 1,
    /// Discard pixels below the factor.
    Cutoff = 2,
}

impl EffectMode {
    /// Shader keyword enabling this mode, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Mono => Some("MONO"),
            Self::Cutoff => Some("CUTOFF"),
        }
    }
}

/// Per-element transition effect.
///
/// Holds one parameter slot while active. The factor is stored in channel 0
/// of the slot's row; [`MeshModifier::modify_mesh`] packs each vertex UV and
/// the slot's normalized row index into `uv0`.
#[derive(Debug)]
pub struct TransitionEffect {
    id: InstanceId,
    mode: EffectMode,
    factor: f32,
    active: bool,
}

impl Default for TransitionEffect {
    fn default() -> Self {
        Self::new(EffectMode::None, 1.0)
    }
}

impl TransitionEffect {
    /// Create an inactive effect.
    pub fn new(mode: EffectMode, factor: f32) -> Self {
        Self {
            id: InstanceId::new(),
            mode,
            factor: factor.clamp(0.0, 1.0),
            active: false,
        }
    }

    /// Create an inactive effect from stored settings, migrating them first.
    pub fn from_settings(settings: TransitionSettings) -> Self {
        let (_, settings) = upgrade(settings.version, settings);
        Self::new(settings.effect_mode, settings.effect_factor)
    }

    /// Settings describing this effect.
    pub fn settings(&self) -> TransitionSettings {
        TransitionSettings {
            version: CURRENT_VERSION,
            effect_mode: self.mode,
            effect_factor: self.factor,
        }
    }

    /// Handle identifying this effect's parameter slot.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Current effect mode.
    pub fn effect_mode(&self) -> EffectMode {
        self.mode
    }

    /// Committed effect factor.
    pub fn effect_factor(&self) -> f32 {
        self.factor
    }

    /// Returns true between `activate` and `deactivate`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the effect factor, clamped to `[0, 1]`.
    ///
    /// Values approximately equal to the committed factor are ignored.
    pub fn set_effect_factor(&mut self, ctx: &mut EffectContext<'_>, value: f32) {
        let value = value.clamp(0.0, 1.0);
        if approximately(self.factor, value) {
            return;
        }
        self.factor = value;
        if self.active {
            self.write_parameters(ctx);
            ctx.graphic.set_vertices_dirty();
        }
    }

    /// Change the effect mode and re-derive the material.
    pub fn set_effect_mode(&mut self, ctx: &mut EffectContext<'_>, mode: EffectMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if self.active {
            self.revalidate(ctx);
        }
    }

    /// Pack each vertex UV together with this effect's row index into `uv0`.
    ///
    /// Does nothing when inactive, in [`EffectMode::None`], or without a slot.
    pub fn modify_vertices(&self, params: &ParameterAllocator, vertices: &mut [UiVertex]) {
        if !self.active || self.mode == EffectMode::None {
            return;
        }
        let Ok(index) = params.normalized_index(self.id) else {
            return;
        };
        for vertex in vertices {
            vertex.uv0 = [pack_uv(vertex.uv0[0], vertex.uv0[1]), index];
        }
    }

    fn apply_material(&self, ctx: &mut EffectContext<'_>) {
        let material = self
            .mode
            .keyword()
            .map(|keyword| ctx.materials.get_or_generate_variant(SHADER_NAME, keyword));
        ctx.graphic.set_material(material);
    }

    fn write_parameters(&self, ctx: &mut EffectContext<'_>) {
        if !ctx.params.allocator().is_registered(self.id) {
            return;
        }
        if let Some(material) = ctx.graphic.material() {
            ctx.params.register_material(material);
        }
        if let Err(e) = ctx
            .params
            .allocator_mut()
            .set_channel_value(self.id, FACTOR_CHANNEL, self.factor)
        {
            log::warn!("Transition {} failed to write factor: {}", self.id, e);
        }
    }
}

impl Activatable for TransitionEffect {
    fn activate(&mut self, ctx: &mut EffectContext<'_>) {
        self.active = true;
        self.apply_material(ctx);

        match ctx.params.allocator_mut().get_or_create_slot(self.id) {
            Ok(slot) => log::debug!("Transition {} activated in row {}", self.id, slot.row()),
            Err(e) => log::warn!("Transition {} renders without effect: {}", self.id, e),
        }

        self.write_parameters(ctx);
        ctx.graphic.set_vertices_dirty();
    }

    fn deactivate(&mut self, ctx: &mut EffectContext<'_>) {
        self.active = false;
        ctx.graphic.set_material(None);
        ctx.params.allocator_mut().release_slot(self.id);
        ctx.graphic.set_vertices_dirty();
    }

    fn revalidate(&mut self, ctx: &mut EffectContext<'_>) {
        if !self.active {
            return;
        }
        self.apply_material(ctx);
        self.write_parameters(ctx);
        ctx.graphic.set_vertices_dirty();
    }
}

impl MeshModifier for TransitionEffect {
    fn modify_mesh(&self, params: &ParameterTexture, vertices: &mut [UiVertex]) {
        self.modify_vertices(params.allocator(), vertices);
    }
}

/// Float comparison with a tolerance relative to the operands.
fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}
