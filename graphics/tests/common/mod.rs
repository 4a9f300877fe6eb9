//! Common utilities for integration tests.
//!
//! This module provides shared test infrastructure that can be reused
//! across different backend implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use uifx_core::params::AllocatorConfig;
use uifx_graphics::GraphicsError;
use uifx_graphics::backend::{DummyBackend, GpuBackend, GpuTexture, TextureWrite};
use uifx_graphics::types::{Extent3d, Origin3d, TextureDescriptor};
use uifx_graphics::effect::{EffectContext, UiGraphic};
use uifx_graphics::{MaterialResolver, ParameterTexture, TextureFormat};

// ============================================================================
// Backend Enumeration
// ============================================================================

/// Available GPU backends for testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Dummy backend (records writes, no GPU).
    Dummy,
    /// WebGPU backend (via wgpu).
    WebGpu,
}

impl Backend {
    /// Get the backend name for display.
    #[allow(dead_code)]
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Dummy => "dummy",
            Backend::WebGpu => "webgpu",
        }
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// A backend plus, for the dummy backend, a handle to inspect its writes.
pub struct TestContext {
    pub backend: Arc<dyn GpuBackend>,
    dummy: Option<Arc<DummyBackend>>,
}

impl TestContext {
    /// Create a context, or `None` if the backend is unavailable here.
    pub fn new(backend: Backend) -> Option<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        match backend {
            Backend::Dummy => {
                let dummy = Arc::new(DummyBackend::new());
                Some(Self {
                    backend: dummy.clone(),
                    dummy: Some(dummy),
                })
            }
            #[cfg(feature = "wgpu-backend")]
            Backend::WebGpu => match uifx_graphics::backend::WgpuBackend::new() {
                Ok(wgpu) => Some(Self {
                    backend: Arc::new(wgpu),
                    dummy: None,
                }),
                Err(e) => {
                    eprintln!("wgpu backend unavailable: {e}");
                    None
                }
            },
            #[cfg(not(feature = "wgpu-backend"))]
            Backend::WebGpu => None,
        }
    }

    /// Recorded writes since the last call, if the backend records them.
    #[allow(dead_code)]
    pub fn take_writes(&self) -> Option<Vec<TextureWrite>> {
        self.dummy.as_ref().map(|d| d.take_writes())
    }
}

// ============================================================================
// Failure injection
// ============================================================================

/// Dummy backend whose next calls can be made to fail.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FlakyBackend {
    pub inner: DummyBackend,
    failing_creates: AtomicU32,
    failing_writes: AtomicU32,
}

#[allow(dead_code)]
impl FlakyBackend {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    /// Fail the next `count` texture creations.
    pub fn fail_next_creates(&self, count: u32) {
        self.failing_creates.store(count, Ordering::Release);
    }

    /// Fail the next `count` texture writes.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::Release);
    }

    fn should_fail(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl GpuBackend for FlakyBackend {
    fn name(&self) -> &'static str {
        "Flaky Backend"
    }

    fn max_texture_dimension(&self) -> u32 {
        self.inner.max_texture_dimension()
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<GpuTexture, GraphicsError> {
        if Self::should_fail(&self.failing_creates) {
            let reason = "injected failure".to_string();
            return Err(GraphicsError::ResourceCreationFailed(reason));
        }
        self.inner.create_texture(descriptor)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        descriptor: &TextureDescriptor,
        origin: Origin3d,
        size: Extent3d,
        data: &[u8],
    ) -> Result<(), GraphicsError> {
        if Self::should_fail(&self.failing_writes) {
            return Err(GraphicsError::Internal("injected failure".to_string()));
        }
        self.inner.write_texture(texture, descriptor, origin, size, data)
    }
}

// ============================================================================
// Effect host
// ============================================================================

/// Minimal host owning what an effect needs during lifecycle callbacks.
#[allow(dead_code)]
pub struct Host {
    pub graphic: UiGraphic,
    pub params: ParameterTexture,
    pub materials: MaterialResolver,
}

#[allow(dead_code)]
impl Host {
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            graphic: UiGraphic::new(),
            params: ParameterTexture::new(config, TextureFormat::Rgba8Unorm)
                .expect("valid allocator config"),
            materials: MaterialResolver::new(),
        }
    }

    pub fn ctx(&mut self) -> EffectContext<'_> {
        EffectContext::new(&mut self.graphic, &mut self.params, &mut self.materials)
    }
}
