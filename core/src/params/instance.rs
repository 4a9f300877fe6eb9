//! Opaque effect-instance handles.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique handle identifying one effect instance.
///
/// Registrations in a [`ParameterAllocator`](super::ParameterAllocator) are
/// keyed by this handle. Two handles compare equal only if they came from the
/// same call to [`InstanceId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Mint a fresh handle.
    pub fn new() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging and debugging.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
