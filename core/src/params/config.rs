//! Allocator configuration.

use super::ParameterError;

/// Number of channels stored in one RGBA texel.
pub const CHANNELS_PER_TEXEL: usize = 4;

/// Common upper bound for the height of a 2D texture.
pub const DEFAULT_MAX_ROWS: u32 = 8192;

/// How the parameter buffer grows when every row is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrowthPolicy {
    /// Double the row count.
    #[default]
    Doubling,
    /// Add a fixed number of rows.
    Fixed(u32),
}

impl GrowthPolicy {
    /// Row count after one growth step from `rows`, clamped to `max_rows`.
    ///
    /// Returns `None` if the buffer is already at `max_rows`.
    pub fn next_rows(&self, rows: u32, max_rows: u32) -> Option<u32> {
        if rows >= max_rows {
            return None;
        }
        let grown = match *self {
            Self::Doubling => rows.saturating_mul(2).max(1),
            Self::Fixed(step) => rows.saturating_add(step.max(1)),
        };
        Some(grown.min(max_rows))
    }
}

/// Configuration for a [`ParameterAllocator`](super::ParameterAllocator).
///
/// # Example
///
/// ```
/// use uifx_core::params::{AllocatorConfig, GrowthPolicy};
///
/// let config = AllocatorConfig::new(1)
///     .with_initial_rows(2)
///     .with_growth(GrowthPolicy::Fixed(2))
///     .with_max_rows(16);
/// assert_eq!(config.channels_per_row(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Requested channel count; padded up to whole texels.
    pub channels: usize,
    /// Rows available before the first growth.
    pub initial_rows: u32,
    /// Growth policy.
    pub growth: GrowthPolicy,
    /// Hard upper bound on the row count.
    pub max_rows: u32,
}

impl AllocatorConfig {
    /// Create a config with the given channel count and default sizing.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    /// Set the requested channel count.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Set the initial row count.
    pub fn with_initial_rows(mut self, rows: u32) -> Self {
        self.initial_rows = rows;
        self
    }

    /// Set the growth policy.
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Set the maximum row count.
    pub fn with_max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Channels actually stored per row (rounded up to a multiple of 4).
    pub fn channels_per_row(&self) -> usize {
        self.channels.max(1).div_ceil(CHANNELS_PER_TEXEL) * CHANNELS_PER_TEXEL
    }

    /// Row width in RGBA texels.
    pub fn texels_per_row(&self) -> usize {
        self.channels_per_row() / CHANNELS_PER_TEXEL
    }

    /// Check the configuration for values the allocator cannot work with.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.channels == 0 {
            return Err(ParameterError::InvalidConfig(
                "channel count cannot be zero".to_string(),
            ));
        }
        if self.initial_rows == 0 {
            return Err(ParameterError::InvalidConfig(
                "initial row count cannot be zero".to_string(),
            ));
        }
        if self.initial_rows > self.max_rows {
            return Err(ParameterError::InvalidConfig(format!(
                "initial rows {} exceed max rows {}",
                self.initial_rows, self.max_rows
            )));
        }
        if self.growth == GrowthPolicy::Fixed(0) {
            return Err(ParameterError::InvalidConfig(
                "fixed growth step cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            channels: CHANNELS_PER_TEXEL,
            initial_rows: 256,
            growth: GrowthPolicy::Doubling,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}
