//! Shared parameter slot allocator.
//!
//! Every active effect instance owns one row ("slot") of a shared
//! [`ParameterBuffer`]. The buffer is uploaded to the GPU as a small 2D texture
//! and each vertex carries the slot's normalized index, so a single material
//! can serve many instances with different parameters.
//!
//! # Example
//!
//! ```
//! use uifx_core::params::{AllocatorConfig, InstanceId, ParameterAllocator};
//!
//! let mut params = ParameterAllocator::new(AllocatorConfig::new(1).with_initial_rows(4))?;
//! let id = InstanceId::new();
//!
//! let slot = params.get_or_create_slot(id)?;
//! params.set_channel_value(id, 0, 0.5)?;
//! assert_eq!(params.normalized_index(id)?, (slot.row() as f32 + 0.5) / 4.0);
//!
//! let flushed = params.flush();
//! assert!(flushed.requires_upload);
//! # Ok::<(), uifx_core::params::ParameterError>(())
//! ```

use std::collections::HashMap;

use fixedbitset::FixedBitSet;

use super::{AllocatorConfig, InstanceId, ParameterBuffer, ParameterError};

/// A row index into the parameter buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u32);

impl Slot {
    /// The 0-based row this slot occupies.
    pub fn row(&self) -> u32 {
        self.0
    }
}

/// Range of rows written since the previous flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdatedRegion {
    /// First dirty row.
    pub first_row: u32,
    /// Number of rows from `first_row` through the last dirty row.
    pub row_count: u32,
}

impl UpdatedRegion {
    /// One past the last covered row.
    pub fn end_row(&self) -> u32 {
        self.first_row + self.row_count
    }

    /// Smallest region covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        let first_row = self.first_row.min(other.first_row);
        Self {
            first_row,
            row_count: self.end_row().max(other.end_row()) - first_row,
        }
    }
}

/// Outcome of [`ParameterAllocator::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushResult {
    /// Dirty data exists and must be pushed to the rendering backend.
    pub requires_upload: bool,
    /// The buffer grew; the backing resource must be recreated and rebound.
    pub resized: bool,
    /// Rows to upload, if any.
    pub region: Option<UpdatedRegion>,
}

/// Hands out parameter rows to effect instances and tracks pending uploads.
///
/// Released rows are reused (most recently released first) before the buffer
/// grows. Every row is zeroed when it is handed out, so a new owner never sees
/// values left by the previous one.
///
/// # Thread Safety
///
/// `ParameterAllocator` performs no locking. It is meant to be driven from the
/// thread that rebuilds UI meshes; wrap it in a mutex to share it.
#[derive(Debug)]
pub struct ParameterAllocator {
    config: AllocatorConfig,
    buffer: ParameterBuffer,
    registrations: HashMap<InstanceId, Slot>,
    free_rows: Vec<u32>,
    next_unused_row: u32,
    dirty_rows: FixedBitSet,
    resized: bool,
}

impl ParameterAllocator {
    /// Create an allocator from a validated configuration.
    pub fn new(config: AllocatorConfig) -> Result<Self, ParameterError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create an allocator, falling back to [`AllocatorConfig::default`] if
    /// `config` does not validate.
    pub fn new_or_default(config: AllocatorConfig) -> Self {
        match config.validate() {
            Ok(()) => Self::build(config),
            Err(e) => {
                log::warn!("{}, using default allocator config", e);
                Self::build(AllocatorConfig::default())
            }
        }
    }

    fn build(config: AllocatorConfig) -> Self {
        let buffer = ParameterBuffer::new(config.channels_per_row(), config.initial_rows);
        let dirty_rows = FixedBitSet::with_capacity(config.initial_rows as usize);
        Self {
            config,
            buffer,
            registrations: HashMap::new(),
            free_rows: Vec::new(),
            next_unused_row: 0,
            dirty_rows,
            resized: false,
        }
    }

    /// The configuration this allocator was created with.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Lower the row cap to `max_rows` if it is below the configured one.
    ///
    /// Used to respect a device texture limit. Fails without changing
    /// anything if the buffer already has more rows than `max_rows`.
    pub fn limit_max_rows(&mut self, max_rows: u32) -> Result<(), ParameterError> {
        let rows = self.buffer.rows();
        if rows > max_rows {
            return Err(ParameterError::AllocationExhausted { rows, max_rows });
        }
        if max_rows < self.config.max_rows {
            log::debug!(
                "Parameter row cap lowered from {} to {}",
                self.config.max_rows,
                max_rows
            );
            self.config.max_rows = max_rows;
        }
        Ok(())
    }

    /// The CPU-side parameter grid.
    pub fn buffer(&self) -> &ParameterBuffer {
        &self.buffer
    }

    /// Current row count (texture height).
    pub fn rows(&self) -> u32 {
        self.buffer.rows()
    }

    /// Channels stored per row.
    pub fn channels_per_row(&self) -> usize {
        self.buffer.channels_per_row()
    }

    /// Row width in RGBA texels (texture width).
    pub fn texels_per_row(&self) -> usize {
        self.config.texels_per_row()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if no instance holds a slot.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns true if `id` currently owns a slot.
    pub fn is_registered(&self, id: InstanceId) -> bool {
        self.registrations.contains_key(&id)
    }

    /// The slot owned by `id`, if any.
    pub fn slot(&self, id: InstanceId) -> Option<Slot> {
        self.registrations.get(&id).copied()
    }

    /// Returns true if writes are waiting for the next flush.
    pub fn is_dirty(&self) -> bool {
        self.resized || !self.dirty_rows.is_clear()
    }

    /// Return the slot owned by `id`, allocating one if needed.
    ///
    /// A newly allocated row is zeroed. When every row is taken the buffer
    /// grows according to the configured [`GrowthPolicy`](super::GrowthPolicy);
    /// existing contents are preserved but every previously issued normalized
    /// index becomes stale.
    pub fn get_or_create_slot(&mut self, id: InstanceId) -> Result<Slot, ParameterError> {
        if let Some(slot) = self.registrations.get(&id) {
            return Ok(*slot);
        }

        let row = match self.free_rows.pop() {
            Some(row) => row,
            None => {
                if self.next_unused_row >= self.buffer.rows() {
                    self.grow()?;
                }
                let row = self.next_unused_row;
                self.next_unused_row += 1;
                row
            }
        };

        self.buffer.clear_row(row);
        self.dirty_rows.insert(row as usize);

        let slot = Slot(row);
        self.registrations.insert(id, slot);
        log::debug!("Parameter slot {} assigned to instance {}", row, id);
        Ok(slot)
    }

    /// Release the slot owned by `id`.
    ///
    /// Returns false if `id` had no slot.
    pub fn release_slot(&mut self, id: InstanceId) -> bool {
        let Some(slot) = self.registrations.remove(&id) else {
            return false;
        };
        self.free_rows.push(slot.row());
        log::debug!("Parameter slot {} released by instance {}", slot.row(), id);
        true
    }

    /// Write one channel of the slot owned by `id`.
    ///
    /// Writing the value already stored does not schedule an upload.
    pub fn set_channel_value(
        &mut self,
        id: InstanceId,
        channel: usize,
        value: f32,
    ) -> Result<(), ParameterError> {
        self.check_channel(channel)?;
        let slot = self.require_slot(id)?;
        if self.buffer.set(slot.row(), channel, value) {
            log::trace!(
                "Parameter row {} channel {} set to {}",
                slot.row(),
                channel,
                value
            );
            self.dirty_rows.insert(slot.row() as usize);
        }
        Ok(())
    }

    /// Read one channel of the slot owned by `id`.
    pub fn channel_value(&self, id: InstanceId, channel: usize) -> Result<f32, ParameterError> {
        self.check_channel(channel)?;
        let slot = self.require_slot(id)?;
        Ok(self.buffer.get(slot.row(), channel).unwrap_or_default())
    }

    /// Texel-centred coordinate of the slot owned by `id`: `(row + 0.5) / rows`.
    ///
    /// Always derived from the current row count, so callers must re-read it
    /// after the buffer grows.
    pub fn normalized_index(&self, id: InstanceId) -> Result<f32, ParameterError> {
        let slot = self.require_slot(id)?;
        Ok((slot.row() as f32 + 0.5) / self.buffer.rows() as f32)
    }

    /// Collect pending writes and reset the dirty state.
    ///
    /// Call once per frame after all parameter writes.
    pub fn flush(&mut self) -> FlushResult {
        let resized = std::mem::take(&mut self.resized);
        let region = if resized {
            Some(UpdatedRegion {
                first_row: 0,
                row_count: self.buffer.rows(),
            })
        } else {
            let mut dirty = self.dirty_rows.ones();
            dirty.next().map(|first| {
                let last = dirty.last().unwrap_or(first);
                UpdatedRegion {
                    first_row: first as u32,
                    row_count: (last - first + 1) as u32,
                }
            })
        };
        self.dirty_rows.clear();

        FlushResult {
            requires_upload: region.is_some(),
            resized,
            region,
        }
    }

    fn grow(&mut self) -> Result<(), ParameterError> {
        let rows = self.buffer.rows();
        let Some(next) = self.config.growth.next_rows(rows, self.config.max_rows) else {
            log::warn!(
                "Parameter buffer cannot grow past {} rows",
                self.config.max_rows
            );
            return Err(ParameterError::AllocationExhausted {
                rows,
                max_rows: self.config.max_rows,
            });
        };
        self.buffer.grow(next);
        self.dirty_rows.grow(next as usize);
        self.resized = true;
        log::info!("Parameter buffer grew from {} to {} rows", rows, next);
        Ok(())
    }

    fn check_channel(&self, channel: usize) -> Result<(), ParameterError> {
        if channel >= self.buffer.channels_per_row() {
            return Err(ParameterError::InvalidChannel {
                channel,
                channels_per_row: self.buffer.channels_per_row(),
            });
        }
        Ok(())
    }

    fn require_slot(&self, id: InstanceId) -> Result<Slot, ParameterError> {
        self.registrations
            .get(&id)
            .copied()
            .ok_or(ParameterError::UnregisteredInstance(id))
    }
}

static_assertions::assert_impl_all!(ParameterAllocator: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DEFAULT_MAX_ROWS, GrowthPolicy};

    fn small_allocator(rows: u32) -> ParameterAllocator {
        let _ = env_logger::builder().is_test(true).try_init();
        ParameterAllocator::new(AllocatorConfig::new(1).with_initial_rows(rows)).unwrap()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut params = small_allocator(4);
        let id = InstanceId::new();
        let first = params.get_or_create_slot(id).unwrap();
        let second = params.get_or_create_slot(id).unwrap();
        assert_eq!(first, second);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_distinct_instances_get_distinct_rows() {
        let mut params = small_allocator(4);
        let a = params.get_or_create_slot(InstanceId::new()).unwrap();
        let b = params.get_or_create_slot(InstanceId::new()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_growth_on_third_allocation() {
        let mut params = small_allocator(2);
        let a = InstanceId::new();
        let b = InstanceId::new();
        let c = InstanceId::new();

        params.get_or_create_slot(a).unwrap();
        params.get_or_create_slot(b).unwrap();
        params.set_channel_value(a, 0, 0.25).unwrap();
        params.set_channel_value(b, 0, 0.75).unwrap();
        params.flush();
        assert_eq!(params.rows(), 2);

        params.get_or_create_slot(c).unwrap();
        assert_eq!(params.rows(), 4);
        assert_eq!(params.channel_value(a, 0).unwrap(), 0.25);
        assert_eq!(params.channel_value(b, 0).unwrap(), 0.75);

        let flushed = params.flush();
        assert!(flushed.resized);
        assert_eq!(
            flushed.region,
            Some(UpdatedRegion {
                first_row: 0,
                row_count: 4
            })
        );
    }

    #[test]
    fn test_normalized_index_recomputed_after_growth() {
        let mut params = small_allocator(2);
        let a = InstanceId::new();
        params.get_or_create_slot(a).unwrap();
        assert_eq!(params.normalized_index(a).unwrap(), 0.25);

        params.get_or_create_slot(InstanceId::new()).unwrap();
        params.get_or_create_slot(InstanceId::new()).unwrap();
        assert_eq!(params.rows(), 4);
        assert_eq!(params.normalized_index(a).unwrap(), 0.125);
    }

    #[test]
    fn test_invalid_channel_leaves_buffer_untouched() {
        let mut params = small_allocator(2);
        let id = InstanceId::new();
        params.get_or_create_slot(id).unwrap();
        params.flush();
        let before = params.buffer().clone();

        let err = params.set_channel_value(id, 4, 1.0).unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidChannel {
                channel: 4,
                channels_per_row: 4
            }
        );
        assert_eq!(params.buffer(), &before);
        assert!(!params.is_dirty());
    }

    #[test]
    fn test_unregistered_instance() {
        let mut params = small_allocator(2);
        let id = InstanceId::new();
        assert_eq!(
            params.set_channel_value(id, 0, 1.0),
            Err(ParameterError::UnregisteredInstance(id))
        );
        assert_eq!(
            params.normalized_index(id),
            Err(ParameterError::UnregisteredInstance(id))
        );
    }

    #[test]
    fn test_release_unknown_is_noop() {
        let mut params = small_allocator(2);
        assert!(!params.release_slot(InstanceId::new()));
    }

    #[test]
    fn test_released_row_is_reused_and_cleared() {
        let mut params = small_allocator(2);
        let a = InstanceId::new();
        let slot_a = params.get_or_create_slot(a).unwrap();
        params.set_channel_value(a, 0, 0.9).unwrap();
        params.set_channel_value(a, 3, 0.4).unwrap();
        assert!(params.release_slot(a));

        let d = InstanceId::new();
        let slot_d = params.get_or_create_slot(d).unwrap();
        assert_eq!(slot_d, slot_a);
        assert_eq!(params.channel_value(d, 0).unwrap(), 0.0);
        assert_eq!(params.channel_value(d, 3).unwrap(), 0.0);
    }

    #[test]
    fn test_redundant_write_is_not_dirty() {
        let mut params = small_allocator(2);
        let id = InstanceId::new();
        params.get_or_create_slot(id).unwrap();
        params.set_channel_value(id, 0, 0.5).unwrap();
        params.flush();

        params.set_channel_value(id, 0, 0.5).unwrap();
        assert!(!params.is_dirty());
        assert_eq!(params.flush(), FlushResult::default());
    }

    #[test]
    fn test_flush_region_spans_dirty_rows() {
        let mut params = small_allocator(8);
        let ids: Vec<_> = (0..5).map(|_| InstanceId::new()).collect();
        for id in &ids {
            params.get_or_create_slot(*id).unwrap();
        }
        params.flush();

        params.set_channel_value(ids[1], 0, 1.0).unwrap();
        params.set_channel_value(ids[3], 0, 1.0).unwrap();
        let flushed = params.flush();
        assert!(flushed.requires_upload);
        assert!(!flushed.resized);
        assert_eq!(
            flushed.region,
            Some(UpdatedRegion {
                first_row: 1,
                row_count: 3
            })
        );
        assert_eq!(flushed.region.unwrap().end_row(), 4);
        assert!(!params.flush().requires_upload);
    }

    #[test]
    fn test_fixed_growth_and_exhaustion() {
        let config = AllocatorConfig::new(1)
            .with_initial_rows(2)
            .with_growth(GrowthPolicy::Fixed(1))
            .with_max_rows(3);
        let mut params = ParameterAllocator::new(config).unwrap();
        params.get_or_create_slot(InstanceId::new()).unwrap();
        params.get_or_create_slot(InstanceId::new()).unwrap();
        params.get_or_create_slot(InstanceId::new()).unwrap();
        assert_eq!(params.rows(), 3);

        let overflow = InstanceId::new();
        let err = params.get_or_create_slot(overflow).unwrap_err();
        assert!(err.is_exhausted());
        assert!(!params.is_registered(overflow));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(ParameterAllocator::new(AllocatorConfig::new(0)).is_err());
    }

    #[test]
    fn test_region_union() {
        let a = UpdatedRegion {
            first_row: 2,
            row_count: 1,
        };
        let b = UpdatedRegion {
            first_row: 5,
            row_count: 3,
        };
        let merged = a.union(b);
        assert_eq!(merged.first_row, 2);
        assert_eq!(merged.end_row(), 8);
        assert_eq!(b.union(a), merged);
    }

    #[test]
    fn test_new_or_default_falls_back() {
        let params = ParameterAllocator::new_or_default(AllocatorConfig::new(0));
        assert_eq!(params.config(), &AllocatorConfig::default());

        let config = AllocatorConfig::new(8).with_initial_rows(2);
        let params = ParameterAllocator::new_or_default(config.clone());
        assert_eq!(params.config(), &config);
        assert_eq!(params.rows(), 2);
    }

    #[test]
    fn test_limit_max_rows_caps_growth() {
        let mut params = small_allocator(2);
        params.limit_max_rows(4).unwrap();
        assert_eq!(params.config().max_rows, 4);

        // A looser limit never raises the cap
        params.limit_max_rows(64).unwrap();
        assert_eq!(params.config().max_rows, 4);

        for _ in 0..4 {
            params.get_or_create_slot(InstanceId::new()).unwrap();
        }
        assert_eq!(params.rows(), 4);
        let err = params.get_or_create_slot(InstanceId::new()).unwrap_err();
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_limit_max_rows_below_current_rows_fails() {
        let mut params = small_allocator(8);
        let err = params.limit_max_rows(4).unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(params.config().max_rows, DEFAULT_MAX_ROWS);
    }
}
