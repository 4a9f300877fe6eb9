//! Error types for the parameter slot allocator.

use super::InstanceId;

/// Errors that can occur while allocating or writing parameter slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// A channel offset outside `[0, channels_per_row)` was requested.
    InvalidChannel {
        /// The requested channel.
        channel: usize,
        /// Number of channels available in every row.
        channels_per_row: usize,
    },
    /// A write or read was attempted before the instance acquired a slot.
    UnregisteredInstance(InstanceId),
    /// The buffer cannot grow any further.
    AllocationExhausted {
        /// Current row count.
        rows: u32,
        /// Upper bound on the row count.
        max_rows: u32,
    },
    /// The allocator configuration is not usable.
    InvalidConfig(String),
}

impl ParameterError {
    /// Returns true if this error means no slot can be handed out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AllocationExhausted { .. })
    }
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChannel {
                channel,
                channels_per_row,
            } => write!(
                f,
                "invalid channel {channel}: rows hold {channels_per_row} channels"
            ),
            Self::UnregisteredInstance(id) => {
                write!(f, "instance {id} has no parameter slot")
            }
            Self::AllocationExhausted { rows, max_rows } => write!(
                f,
                "parameter buffer exhausted: {rows} rows in use, limit is {max_rows}"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid allocator config: {msg}"),
        }
    }
}

impl std::error::Error for ParameterError {}
