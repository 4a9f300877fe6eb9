//! CPU-side storage for the parameter grid.

/// A `rows × channels_per_row` grid of `f32` parameters.
///
/// The width is fixed for the buffer's lifetime. The height only grows, and
/// growing keeps every existing value at the same `(row, channel)` position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBuffer {
    channels_per_row: usize,
    rows: u32,
    data: Vec<f32>,
}

impl ParameterBuffer {
    /// Create a zero-filled buffer.
    pub fn new(channels_per_row: usize, rows: u32) -> Self {
        Self {
            channels_per_row,
            rows,
            data: vec![0.0; channels_per_row * rows as usize],
        }
    }

    /// Channels stored in every row.
    pub fn channels_per_row(&self) -> usize {
        self.channels_per_row
    }

    /// Current row count.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// The whole grid, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Channels of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: u32) -> &[f32] {
        let start = self.row_start(row);
        &self.data[start..start + self.channels_per_row]
    }

    /// Read one channel, or `None` when out of bounds.
    pub fn get(&self, row: u32, channel: usize) -> Option<f32> {
        if row >= self.rows || channel >= self.channels_per_row {
            return None;
        }
        Some(self.data[self.row_start(row) + channel])
    }

    /// Write one channel. Returns true if the stored value changed.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `channel` is out of bounds.
    pub fn set(&mut self, row: u32, channel: usize, value: f32) -> bool {
        assert!(channel < self.channels_per_row, "channel out of bounds");
        let index = self.row_start(row) + channel;
        if self.data[index].to_bits() == value.to_bits() {
            return false;
        }
        self.data[index] = value;
        true
    }

    /// Zero every channel of a row.
    pub fn clear_row(&mut self, row: u32) {
        let start = self.row_start(row);
        self.data[start..start + self.channels_per_row].fill(0.0);
    }

    /// Grow to `rows` rows. Shrinking is ignored.
    pub fn grow(&mut self, rows: u32) {
        if rows <= self.rows {
            return;
        }
        self.data.resize(self.channels_per_row * rows as usize, 0.0);
        self.rows = rows;
    }

    fn row_start(&self, row: u32) -> usize {
        assert!(row < self.rows, "row {row} out of bounds ({})", self.rows);
        row as usize * self.channels_per_row
    }
}
