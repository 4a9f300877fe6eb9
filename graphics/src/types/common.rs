//! Common types shared across the graphics system.

// ============================================================================
// Extent3d
// ============================================================================

/// 3D extent for textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3d {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels (1 for 2D textures).
    pub depth: u32,
}

impl Extent3d {
    /// Create a new 2D extent.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Number of texels covered by this extent.
    pub fn texel_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }
}

// ============================================================================
// Origin3d
// ============================================================================

/// Texel offset of a sub-region inside a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin3d {
    /// X offset in texels.
    pub x: u32,
    /// Y offset in texels.
    pub y: u32,
    /// Z offset in texels.
    pub z: u32,
}

impl Origin3d {
    /// The texture origin.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create an offset at row `y` of a 2D texture.
    pub fn row(y: u32) -> Self {
        Self { x: 0, y, z: 0 }
    }
}
