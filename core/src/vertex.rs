//! UI vertex format exchanged with the mesh-rebuild pipeline.

use bytemuck::{Pod, Zeroable};

/// One vertex of a UI mesh.
///
/// Effects rewrite individual fields in place; the vertex count and order of a
/// mesh are never changed by an effect.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct UiVertex {
    /// Position in canvas space.
    pub position: [f32; 3],
    /// Vertex color, RGBA8.
    pub color: [u8; 4],
    /// Primary texture coordinate.
    pub uv0: [f32; 2],
    /// Secondary texture coordinate.
    pub uv1: [f32; 2],
}

impl UiVertex {
    /// Create a white vertex at `position` with texture coordinate `uv0`.
    pub fn new(position: [f32; 3], uv0: [f32; 2]) -> Self {
        Self {
            position,
            color: [255; 4],
            uv0,
            uv1: [0.0; 2],
        }
    }
}

/// Four vertices of an axis-aligned quad, counter-clockwise from bottom-left.
pub fn quad(min: [f32; 2], max: [f32; 2]) -> [UiVertex; 4] {
    [
        UiVertex::new([min[0], min[1], 0.0], [0.0, 0.0]),
        UiVertex::new([min[0], max[1], 0.0], [0.0, 1.0]),
        UiVertex::new([max[0], max[1], 0.0], [1.0, 1.0]),
        UiVertex::new([max[0], min[1], 0.0], [1.0, 0.0]),
    ]
}
