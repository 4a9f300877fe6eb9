//! Common types and descriptors for graphics resources.
//!
//! This module contains format enums, usage flags, and descriptor structs
//! used by the backends.

mod common;
mod texture;

pub use common::{Extent3d, Origin3d};
pub use texture::{TextureDescriptor, TextureFormat, TextureUsage};
