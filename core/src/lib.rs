//! # UIFX Core
//!
//! GPU-independent building blocks for UIFX effects:
//! - [`params`] - shared parameter slot allocator
//! - [`pack`] - packing of normalized values into vertex attributes
//! - [`vertex`] - the UI vertex format

pub mod pack;
pub mod params;
pub mod vertex;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
pub fn init() {
    log::info!("UIFX Core v{} initialized", VERSION);
}
