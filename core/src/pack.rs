//! Packing of normalized values into single floats.
//!
//! UI vertices have few spare attributes, so effects squeeze several values in
//! `[0, 1]` into one float. Each value is clamped, quantized, and stored in its
//! own bit range of an integer that stays below 2^24, the range an `f32`
//! represents exactly. Shaders decode with `fmod` and `floor`, mirroring
//! [`unpack_uv`].

/// Quantization steps for two-component packing (12 bits per component).
pub const UV_PRECISION: u32 = (1 << 12) - 1;

#[inline]
fn quantize(value: f32, precision: u32) -> u32 {
    (value.clamp(0.0, 1.0) * precision as f32).floor() as u32
}

/// Pack two values in `[0, 1]` into one float at 12-bit precision.
///
/// `x` occupies the low 12 bits, `y` the next 12.
///
/// ```
/// use uifx_core::pack::{pack_uv, unpack_uv};
///
/// let packed = pack_uv(0.25, 0.75);
/// assert_eq!(packed, 12_579_839.0);
/// let (x, y) = unpack_uv(packed);
/// assert!((x - 0.25).abs() < 1.0 / 4095.0);
/// assert!((y - 0.75).abs() < 1.0 / 4095.0);
/// ```
pub fn pack_uv(x: f32, y: f32) -> f32 {
    let x = quantize(x, UV_PRECISION);
    let y = quantize(y, UV_PRECISION);
    ((y << 12) + x) as f32
}

/// Inverse of [`pack_uv`], up to quantization.
pub fn unpack_uv(packed: f32) -> (f32, f32) {
    let bits = packed.max(0.0) as u32;
    let x = (bits & UV_PRECISION) as f32 / UV_PRECISION as f32;
    let y = ((bits >> 12) & UV_PRECISION) as f32 / UV_PRECISION as f32;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_uv_known_value() {
        // 0.25 * 4095 -> 1023, 0.75 * 4095 -> 3071
        assert_eq!(pack_uv(0.25, 0.75), (3071 * 4096 + 1023) as f32);
    }

    #[test]
    fn test_pack_uv_extremes() {
        assert_eq!(pack_uv(0.0, 0.0), 0.0);
        assert_eq!(pack_uv(1.0, 1.0), 16_777_215.0);
        assert_eq!(unpack_uv(pack_uv(1.0, 1.0)), (1.0, 1.0));
    }

    #[test]
    fn test_pack_uv_clamps() {
        assert_eq!(pack_uv(-1.0, 2.0), pack_uv(0.0, 1.0));
    }

    #[test]
    fn test_pack_uv_components_do_not_bleed() {
        let (x, y) = unpack_uv(pack_uv(1.0, 0.0));
        assert_eq!((x, y), (1.0, 0.0));
        let (x, y) = unpack_uv(pack_uv(0.0, 1.0));
        assert_eq!((x, y), (0.0, 1.0));
    }
}
