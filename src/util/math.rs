//! Math type re-exports and fixed-precision rounding.
//!
//! Every float that reaches an encoder goes through the rounding helpers
//! here, so repeated exports of the same input are bit-stable and all four
//! encodings agree on numeric values.

// Re-export glam types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Decimal digits kept when rounding exported values.
///
/// Fixed, not user-configurable: vertex dedup keys and encoder output both
/// depend on it, and changing it would split vertices differently between
/// two exports of the same mesh.
pub const ROUND_PRECISION: i32 = 5;

const ROUND_SCALE: f64 = 100_000.0; // 10^ROUND_PRECISION

/// Round a value to [`ROUND_PRECISION`] decimal digits.
#[inline]
pub fn round_to_precision(v: f32) -> f32 {
    ((v as f64 * ROUND_SCALE).round() / ROUND_SCALE) as f32
}

/// Round a slice of values to [`ROUND_PRECISION`] decimal digits.
pub fn round_array(values: &[f32]) -> Vec<f32> {
    values.iter().map(|&v| round_to_precision(v)).collect()
}

/// Fixed-point representation used as a hash/equality key.
///
/// Two values compare equal iff they round to the same
/// [`ROUND_PRECISION`]-digit decimal.
#[inline]
pub fn quantize(v: f32) -> i64 {
    (v as f64 * ROUND_SCALE).round() as i64
}

/// Clamp a float to a finite value at the point it enters a field.
///
/// NaN becomes 0.0, infinities saturate. Encoders can then assume every
/// stored float is representable in all four grammars.
#[inline]
pub fn sanitize(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else if v == f32::INFINITY {
        f32::MAX
    } else if v == f32::NEG_INFINITY {
        f32::MIN
    } else {
        v
    }
}

/// Clamp each color channel to [0, 1].
pub fn clamp_color3(c: Vec3) -> Vec3 {
    c.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Clamp each color channel to [0, 1].
pub fn clamp_color4(c: Vec4) -> Vec4 {
    c.clamp(Vec4::ZERO, Vec4::ONE)
}

/// Axis-angle rotation extracted from a matrix, as (axis, angle).
pub fn matrix_to_axis_angle(m: &Mat4) -> (Vec3, f32) {
    let (_, rot, _) = m.to_scale_rotation_translation();
    let (axis, angle) = rot.to_axis_angle();
    (axis.normalize_or_zero(), angle)
}

/// Forward direction (-Z) of a matrix, normalized.
pub fn matrix_direction_neg_z(m: &Mat4) -> Vec3 {
    m.transform_vector3(Vec3::NEG_Z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(0.123_456_78), 0.123_46);
        assert_eq!(round_to_precision(-1.000_004), -1.0);
        assert_eq!(round_to_precision(0.0), 0.0);
    }

    #[test]
    fn test_quantize_splits_only_past_precision() {
        // Differ in the 6th decimal: same key.
        assert_eq!(quantize(0.100_001), quantize(0.100_002));
        // Differ in the 5th decimal: distinct keys.
        assert_ne!(quantize(0.100_01), quantize(0.100_02));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::INFINITY), f32::MAX);
        assert_eq!(sanitize(f32::NEG_INFINITY), f32::MIN);
        assert_eq!(sanitize(1.5), 1.5);
    }

    #[test]
    fn test_clamp_color() {
        let c = clamp_color3(Vec3::new(-0.5, 0.5, 1.5));
        assert_eq!(c, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_matrix_direction() {
        let m = Mat4::IDENTITY;
        assert_eq!(matrix_direction_neg_z(&m), Vec3::NEG_Z);
    }
}
