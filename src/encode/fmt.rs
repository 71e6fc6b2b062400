//! Shared value formatting for the four encoders.
//!
//! All grammars agree on numeric representation: every float is rounded
//! to [`crate::util::ROUND_PRECISION`] decimals and printed in shortest
//! decimal form, so round-tripping through any two encodings yields
//! numerically equivalent data.

use glam::{Vec2, Vec3, Vec4};

use crate::util::round_to_precision;

/// Format a float: fixed rounding, shortest decimal representation.
pub fn fmt_f32(v: f32) -> String {
    let rounded = round_to_precision(v);
    // -0.0 and 0.0 must not differ between runs of the same input.
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Rounded f64 for the key/value grammar's number type.
pub fn json_f64(v: f32) -> f64 {
    round_to_precision(v) as f64
}

pub fn fmt_vec2(v: Vec2) -> String {
    format!("{} {}", fmt_f32(v.x), fmt_f32(v.y))
}

pub fn fmt_vec3(v: Vec3) -> String {
    format!("{} {} {}", fmt_f32(v.x), fmt_f32(v.y), fmt_f32(v.z))
}

pub fn fmt_vec4(v: Vec4) -> String {
    format!("{} {} {} {}", fmt_f32(v.x), fmt_f32(v.y), fmt_f32(v.z), fmt_f32(v.w))
}

/// Space-joined scalar run for attribute-style multi-value fields.
pub fn fmt_list<T, F: Fn(&T) -> String>(items: &[T], f: F) -> String {
    items.iter().map(|i| f(i)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_f32() {
        assert_eq!(fmt_f32(0.5), "0.5");
        assert_eq!(fmt_f32(1.0), "1");
        assert_eq!(fmt_f32(-0.000_001), "0");
        assert_eq!(fmt_f32(0.123_456_78), "0.12346");
    }

    #[test]
    fn test_fmt_vec() {
        assert_eq!(fmt_vec3(Vec3::new(1.0, 0.25, -2.0)), "1 0.25 -2");
    }

    #[test]
    fn test_fmt_list() {
        let run = fmt_list(&[1i32, -1, 2], |v| v.to_string());
        assert_eq!(run, "1 -1 2");
    }
}
