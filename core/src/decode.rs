//! Stateless swatch decoder: sampled color + declared kind -> value.

use pxwatch_types::{Color, ValueKind};

/// Decode a swatch color into its integer value.
///
/// Booleans come back as 0/1; the threshold on the green channel is
/// strict (`> 128`) and tolerant of rendering/compression noise.
/// Integers are 24 bits packed across the three channels, giving one
/// swatch up to 16,777,216 distinct states.
pub fn decode(color: Color, kind: ValueKind) -> i64 {
    match kind {
        ValueKind::Bool => i64::from(color.g > 128),
        ValueKind::Int => {
            (i64::from(color.r) << 16) | (i64::from(color.g) << 8) | i64::from(color.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_above_threshold() {
        assert_eq!(decode(Color::new(0, 200, 0), ValueKind::Bool), 1);
    }

    #[test]
    fn test_bool_below_threshold() {
        assert_eq!(decode(Color::new(0, 100, 0), ValueKind::Bool), 0);
    }

    #[test]
    fn test_bool_exactly_threshold_is_false() {
        // Strict greater-than: 128 itself decodes false
        assert_eq!(decode(Color::new(0, 128, 0), ValueKind::Bool), 0);
    }

    #[test]
    fn test_int_packing() {
        assert_eq!(decode(Color::new(1, 2, 3), ValueKind::Int), 66051);
    }

    #[test]
    fn test_int_extremes() {
        assert_eq!(decode(Color::new(0, 0, 0), ValueKind::Int), 0);
        assert_eq!(decode(Color::new(255, 255, 255), ValueKind::Int), 0xFF_FF_FF);
    }
}
