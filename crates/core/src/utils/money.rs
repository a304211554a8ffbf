//! Rounding helpers for currency arithmetic.
//!
//! Figures are kept as `f64` and rounded only when they cross a
//! sub-calculation boundary (cents) or are emitted for display (whole units).

use crate::constants::CURRENCY_PRECISION;

/// Rounds to cents. Halves round away from zero.
pub fn round_cents(value: f64) -> f64 {
    round_dp(value, CURRENCY_PRECISION)
}

/// Rounds to whole currency units. Halves round away from zero.
pub fn round_whole(value: f64) -> f64 {
    let rounded = value.round();
    // Normalise -0.0 so serialized output never shows a signed zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds to `dp` decimal places.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(dp);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Returns `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(10.005_1), 10.01);
        assert_eq!(round_cents(1234.5678), 1234.57);
        assert_eq!(round_cents(-0.001), 0.0);
    }

    #[test]
    fn test_round_whole() {
        assert_eq!(round_whole(10_499.6), 10_500.0);
        assert_eq!(round_whole(-0.4), 0.0);
        assert!(round_whole(-0.4).is_sign_positive());
    }

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(500.0, 0.0), 0.0);
        assert_eq!(safe_ratio(-500.0, 0.0), 0.0);
        assert_eq!(safe_ratio(250.0, 1000.0), 0.25);
    }
}
