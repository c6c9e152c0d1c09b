//! Fixed-point types and conversions shared by the simulation.

use fixed::types::{I32F32, I64F64};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Q64.64 fixed-point for per-tick production. Rates and multipliers stay
/// in [`Fixed64`]; their products are summed here so output past 2^31 units
/// per tick is not clipped.
pub type Fixed128 = I64F64;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
///
/// Panics on NaN or values outside the Q32.32 range; use
/// [`checked_f64_to_fixed64`] for untrusted input.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert an f64 to Fixed64, or `None` for NaN, infinities and values
/// outside the Q32.32 range.
#[inline]
pub fn checked_f64_to_fixed64(v: f64) -> Option<Fixed64> {
    if v.is_finite() {
        Fixed64::checked_from_num(v)
    } else {
        None
    }
}

/// Convert Fixed64 to f64. Use only for display, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert an integer count to Fixed64, saturating at the representable maximum.
#[inline]
pub fn count_to_fixed64(n: u64) -> Fixed64 {
    Fixed64::checked_from_num(n).unwrap_or(Fixed64::MAX)
}

/// Widen a Q32.32 value to Q64.64. Lossless.
#[inline]
pub fn widen(v: Fixed64) -> Fixed128 {
    Fixed128::from_num(v)
}

/// Convert an integer count to Fixed128, saturating above `i64::MAX`.
#[inline]
pub fn count_to_fixed128(n: u64) -> Fixed128 {
    Fixed128::checked_from_num(n).unwrap_or(Fixed128::MAX)
}

/// [`split_fractional`] for wide values. The fraction is truncated back to
/// Q32.32.
#[inline]
pub fn split_fractional_wide(v: Fixed128) -> (u64, Fixed64) {
    if v <= Fixed128::ZERO {
        return (0, Fixed64::ZERO);
    }
    let whole = v.int();
    (whole.to_num::<u64>(), Fixed64::from_num(v.frac()))
}

/// Split a non-negative value into its whole part and the fractional
/// remainder in `[0, 1)`. Negative inputs split to `(0, 0)`.
#[inline]
pub fn split_fractional(v: Fixed64) -> (u64, Fixed64) {
    if v <= Fixed64::ZERO {
        return (0, Fixed64::ZERO);
    }
    let whole = v.int();
    (whole.to_num::<u64>(), v - whole)
}

/// Multiply an integer amount by a fixed-point factor and round to the
/// nearest integer (halves round up). Computed in 128-bit so large amounts
/// never saturate.
#[inline]
pub fn scale_round(amount: u64, factor: Fixed64) -> u64 {
    if factor <= Fixed64::ZERO {
        return 0;
    }
    let bits = factor.to_bits() as u128;
    let product = amount as u128 * bits;
    let rounded = (product + (1u128 << 31)) >> 32;
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn split_whole_and_fraction() {
        let (whole, frac) = split_fractional(f64_to_fixed64(3.25));
        assert_eq!(whole, 3);
        assert_eq!(frac, f64_to_fixed64(0.25));
    }

    #[test]
    fn split_below_one() {
        let (whole, frac) = split_fractional(f64_to_fixed64(0.75));
        assert_eq!(whole, 0);
        assert_eq!(frac, f64_to_fixed64(0.75));
    }

    #[test]
    fn split_negative_clamps_to_zero() {
        assert_eq!(split_fractional(f64_to_fixed64(-2.5)), (0, Fixed64::ZERO));
    }

    #[test]
    fn split_exact_integer_has_no_fraction() {
        assert_eq!(split_fractional(Fixed64::from_num(7)), (7, Fixed64::ZERO));
    }

    #[test]
    fn scale_round_to_nearest() {
        let growth = f64_to_fixed64(1.15);
        assert_eq!(scale_round(100, growth), 115);
        assert_eq!(scale_round(20, growth), 23);
        assert_eq!(scale_round(3, f64_to_fixed64(1.5)), 5);
    }

    #[test]
    fn scale_round_large_amounts_do_not_saturate() {
        let growth = f64_to_fixed64(2.0);
        assert_eq!(scale_round(10_000_000_000, growth), 20_000_000_000);
    }

    #[test]
    fn count_conversion_saturates() {
        assert_eq!(count_to_fixed64(12), Fixed64::from_num(12));
        assert_eq!(count_to_fixed64(u64::MAX), Fixed64::MAX);
    }

    #[test]
    fn checked_conversion_rejects_nan_and_range() {
        assert_eq!(checked_f64_to_fixed64(2.5), Some(f64_to_fixed64(2.5)));
        assert_eq!(checked_f64_to_fixed64(f64::NAN), None);
        assert_eq!(checked_f64_to_fixed64(f64::INFINITY), None);
        assert_eq!(checked_f64_to_fixed64(1e12), None);
    }

    #[test]
    fn wide_split_keeps_whole_units_past_i32() {
        let big = count_to_fixed128(5_000_000_000) + widen(f64_to_fixed64(0.75));
        assert_eq!(
            split_fractional_wide(big),
            (5_000_000_000, f64_to_fixed64(0.75))
        );
        assert_eq!(
            split_fractional_wide(widen(f64_to_fixed64(-1.0))),
            (0, Fixed64::ZERO)
        );
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(1.0 / 3.0);
        assert_eq!(a * f64_to_fixed64(3.0), b * f64_to_fixed64(3.0));
    }
}
