//! Numeric value generation provider.
//!
//! Bounds come from user-supplied schemas, so generators are total: an
//! inverted range is normalized instead of failing, keeping the synthetic
//! path a universal fallback.

use crate::rng::SmithRng;

/// Generate an integer in `[min, max]` (bounds swapped if inverted).
pub fn generate_integer(rng: &mut SmithRng, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo, hi)
}

/// Generate a float in `[min, max]`, rounded to 2 decimals.
pub fn generate_float(rng: &mut SmithRng, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let value = if lo == hi { lo } else { rng.gen_range(lo, hi) };
    round2(value)
}

/// Round to 2 decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_in_range() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..100 {
            let v = generate_integer(&mut rng, 18, 65);
            assert!((18..=65).contains(&v));
        }
    }

    #[test]
    fn test_integer_inverted_range_normalized() {
        let mut rng = SmithRng::seeded(42);
        let v = generate_integer(&mut rng, 10, 1);
        assert!((1..=10).contains(&v));
    }

    #[test]
    fn test_float_rounding() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..100 {
            let v = generate_float(&mut rng, 0.01, 999.99);
            assert!((0.01..=999.99).contains(&v));
            assert_eq!(v, round2(v));
        }
    }

    #[test]
    fn test_float_degenerate_range() {
        let mut rng = SmithRng::seeded(42);
        assert_eq!(generate_float(&mut rng, 5.0, 5.0), 5.0);
    }
}
