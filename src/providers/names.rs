//! Name generation provider.

use crate::providers::data::{FIRST_NAMES, LAST_NAMES};
use crate::rng::SmithRng;

/// Generate a full name (first + last).
pub fn generate_name(rng: &mut SmithRng) -> String {
    let first = rng.choose(FIRST_NAMES);
    let last = rng.choose(LAST_NAMES);
    format!("{} {}", first, last)
}

/// Generate a first name.
#[inline]
pub fn generate_first_name(rng: &mut SmithRng) -> String {
    rng.choose(FIRST_NAMES).to_string()
}

/// Generate a last name.
#[inline]
pub fn generate_last_name(rng: &mut SmithRng) -> String {
    rng.choose(LAST_NAMES).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_has_two_parts() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..50 {
            let name = generate_name(&mut rng);
            assert_eq!(name.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_first_name_from_table() {
        let mut rng = SmithRng::seeded(42);
        let name = generate_first_name(&mut rng);
        assert!(FIRST_NAMES.contains(&name.as_str()));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut rng1 = SmithRng::seeded(7);
        let mut rng2 = SmithRng::seeded(7);
        for _ in 0..20 {
            assert_eq!(generate_name(&mut rng1), generate_name(&mut rng2));
        }
    }
}
