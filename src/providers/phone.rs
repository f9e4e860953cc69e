//! Phone number generation provider.

use crate::rng::SmithRng;

/// Generate a North American phone number, e.g. `(555) 123-4567`.
pub fn generate_phone_number(rng: &mut SmithRng) -> String {
    let area = rng.gen_range(201, 989);
    let exchange = rng.gen_range(200, 999);
    let line = rng.gen_range(0, 9999);
    format!("({}) {}-{:04}", area, exchange, line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_format() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..20 {
            let phone = generate_phone_number(&mut rng);
            assert!(phone.starts_with('('));
            assert_eq!(phone.len(), 14);
            assert!(phone.contains(") "));
            assert!(phone.contains('-'));
        }
    }
}
