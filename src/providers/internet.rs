//! Email generation provider.

use crate::providers::data::{EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES};
use crate::rng::SmithRng;

/// Generate an email address built from a name plus a free-mail domain.
pub fn generate_email(rng: &mut SmithRng) -> String {
    let first = rng.choose(FIRST_NAMES).to_lowercase();
    let last = rng.choose(LAST_NAMES).to_lowercase();
    let domain = rng.choose(EMAIL_DOMAINS);
    match rng.gen_range(0u8, 2) {
        0 => format!("{}.{}@{}", first, last, domain),
        1 => format!("{}{}@{}", first, rng.gen_range(1, 99), domain),
        _ => format!("{}_{}@{}", first, last, domain),
    }
}

/// Generate an email on a reserved example domain, safe to send to.
pub fn generate_safe_email(rng: &mut SmithRng) -> String {
    let first = rng.choose(FIRST_NAMES).to_lowercase();
    let last = rng.choose(LAST_NAMES).to_lowercase();
    let domain = rng.choose(&["example.com", "example.org", "example.net"]);
    format!("{}.{}@{}", first, last, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..50 {
            let email = generate_email(&mut rng);
            let (local, domain) = email.split_once('@').unwrap();
            assert!(!local.is_empty());
            assert!(domain.contains('.'));
            assert_eq!(email, email.to_lowercase());
        }
    }

    #[test]
    fn test_safe_email_uses_example_domains() {
        let mut rng = SmithRng::seeded(42);
        for _ in 0..20 {
            let email = generate_safe_email(&mut rng);
            assert!(email.contains("@example."));
        }
    }
}
