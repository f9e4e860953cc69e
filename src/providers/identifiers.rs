//! Identifier generation provider.
//!
//! UUIDs, SKUs, and format-template expansion for patterned IDs like
//! `CRT-{year}-{random:7}`.

use chrono::{Datelike, Utc};

use crate::providers::data::SKU_CATEGORIES;
use crate::rng::SmithRng;

/// Generate a UUIDv4 string.
///
/// Bytes come from the seeded RNG, so a seeded run reproduces its IDs.
/// Not suitable for cryptographic purposes.
pub fn generate_uuid(rng: &mut SmithRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);

    // Set version (4) and variant (RFC 4122)
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    uuid::Uuid::from_bytes(bytes).to_string()
}

/// Generate a category-prefixed SKU, e.g. `BEAUTY-483920`.
pub fn generate_sku(rng: &mut SmithRng) -> String {
    let category = rng.choose(SKU_CATEGORIES);
    format!("{}-{}", category, rng.digits(6))
}

/// Expand a format template.
///
/// Supported placeholders:
/// - `{year}`: the current calendar year
/// - `{random:N}`: N random decimal digits
///
/// Unrecognized text passes through verbatim.
pub fn apply_format(rng: &mut SmithRng, template: &str) -> String {
    let mut result = template.replace("{year}", &Utc::now().year().to_string());

    while let Some(start) = result.find("{random:") {
        let Some(rel_end) = result[start..].find('}') else {
            break;
        };
        let end = start + rel_end;
        let n: usize = result[start + "{random:".len()..end]
            .parse()
            .unwrap_or(0);
        let digits = rng.digits(n);
        result.replace_range(start..=end, &digits);
    }

    result
}
