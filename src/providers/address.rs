//! Postal address generation provider.

use crate::providers::data::{CITIES, COUNTRIES, STATES, STREET_NAMES, STREET_SUFFIXES};
use crate::rng::SmithRng;

/// Generate a street address, e.g. `742 Maple Ave`.
pub fn generate_street_address(rng: &mut SmithRng) -> String {
    let number = rng.gen_range(1, 9999);
    let street = rng.choose(STREET_NAMES);
    let suffix = rng.choose(STREET_SUFFIXES);
    format!("{} {} {}", number, street, suffix)
}

/// Generate a city name.
#[inline]
pub fn generate_city(rng: &mut SmithRng) -> String {
    rng.choose(CITIES).to_string()
}

/// Generate a two-letter state abbreviation.
#[inline]
pub fn generate_state(rng: &mut SmithRng) -> String {
    rng.choose(STATES).to_string()
}

/// Generate a 5-digit zip code.
#[inline]
pub fn generate_zip_code(rng: &mut SmithRng) -> String {
    rng.digits(5)
}

/// Generate a country code.
#[inline]
pub fn generate_country(rng: &mut SmithRng) -> String {
    rng.choose(COUNTRIES).to_string()
}

/// Generate a full single-line address.
pub fn generate_address(rng: &mut SmithRng) -> String {
    format!(
        "{}, {}, {} {}",
        generate_street_address(rng),
        generate_city(rng),
        generate_state(rng),
        generate_zip_code(rng)
    )
}
