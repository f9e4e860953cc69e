//! Date and time generation provider.
//!
//! Produces ISO-8601 strings within a recent window so generated records
//! look current. Chronologically ordered pairs support `created_at` /
//! `updated_at` style fields.

use chrono::{DateTime, Duration, Utc};

use crate::rng::SmithRng;

/// How far back generated timestamps may reach.
const WINDOW_DAYS: i64 = 365;

/// Generate a date string (`YYYY-MM-DD`) within the past year.
pub fn generate_date(rng: &mut SmithRng) -> String {
    generate_datetime_inner(rng).format("%Y-%m-%d").to_string()
}

/// Generate an ISO-8601 datetime within the past year.
pub fn generate_datetime(rng: &mut SmithRng) -> String {
    generate_datetime_inner(rng)
        .format("%Y-%m-%dT%H:%M:%S%z")
        .to_string()
}

/// Generate a chronologically ordered (earlier, later) datetime pair.
pub fn generate_datetime_pair(rng: &mut SmithRng) -> (String, String) {
    let a = generate_datetime_inner(rng);
    let b = generate_datetime_inner(rng);
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    (
        earlier.format("%Y-%m-%dT%H:%M:%S%z").to_string(),
        later.format("%Y-%m-%dT%H:%M:%S%z").to_string(),
    )
}

/// The current time as an ISO-8601 string.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

fn generate_datetime_inner(rng: &mut SmithRng) -> DateTime<Utc> {
    let seconds_back = rng.gen_range(0, WINDOW_DAYS * 24 * 3600);
    Utc::now() - Duration::seconds(seconds_back)
}
