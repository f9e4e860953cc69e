//! Fuzz testing for format-template expansion.
//!
//! Arbitrary templates must never panic or loop: unterminated placeholders,
//! huge digit counts, and unicode all pass through or expand cleanly.
//!
//! Run with: cargo +nightly fuzz run fuzz_apply_format

#![no_main]

use arbitrary::Arbitrary;
use datasmith::providers::identifiers::apply_format;
use datasmith::rng::SmithRng;
use libfuzzer_sys::fuzz_target;

/// Input structure for format fuzzing.
#[derive(Arbitrary, Debug)]
struct FormatInput {
    seed: u64,
    template: String,
}

fuzz_target!(|input: FormatInput| {
    // Cap template length to keep expansion bounded.
    if input.template.len() > 512 {
        return;
    }
    let mut rng = SmithRng::seeded(input.seed);
    let _ = apply_format(&mut rng, &input.template);
});
