//! Fuzz testing for the constraint validator.
//!
//! Arbitrary JSON records and schema documents must produce a (possibly
//! long) error list, never a panic. Schema parsing is allowed to fail;
//! validation of whatever parses is not.
//!
//! Run with: cargo +nightly fuzz run fuzz_validate

#![no_main]

use arbitrary::Arbitrary;
use datasmith::schema::Schema;
use datasmith::validate::validate_record;
use libfuzzer_sys::fuzz_target;

/// Input structure for validator fuzzing.
#[derive(Arbitrary, Debug)]
struct ValidateInput {
    schema_json: String,
    record_json: String,
}

fuzz_target!(|input: ValidateInput| {
    let Ok(schema) = serde_json::from_str::<Schema>(&input.schema_json) else {
        return;
    };
    let Ok(serde_json::Value::Object(record)) =
        serde_json::from_str::<serde_json::Value>(&input.record_json)
    else {
        return;
    };

    let _ = validate_record(&record, &schema, &indexmap::IndexMap::new());
});
