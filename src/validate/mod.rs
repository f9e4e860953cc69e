//! Record validation.
//!
//! [`constraint`] checks records against schema and request constraints;
//! [`coherence`] grades how internally consistent a record is. Both are
//! pure: no I/O, no shared state.

pub mod coherence;
pub mod constraint;

pub use coherence::CoherenceScorer;
pub use constraint::{validate_record, ValidationError};
