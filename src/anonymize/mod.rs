//! Anonymization of raw conversation records.
//!
//! `scrubber` rewrites the PII fields, `cohort` supplies the legacy
//! digest the placeholders embed, and `audit` verifies scrubbed output
//! before it is published.

pub mod audit;
pub mod cohort;
pub mod scrubber;

pub use scrubber::*;
