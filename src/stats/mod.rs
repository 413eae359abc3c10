//! Public statistics derived from conversation batches.

pub mod aggregator;

pub use aggregator::*;
