//! Raw batch input: file loading and sample generation.

pub mod loader;
pub mod sample;

pub use loader::*;
