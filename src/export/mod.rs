//! Published artifacts: the sanitized export and the stats document.

pub mod generator;

pub use generator::*;
