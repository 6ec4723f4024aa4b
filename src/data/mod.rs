//! Built-in data sources.
//!
//! - seeded demo catalog generation (`sample`)

pub mod sample;

pub use sample::*;
