//! Terminal report rendering.

pub mod format;

pub use format::*;
