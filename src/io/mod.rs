//! Input/output helpers.
//!
//! - CSV/XLSX ingest (`ingest`)
//! - category summary export (`export`)
//! - dashboard JSON read/write (`dashboard`)

pub mod dashboard;
pub mod export;
pub mod ingest;

pub use dashboard::*;
pub use export::*;
pub use ingest::*;
