//! `dataglance` library crate.
//!
//! The binary (`dg`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod charts;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod narrative;
pub mod plot;
pub mod profile;
pub mod report;
pub mod summary;
pub mod tui;
