//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the cell/dataset model (`Value`, `Dataset`) and the loose numeric parse
//! - column-role configuration (`ColumnRole`, `RoleBindings`, `ResolvedRoles`)
//! - renderer-agnostic chart descriptors (`ChartKind`, `ChartSpec`)
//! - export schemas (`DashboardStats`, `Narratives`, `DashboardFile`)

pub mod types;

pub use types::*;
