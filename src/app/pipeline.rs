//! Shared "dashboard pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> role resolution -> column profiles -> summary -> charts -> narratives
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::PathBuf;

use crate::charts::{ChartOptions, build_charts};
use crate::data::generate_catalog;
use crate::domain::{ChartSpec, Narratives, ResolvedRoles, RoleBindings};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_dataset};
use crate::narrative::build_narratives;
use crate::profile::{ColumnProfile, profile_columns};
use crate::summary::{Summary, summarize};

/// Where the dataset comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Read a CSV/XLSX file from disk.
    File(PathBuf),
    /// Generate a seeded demo catalog in memory.
    Demo { rows: usize, seed: u64 },
}

/// Everything the pipeline needs to build one dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub bindings: RoleBindings,
    pub charts: ChartOptions,
}

/// All computed outputs of a single dashboard build.
#[derive(Debug, Clone)]
pub struct DashboardOutput {
    pub ingest: IngestedData,
    pub roles: ResolvedRoles,
    pub profiles: Vec<ColumnProfile>,
    pub summary: Summary,
    pub charts: Vec<ChartSpec>,
    pub narratives: Narratives,
}

/// Execute the full dashboard pipeline and return the computed outputs.
pub fn run_dashboard(config: &DashboardConfig) -> Result<DashboardOutput, AppError> {
    // 1) Ingest the dataset (file or demo).
    let ingest = match &config.source {
        DataSource::File(path) => load_dataset(path)?,
        DataSource::Demo { rows, seed } => {
            let dataset = generate_catalog(*rows, *seed)?;
            IngestedData::from_dataset(dataset, format!("demo catalog (seed {seed})"))
        }
    };

    run_dashboard_with_ingest(config, ingest)
}

/// Execute the pipeline on already-ingested data.
///
/// This is useful for the TUI where we want to rebuild without re-reading the file.
pub fn run_dashboard_with_ingest(
    config: &DashboardConfig,
    ingest: IngestedData,
) -> Result<DashboardOutput, AppError> {
    // 2) Resolve which column plays which role.
    let roles = config.bindings.resolve(&ingest.dataset.columns)?;

    // 3) Profile every column (numeric vs text, min/max/mean).
    let profiles = profile_columns(&ingest.dataset);

    // 4) Aggregate summary stats from the role columns.
    let summary = summarize(&ingest.dataset, &roles);

    // 5) Build chart specs and narrative text from the summary.
    let charts = build_charts(&ingest.dataset, &profiles, &summary, &config.charts);
    let narratives = build_narratives(&summary);

    Ok(DashboardOutput {
        ingest,
        roles,
        profiles,
        summary,
        charts,
        narratives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config(rows: usize, seed: u64) -> DashboardConfig {
        DashboardConfig {
            source: DataSource::Demo { rows, seed },
            bindings: RoleBindings::default(),
            charts: ChartOptions::default(),
        }
    }

    #[test]
    fn demo_pipeline_produces_a_complete_dashboard() {
        let out = run_dashboard(&demo_config(50, 7)).unwrap();

        assert_eq!(out.ingest.dataset.row_count(), 50);
        assert!(out.roles.category.is_some());
        assert!(out.roles.rating.is_some());
        assert_eq!(out.profiles.len(), 6);
        assert_eq!(out.summary.row_count, 50);
        // Pie + rating bar + price line + one bar per numeric column
        // (rating, actual_price, discounted_price).
        assert_eq!(out.charts.len(), 6);
        assert_eq!(out.narratives.insights.len(), 5);
    }

    #[test]
    fn same_seed_yields_identical_summaries() {
        let a = run_dashboard(&demo_config(30, 11)).unwrap();
        let b = run_dashboard(&demo_config(30, 11)).unwrap();
        assert_eq!(a.summary.category_counts, b.summary.category_counts);
        assert_eq!(a.charts, b.charts);
    }

    #[test]
    fn missing_override_column_surfaces_a_usage_error() {
        let mut config = demo_config(10, 3);
        config.bindings.rating = Some("no_such_column".to_string());
        let err = run_dashboard(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
