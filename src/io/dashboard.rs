//! Read/write dashboard JSON files.
//!
//! Dashboard JSON is the "portable" representation of one derived dashboard:
//! - source metadata (file, row/column counts, skipped rows)
//! - the scalar card values and numeric column list
//! - every chart spec and the four narrative lists
//!
//! `dg plot` re-renders these files without recomputing anything.
//! The schema is defined by `domain::DashboardFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{ChartSpec, DashboardFile, DashboardStats, Narratives};
use crate::error::AppError;
use crate::io::ingest::IngestedData;

/// Assemble the export schema from the derived pieces.
pub fn build_dashboard_file(
    ingest: &IngestedData,
    numeric_columns: &[&str],
    stats: DashboardStats,
    charts: &[ChartSpec],
    narratives: &Narratives,
) -> DashboardFile {
    DashboardFile {
        tool: "dg".to_string(),
        generated_at: Utc::now(),
        source: ingest.source.clone(),
        rows: ingest.dataset.row_count(),
        rows_skipped: ingest.rows_skipped(),
        columns: ingest.dataset.columns.clone(),
        numeric_columns: numeric_columns.iter().map(|c| c.to_string()).collect(),
        stats,
        charts: charts.to_vec(),
        narratives: narratives.clone(),
    }
}

/// Write a dashboard JSON file.
pub fn write_dashboard_json(path: &Path, dashboard: &DashboardFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create dashboard JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, dashboard)
        .map_err(|e| AppError::usage(format!("Failed to write dashboard JSON: {e}")))?;
    Ok(())
}

/// Read a dashboard JSON file.
pub fn read_dashboard_json(path: &Path) -> Result<DashboardFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to open dashboard JSON '{}': {e}",
            path.display()
        ))
    })?;
    let dashboard: DashboardFile = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid dashboard JSON: {e}")))?;
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartKind, Dataset, SeriesSpec, Value};

    fn sample_file() -> DashboardFile {
        let ingest = IngestedData::from_dataset(
            Dataset::new(
                vec!["category".into(), "rating".into()],
                vec![vec![Value::Text("Books".into()), Value::Number(4.5)]],
            ),
            "sample.csv",
        );
        let charts = vec![ChartSpec {
            title: "Category Distribution".into(),
            kind: ChartKind::Pie,
            labels: vec!["Books".into()],
            series: vec![SeriesSpec {
                name: "products".into(),
                values: vec![1.0],
            }],
        }];
        let stats = DashboardStats {
            record_count: 1,
            category_count: 1,
            avg_rating: Some(4.5),
            avg_price: None,
            avg_discounted_price: None,
            dominant_category: Some("Books".into()),
        };
        build_dashboard_file(&ingest, &["rating"], stats, &charts, &Narratives::default())
    }

    #[test]
    fn dashboard_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let dashboard = sample_file();

        write_dashboard_json(&path, &dashboard).unwrap();
        let loaded = read_dashboard_json(&path).unwrap();

        assert_eq!(loaded, dashboard);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = read_dashboard_json(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn none_means_serialize_as_null_not_nan() {
        let dashboard = sample_file();
        let json = serde_json::to_string(&dashboard).unwrap();
        assert!(json.contains("\"avg_price\":null"));
        assert!(!json.contains("NaN"));
    }
}
