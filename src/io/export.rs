//! Export the category summary to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::summary::Summary;

/// Write the category frequency table (`category,count,share`) to a CSV file.
pub fn write_summary_csv(path: &Path, summary: &Summary) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!(
            "Failed to create summary CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "category,count,share")
        .map_err(|e| AppError::usage(format!("Failed to write summary CSV header: {e}")))?;

    let total = summary.category_total();
    for (name, count) in &summary.category_counts {
        let share = if total > 0 {
            *count as f64 / total as f64
        } else {
            0.0
        };
        writeln!(file, "{},{},{:.4}", csv_field(name), count, share)
            .map_err(|e| AppError::usage(format!("Failed to write summary CSV row: {e}")))?;
    }

    Ok(())
}

/// Quote a field when it would break the row.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
