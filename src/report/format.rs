//! Formatted terminal output for the dashboard.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for snapshot-style tests)
//!
//! Missing values render as `-`; no `NaN` ever reaches the terminal.

use crate::domain::Narratives;
use crate::io::ingest::IngestedData;
use crate::profile::{ColumnKind, ColumnProfile};
use crate::summary::Summary;

/// Format the full text dashboard: provenance, columns, summary cards,
/// top categories and the narrative lists.
pub fn format_dashboard(
    ingest: &IngestedData,
    profiles: &[ColumnProfile],
    summary: &Summary,
    narratives: &Narratives,
    top_n: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format_header(ingest, profiles));
    out.push_str(&format_columns(profiles));
    out.push_str(&format_summary(summary));
    out.push_str(&format_top_categories(summary, top_n));
    out.push_str(&format_narratives(narratives));
    out.push_str(&format_row_issues(ingest));
    out
}

/// The scriptable subset: provenance, columns, summary and categories only.
pub fn format_stats(
    ingest: &IngestedData,
    profiles: &[ColumnProfile],
    summary: &Summary,
    top_n: usize,
) -> String {
    let mut out = String::new();
    out.push_str(&format_header(ingest, profiles));
    out.push_str(&format_columns(profiles));
    out.push_str(&format_summary(summary));
    out.push_str(&format_top_categories(summary, top_n));
    out.push_str(&format_row_issues(ingest));
    out
}

fn format_header(ingest: &IngestedData, profiles: &[ColumnProfile]) -> String {
    let numeric = profiles.iter().filter(|p| p.is_numeric()).count();
    let mut out = String::new();
    out.push_str("=== dg - dataset dashboard ===\n");
    out.push_str(&format!("Source: {}\n", ingest.source));
    out.push_str(&format!(
        "Rows: {} read | {} used | {} skipped\n",
        ingest.rows_read,
        ingest.dataset.row_count(),
        ingest.rows_skipped()
    ));
    out.push_str(&format!(
        "Columns: {} ({numeric} numeric)\n",
        profiles.len()
    ));
    out
}

fn format_columns(profiles: &[ColumnProfile]) -> String {
    let mut out = String::new();
    out.push_str("\nColumns:\n");
    if profiles.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for p in profiles {
        let kind = match p.kind {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        };
        match &p.stats {
            Some(s) => out.push_str(&format!(
                "  {:<24} {:<8} non-empty={:<6} min={:.2} max={:.2} mean={:.2}\n",
                truncate(&p.name, 24),
                kind,
                p.non_empty,
                s.min,
                s.max,
                s.mean
            )),
            None => out.push_str(&format!(
                "  {:<24} {:<8} non-empty={}\n",
                truncate(&p.name, 24),
                kind,
                p.non_empty
            )),
        }
    }
    out
}

fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("\nSummary:\n");
    out.push_str(&format!("- records: {}\n", summary.row_count));
    out.push_str(&format!(
        "- categories: {}\n",
        summary.category_counts.len()
    ));
    out.push_str(&format!(
        "- avg rating: {}\n",
        fmt_opt(summary.rating.mean)
    ));
    out.push_str(&format!("- avg price: {}\n", fmt_opt(summary.price.mean)));
    out.push_str(&format!(
        "- avg discounted price: {}\n",
        fmt_opt(summary.discounted_price.mean)
    ));
    out.push_str(&format!(
        "- dominant category: {}\n",
        summary
            .dominant_category()
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    if summary.rating_histogram.out_of_range > 0 {
        out.push_str(&format!(
            "- ratings outside 1..5 scale: {}\n",
            summary.rating_histogram.out_of_range
        ));
    }
    out
}

fn format_top_categories(summary: &Summary, top_n: usize) -> String {
    let mut out = String::new();
    out.push_str("\nTop categories:\n");
    if summary.category_counts.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    out.push_str(&format!("  {:<24} {:>8} {:>8}\n", "category", "count", "share"));
    out.push_str(&format!("  {:-<24} {:-<8} {:-<8}\n", "", "", ""));
    let total = summary.category_total();
    for (name, count) in summary.category_counts.iter().take(top_n) {
        let share = *count as f64 / total as f64 * 100.0;
        out.push_str(&format!(
            "  {:<24} {:>8} {:>7.1}%\n",
            truncate(name, 24),
            count,
            share
        ));
    }
    let remaining = summary.category_counts.len().saturating_sub(top_n);
    if remaining > 0 {
        out.push_str(&format!("  ... and {remaining} more\n"));
    }
    out
}

fn format_narratives(narratives: &Narratives) -> String {
    let mut out = String::new();
    push_list(&mut out, "Insights", &narratives.insights);
    push_list(&mut out, "Strategies", &narratives.strategies);
    push_list(&mut out, "Strengths", &narratives.strengths);
    push_list(&mut out, "Weaknesses", &narratives.weaknesses);
    out
}

fn push_list(out: &mut String, title: &str, lines: &[String]) {
    out.push_str(&format!("\n{title}:\n"));
    if lines.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    for line in lines {
        out.push_str(&format!("- {line}\n"));
    }
}

fn format_row_issues(ingest: &IngestedData) -> String {
    if ingest.row_errors.is_empty() {
        return String::new();
    }
    const SHOWN: usize = 8;
    let mut out = String::new();
    out.push_str("\nRow issues:\n");
    for err in ingest.row_errors.iter().take(SHOWN) {
        out.push_str(&format!("- line {}: {}\n", err.line, err.message));
    }
    let remaining = ingest.row_errors.len().saturating_sub(SHOWN);
    if remaining > 0 {
        out.push_str(&format!("- ... and {remaining} more\n"));
    }
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, RoleBindings, Value};
    use crate::io::ingest::RowError;
    use crate::narrative::build_narratives;
    use crate::profile::profile_columns;
    use crate::summary::summarize;

    fn text_row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| Value::Text(c.to_string())).collect()
    }

    fn catalog_ingest() -> IngestedData {
        IngestedData::from_dataset(
            Dataset::new(
                vec![
                    "category".into(),
                    "rating".into(),
                    "actual_price".into(),
                    "discounted_price".into(),
                ],
                vec![
                    text_row(&["Electronics", "4.5", "100", "80"]),
                    text_row(&["Electronics", "3.2", "50", "50"]),
                    text_row(&["Books", "5.0", "20", "15"]),
                ],
            ),
            "catalog.csv",
        )
    }

    #[test]
    fn dashboard_report_carries_the_card_values() {
        let ingest = catalog_ingest();
        let profiles = profile_columns(&ingest.dataset);
        let roles = RoleBindings::default()
            .resolve(&ingest.dataset.columns)
            .unwrap();
        let summary = summarize(&ingest.dataset, &roles);
        let narratives = build_narratives(&summary);
        let report = format_dashboard(&ingest, &profiles, &summary, &narratives, 10);

        assert!(report.contains("Source: catalog.csv"));
        assert!(report.contains("Columns: 4 (3 numeric)"));
        assert!(report.contains("- avg rating: 4.23"));
        assert!(report.contains("- avg price: 56.67"));
        assert!(report.contains("- dominant category: Electronics"));
        let row = report
            .lines()
            .find(|l| l.trim_start().starts_with("Electronics"))
            .unwrap();
        assert!(row.ends_with("66.7%"));
        assert!(row.contains(" 2 "));
        assert!(report.contains("Insights:"));
        assert!(report.contains("Weaknesses:"));
    }

    #[test]
    fn empty_dataset_renders_placeholders_not_nan() {
        let ingest = IngestedData::from_dataset(
            Dataset::new(vec!["category".into(), "rating".into()], vec![]),
            "empty.csv",
        );
        let profiles = profile_columns(&ingest.dataset);
        let roles = RoleBindings::default()
            .resolve(&ingest.dataset.columns)
            .unwrap();
        let summary = summarize(&ingest.dataset, &roles);
        let narratives = build_narratives(&summary);
        let report = format_dashboard(&ingest, &profiles, &summary, &narratives, 10);

        assert!(report.contains("- avg rating: -"));
        assert!(report.contains("- dominant category: -"));
        assert!(report.contains("Top categories:\n  (none)"));
        assert!(!report.contains("NaN"));
    }

    #[test]
    fn row_issues_section_lists_line_numbers() {
        let mut ingest = catalog_ingest();
        ingest.rows_read += 1;
        ingest.row_errors.push(RowError {
            line: 4,
            message: "CSV parse error: bad field".into(),
        });
        let profiles = profile_columns(&ingest.dataset);
        let roles = RoleBindings::default()
            .resolve(&ingest.dataset.columns)
            .unwrap();
        let summary = summarize(&ingest.dataset, &roles);
        let report = format_stats(&ingest, &profiles, &summary, 10);

        assert!(report.contains("Row issues:"));
        assert!(report.contains("- line 4: CSV parse error"));
        assert!(report.contains("1 skipped"));
    }

    #[test]
    fn long_category_names_are_truncated() {
        assert_eq!(truncate("short", 24), "short");
        let long = "a".repeat(40);
        let cut = truncate(&long, 24);
        assert_eq!(cut.chars().count(), 24);
        assert!(cut.ends_with('.'));
    }
}
