//! Column classification.
//!
//! Each column is profiled independently: a column is **numeric** only when
//! every row has a cell there and every cell parses to a finite number under
//! the loose parse. One non-conforming cell (or a short row) demotes the
//! whole column to text. An empty dataset has no numeric columns; the
//! vacuous reading ("all zero rows conform") would put meaningless axes on
//! charts downstream.
//!
//! Profiling is a total operation: any dataset in, profiles out, no errors.
//! Columns are independent, so the work fans out per column and collects
//! back in header order.

use rayon::prelude::*;

use crate::domain::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Aggregate stats for a numeric column. Values are finite by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Cells that are present and non-blank.
    pub non_empty: usize,
    /// Present exactly when `kind == Numeric`.
    pub stats: Option<NumericStats>,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// Profile every column, in header order.
///
/// Output depends only on the dataset contents; the per-column fan-out does
/// not affect ordering.
pub fn profile_columns(dataset: &Dataset) -> Vec<ColumnProfile> {
    (0..dataset.column_count())
        .into_par_iter()
        .map(|col| profile_one(dataset, col))
        .collect()
}

/// Names of the numeric columns, in header order.
pub fn numeric_columns(profiles: &[ColumnProfile]) -> Vec<&str> {
    profiles
        .iter()
        .filter(|p| p.is_numeric())
        .map(|p| p.name.as_str())
        .collect()
}

fn profile_one(dataset: &Dataset, col: usize) -> ColumnProfile {
    let name = dataset.columns[col].clone();
    let mut non_empty = 0usize;
    let mut numbers: Vec<f64> = Vec::with_capacity(dataset.row_count());
    let mut all_numeric = !dataset.is_empty();

    for cell in dataset.column_values(col) {
        match cell {
            Some(v) => {
                if !v.is_blank() {
                    non_empty += 1;
                }
                match v.as_number() {
                    Some(n) => numbers.push(n),
                    None => all_numeric = false,
                }
            }
            // Short row: the cell is absent, so the column cannot be
            // uniformly numeric.
            None => all_numeric = false,
        }
    }

    if all_numeric {
        let stats = numeric_stats(&numbers);
        ColumnProfile {
            name,
            kind: ColumnKind::Numeric,
            non_empty,
            stats,
        }
    } else {
        ColumnProfile {
            name,
            kind: ColumnKind::Text,
            non_empty,
            stats: None,
        }
    }
}

fn numeric_stats(values: &[f64]) -> Option<NumericStats> {
    if values.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v;
    }
    Some(NumericStats {
        min,
        max,
        mean: sum / values.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;

    fn dataset(columns: &[&str], rows: &[&[Value]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter().map(|r| r.to_vec()).collect(),
        )
    }

    fn t(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn detects_numeric_and_text_columns() {
        let ds = dataset(
            &["name", "rating", "price"],
            &[
                &[t("Phone"), n(4.5), t("199.99")],
                &[t("Lamp"), t("3.9"), t("25")],
            ],
        );
        let profiles = profile_columns(&ds);
        assert_eq!(profiles[0].kind, ColumnKind::Text);
        assert_eq!(profiles[1].kind, ColumnKind::Numeric);
        assert_eq!(profiles[2].kind, ColumnKind::Numeric);
        assert_eq!(numeric_columns(&profiles), vec!["rating", "price"]);
    }

    #[test]
    fn one_bad_cell_demotes_the_column() {
        let ds = dataset(
            &["rating"],
            &[&[n(4.0)], &[t("n/a")], &[n(3.0)]],
        );
        let profiles = profile_columns(&ds);
        assert_eq!(profiles[0].kind, ColumnKind::Text);
        assert!(numeric_columns(&profiles).is_empty());
    }

    #[test]
    fn short_row_demotes_the_column() {
        let ds = dataset(
            &["a", "b"],
            &[&[n(1.0), n(2.0)], &[n(3.0)]],
        );
        let profiles = profile_columns(&ds);
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!(profiles[1].kind, ColumnKind::Text);
    }

    #[test]
    fn loose_prefixes_count_as_numeric() {
        let ds = dataset(&["w"], &[&[t("42kg")], &[t("-2.5kg")]]);
        let profiles = profile_columns(&ds);
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        let stats = profiles[0].stats.unwrap();
        assert_eq!(stats.min, -2.5);
        assert_eq!(stats.max, 42.0);
    }

    #[test]
    fn empty_dataset_has_no_numeric_columns() {
        let ds = dataset(&["a", "b"], &[]);
        let profiles = profile_columns(&ds);
        assert!(profiles.iter().all(|p| p.kind == ColumnKind::Text));
        assert!(numeric_columns(&profiles).is_empty());
    }

    #[test]
    fn stats_cover_min_max_mean_and_non_empty() {
        let ds = dataset(&["x"], &[&[n(1.0)], &[n(2.0)], &[n(6.0)]]);
        let p = &profile_columns(&ds)[0];
        assert_eq!(p.non_empty, 3);
        let stats = p.stats.unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
        assert!((stats.mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn adding_rows_never_adds_numeric_columns() {
        let full = dataset(
            &["a", "b"],
            &[&[n(1.0), t("x")], &[t("oops"), t("y")]],
        );
        let head = dataset(&["a", "b"], &[full.rows[0].as_slice()]);
        let of_full: Vec<_> = numeric_columns(&profile_columns(&full))
            .into_iter()
            .map(str::to_string)
            .collect();
        let of_head: Vec<_> = numeric_columns(&profile_columns(&head))
            .into_iter()
            .map(str::to_string)
            .collect();
        assert!(of_full.iter().all(|c| of_head.contains(c)));
    }
}
