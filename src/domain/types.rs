//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while deriving a dashboard
//! - exported to JSON/CSV
//! - reloaded later for re-rendering without recomputation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single cell as produced by ingestion: free text or a finite number.
///
/// Ingestion types a cell as `Number` only when the *whole* field parses as a
/// finite float; everything else stays `Text`. Downstream numeric logic goes
/// through [`Value::as_number`], which also accepts loose numeric prefixes in
/// text cells.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    /// Numeric view of the cell, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => loose_number(s),
        }
    }

    /// True when the cell carries nothing usable (empty/whitespace text).
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Number(_) => false,
            Value::Text(s) => s.trim().is_empty(),
        }
    }

    /// Label form used for grouping and display. Trimmed for text cells.
    pub fn label(&self) -> String {
        match self {
            Value::Text(s) => s.trim().to_string(),
            Value::Number(n) => format!("{n}"),
        }
    }
}

/// Permissive float parse in the longest-leading-prefix style.
///
/// `"42abc"` parses as `42`, `"-2.5kg"` as `-2.5`, `"1e3x"` as `1000`.
/// Leading/trailing whitespace is ignored. Returns `None` when no prefix
/// parses, or when the parsed value is not finite (`inf`, `nan`, overflow):
/// non-finite numbers must never enter the aggregates.
pub fn loose_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // Longest prefix that is valid float syntax wins; cells are short, so
    // the backwards scan is cheap.
    for end in (1..=s.len()).rev() {
        if !s.is_char_boundary(end) {
            continue;
        }
        if let Ok(v) = s[..end].parse::<f64>() {
            return v.is_finite().then_some(v);
        }
    }
    None
}

/// A rectangular dataset with ordered columns and ordered rows.
///
/// Rows may be shorter than the header; a missing trailing cell reads as
/// absent. The dataset is created wholesale by ingestion and replaced
/// wholesale on reload or reset; nothing mutates it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell accessor tolerant of short rows.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of one column, `None` where the row is short.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&Value>> {
        self.rows.iter().map(move |row| row.get(col))
    }
}

/// Comparison form for header names: trimmed, BOM-stripped, lowercased.
///
/// Stored headers keep their original casing for display; every name match
/// in role resolution goes through this.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

/// The column roles the aggregator consumes.
///
/// Roles replace the hardcoded column names of ad-hoc product dashboards:
/// any dataset can be mapped onto them, and an unmapped role degrades to
/// empty aggregates instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Category,
    Rating,
    Price,
    DiscountedPrice,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Category,
        ColumnRole::Rating,
        ColumnRole::Price,
        ColumnRole::DiscountedPrice,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ColumnRole::Category => "category",
            ColumnRole::Rating => "rating",
            ColumnRole::Price => "price",
            ColumnRole::DiscountedPrice => "discounted price",
        }
    }

    /// The conventional header name, matched exactly (case-insensitive).
    fn conventional(self) -> &'static str {
        match self {
            ColumnRole::Category => "category",
            ColumnRole::Rating => "rating",
            ColumnRole::Price => "actual_price",
            ColumnRole::DiscountedPrice => "discounted_price",
        }
    }

    /// Fallback names, tried per column in column order.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            ColumnRole::Category => &["group", "type"],
            ColumnRole::Rating => &["stars"],
            ColumnRole::Price => &["price", "list_price"],
            ColumnRole::DiscountedPrice => &["sale_price", "discount_price"],
        }
    }
}

/// Explicit role overrides from the CLI. `None` means "resolve by name".
#[derive(Debug, Clone, Default)]
pub struct RoleBindings {
    pub category: Option<String>,
    pub rating: Option<String>,
    pub price: Option<String>,
    pub discounted_price: Option<String>,
}

impl RoleBindings {
    fn override_for(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::Category => self.category.as_deref(),
            ColumnRole::Rating => self.rating.as_deref(),
            ColumnRole::Price => self.price.as_deref(),
            ColumnRole::DiscountedPrice => self.discounted_price.as_deref(),
        }
    }

    /// Resolve every role against the header.
    ///
    /// Per role: explicit override first (an override naming a column that
    /// does not exist is a usage error), then the conventional name, then
    /// synonyms, first match in column order. A role with no match resolves
    /// to `None`.
    pub fn resolve(&self, columns: &[String]) -> Result<ResolvedRoles, AppError> {
        let normalized: Vec<String> = columns.iter().map(|c| normalize_column_name(c)).collect();
        let find = |name: &str| {
            let want = normalize_column_name(name);
            normalized.iter().position(|c| *c == want)
        };

        let mut roles = ResolvedRoles::default();
        for role in ColumnRole::ALL {
            let idx = if let Some(name) = self.override_for(role) {
                match find(name) {
                    Some(i) => Some(i),
                    None => {
                        return Err(AppError::usage(format!(
                            "{} column '{}' not found; columns are: {}",
                            role.display_name(),
                            name,
                            columns.join(", ")
                        )));
                    }
                }
            } else if let Some(i) = find(role.conventional()) {
                Some(i)
            } else {
                normalized
                    .iter()
                    .position(|c| role.synonyms().contains(&c.as_str()))
            };
            roles.set(role, idx);
        }
        Ok(roles)
    }
}

/// Column index per role, after resolution against a concrete header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub category: Option<usize>,
    pub rating: Option<usize>,
    pub price: Option<usize>,
    pub discounted_price: Option<usize>,
}

impl ResolvedRoles {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Category => self.category,
            ColumnRole::Rating => self.rating,
            ColumnRole::Price => self.price,
            ColumnRole::DiscountedPrice => self.discounted_price,
        }
    }

    fn set(&mut self, role: ColumnRole, idx: Option<usize>) {
        match role {
            ColumnRole::Category => self.category = idx,
            ColumnRole::Rating => self.rating = idx,
            ColumnRole::Price => self.price = idx,
            ColumnRole::DiscountedPrice => self.discounted_price = idx,
        }
    }
}

/// Renderer-agnostic chart kind.
///
/// A `Line` chart may carry more than one series (price vs discounted price
/// is a two-series line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        }
    }
}

/// One named sequence of values inside a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub values: Vec<f64>,
}

/// A complete chart description, independent of any renderer.
///
/// `labels` annotate positions (slice names for pie, x labels otherwise) and
/// may be shorter or longer than the series; renderers pair them up index by
/// index and fall back to the index itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesSpec>,
}

/// The scalar card values shown at the top of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub record_count: usize,
    pub category_count: usize,
    pub avg_rating: Option<f64>,
    pub avg_price: Option<f64>,
    pub avg_discounted_price: Option<f64>,
    pub dominant_category: Option<String>,
}

/// Templated narrative text, grouped the way the dashboard shows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narratives {
    pub insights: Vec<String>,
    pub strategies: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// A saved dashboard file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub rows: usize,
    pub rows_skipped: usize,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub stats: DashboardStats,
    pub charts: Vec<ChartSpec>,
    pub narratives: Narratives,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_number_accepts_prefixes() {
        assert_eq!(loose_number("42"), Some(42.0));
        assert_eq!(loose_number("42abc"), Some(42.0));
        assert_eq!(loose_number("-2.5kg"), Some(-2.5));
        assert_eq!(loose_number("1e3x"), Some(1000.0));
        assert_eq!(loose_number(" 7.25 "), Some(7.25));
        assert_eq!(loose_number(".5"), Some(0.5));
        assert_eq!(loose_number("0x1A"), Some(0.0));
    }

    #[test]
    fn loose_number_rejects_garbage_and_non_finite() {
        assert_eq!(loose_number(""), None);
        assert_eq!(loose_number("   "), None);
        assert_eq!(loose_number("abc"), None);
        assert_eq!(loose_number("$12"), None);
        assert_eq!(loose_number("nan"), None);
        assert_eq!(loose_number("inf"), None);
        assert_eq!(loose_number("1e999"), None);
    }

    #[test]
    fn value_views() {
        assert_eq!(Value::Number(3.5).as_number(), Some(3.5));
        assert_eq!(Value::Text("3.5 stars".into()).as_number(), Some(3.5));
        assert_eq!(Value::Text("n/a".into()).as_number(), None);
        assert!(Value::Text("  ".into()).is_blank());
        assert!(!Value::Number(0.0).is_blank());
        assert_eq!(Value::Text("  Books ".into()).label(), "Books");
        assert_eq!(Value::Number(2.0).label(), "2");
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn roles_resolve_conventional_names_case_insensitively() {
        let columns = cols(&["Product", "Category", "RATING", "actual_price", "discounted_price"]);
        let roles = RoleBindings::default().resolve(&columns).unwrap();
        assert_eq!(roles.category, Some(1));
        assert_eq!(roles.rating, Some(2));
        assert_eq!(roles.price, Some(3));
        assert_eq!(roles.discounted_price, Some(4));
    }

    #[test]
    fn roles_fall_back_to_synonyms_in_column_order() {
        let columns = cols(&["name", "list_price", "price", "stars", "type"]);
        let roles = RoleBindings::default().resolve(&columns).unwrap();
        // "price" is listed before "list_price" as a synonym, but column
        // order wins: list_price appears first in the header.
        assert_eq!(roles.price, Some(1));
        assert_eq!(roles.rating, Some(3));
        assert_eq!(roles.category, Some(4));
        assert_eq!(roles.discounted_price, None);
    }

    #[test]
    fn role_override_beats_names_and_missing_override_errors() {
        let columns = cols(&["category", "other", "rating"]);
        let bindings = RoleBindings {
            category: Some("Other".into()),
            ..RoleBindings::default()
        };
        let roles = bindings.resolve(&columns).unwrap();
        assert_eq!(roles.category, Some(1));

        let bad = RoleBindings {
            rating: Some("missing".into()),
            ..RoleBindings::default()
        };
        let err = bad.resolve(&columns).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn unmatched_roles_resolve_to_none() {
        let columns = cols(&["a", "b"]);
        let roles = RoleBindings::default().resolve(&columns).unwrap();
        assert_eq!(roles, ResolvedRoles::default());
    }

    #[test]
    fn bom_headers_still_match() {
        let columns = cols(&["\u{feff}Category", "rating"]);
        let roles = RoleBindings::default().resolve(&columns).unwrap();
        assert_eq!(roles.category, Some(0));
    }
}
