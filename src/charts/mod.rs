//! Chart derivation.
//!
//! [`build_charts`] turns a summary into a fixed, ordered list of
//! renderer-agnostic [`ChartSpec`]s. The order and content depend only on
//! the inputs, so equal datasets produce structurally equal chart lists
//! (snapshot-friendly).
//!
//! The fixed order:
//!
//! 1. category pie
//! 2. rating-histogram bar (x labels `"1".."5"`)
//! 3. price vs discounted-price line, both series truncated to the first
//!    `price_points` parsed values in dataset order (a legibility cap, not
//!    an error), emitted only when a price series exists
//! 4. one bar per numeric column, capped at `numeric_charts`, plotting raw
//!    per-record values against the 1-based record index

use crate::domain::{ChartKind, ChartSpec, ColumnRole, Dataset, SeriesSpec};
use crate::profile::ColumnProfile;
use crate::summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    /// Truncation cap for the price comparison line.
    pub price_points: usize,
    /// Cap on per-numeric-column bar charts.
    pub numeric_charts: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            price_points: 20,
            numeric_charts: 4,
        }
    }
}

pub fn build_charts(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    summary: &Summary,
    options: &ChartOptions,
) -> Vec<ChartSpec> {
    let mut charts = Vec::new();
    charts.push(category_pie(summary));
    charts.push(rating_bar(summary));
    if let Some(chart) = price_line(summary, options.price_points) {
        charts.push(chart);
    }
    charts.extend(numeric_column_bars(dataset, profiles, options.numeric_charts));
    charts
}

fn category_pie(summary: &Summary) -> ChartSpec {
    ChartSpec {
        title: "Category Distribution".to_string(),
        kind: ChartKind::Pie,
        labels: summary
            .category_counts
            .iter()
            .map(|(name, _)| name.clone())
            .collect(),
        series: vec![SeriesSpec {
            name: "products".to_string(),
            values: summary
                .category_counts
                .iter()
                .map(|(_, count)| *count as f64)
                .collect(),
        }],
    }
}

fn rating_bar(summary: &Summary) -> ChartSpec {
    ChartSpec {
        title: "Ratings Distribution".to_string(),
        kind: ChartKind::Bar,
        labels: (1..=5).map(|star| star.to_string()).collect(),
        series: vec![SeriesSpec {
            name: "ratings".to_string(),
            values: summary
                .rating_histogram
                .buckets
                .iter()
                .map(|&count| count as f64)
                .collect(),
        }],
    }
}

fn price_line(summary: &Summary, price_points: usize) -> Option<ChartSpec> {
    let price: Vec<f64> = summary.price.values.iter().copied().take(price_points).collect();
    let discounted: Vec<f64> = summary
        .discounted_price
        .values
        .iter()
        .copied()
        .take(price_points)
        .collect();
    if price.is_empty() && discounted.is_empty() {
        return None;
    }
    let points = price.len().max(discounted.len());
    Some(ChartSpec {
        title: "Price vs Discounted Price".to_string(),
        kind: ChartKind::Line,
        labels: (1..=points).map(|i| format!("Product {i}")).collect(),
        series: vec![
            SeriesSpec {
                name: ColumnRole::Price.display_name().to_string(),
                values: price,
            },
            SeriesSpec {
                name: ColumnRole::DiscountedPrice.display_name().to_string(),
                values: discounted,
            },
        ],
    })
}

fn numeric_column_bars(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    cap: usize,
) -> Vec<ChartSpec> {
    profiles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_numeric())
        .take(cap)
        .map(|(col, profile)| {
            let values: Vec<f64> = dataset
                .column_values(col)
                .filter_map(|cell| cell.and_then(|v| v.as_number()))
                .collect();
            ChartSpec {
                title: format!("Distribution of {}", profile.name),
                kind: ChartKind::Bar,
                labels: (1..=values.len()).map(|i| i.to_string()).collect(),
                series: vec![SeriesSpec {
                    name: profile.name.clone(),
                    values,
                }],
            }
        })
        .collect()
}
