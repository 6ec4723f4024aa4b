//! Aggregation over a role-mapped dataset.
//!
//! [`summarize`] is a pure function: dataset + resolved roles in, a fresh
//! [`Summary`] out, recomputed wholesale on every dataset change. Degenerate
//! input degrades instead of erroring: a missing role column yields empty
//! sequences, and the mean of an empty sequence is `None` (never `NaN`).

use std::collections::HashMap;

use crate::domain::{ColumnRole, DashboardStats, Dataset, ResolvedRoles};

/// An ordered numeric sequence for one role, with parse failures dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSeries {
    pub values: Vec<f64>,
    pub mean: Option<f64>,
}

impl NumericSeries {
    pub fn from_values(values: Vec<f64>) -> Self {
        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };
        Self { values, mean }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Star-bucket histogram for a 1..5 rating scale.
///
/// Bucket `i` (1-based) counts ratings in `[i, i+1)`; the last bucket is
/// closed (`[5, 6]`) so a boundary rating of exactly 5.0 is still counted.
/// Everything below 1 or above 6 lands in `out_of_range`, keeping
/// `buckets.sum() + out_of_range == values.len()` exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingHistogram {
    pub buckets: [u64; 5],
    pub out_of_range: u64,
}

impl RatingHistogram {
    pub fn from_ratings(values: &[f64]) -> Self {
        let mut hist = RatingHistogram::default();
        for &r in values {
            if (1.0..6.0).contains(&r) {
                hist.buckets[r.floor() as usize - 1] += 1;
            } else if r == 6.0 {
                hist.buckets[4] += 1;
            } else {
                hist.out_of_range += 1;
            }
        }
        hist
    }

    pub fn bucketed_total(&self) -> u64 {
        self.buckets.iter().sum()
    }
}

/// Everything the charts, narratives and cards are derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub row_count: usize,
    /// Category label → occurrence count, insertion order = first-seen order.
    pub category_counts: Vec<(String, u64)>,
    pub rating: NumericSeries,
    pub price: NumericSeries,
    pub discounted_price: NumericSeries,
    pub rating_histogram: RatingHistogram,
}

impl Summary {
    /// Records that contributed a category (blank categories are skipped).
    pub fn category_total(&self) -> u64 {
        self.category_counts.iter().map(|(_, c)| c).sum()
    }

    /// Highest-count category; on ties the first-seen category wins.
    ///
    /// `Iterator::max_by` keeps the *last* maximum, so the fold is explicit.
    pub fn dominant_category(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, count) in &self.category_counts {
            match best {
                Some((_, top)) if *count <= top => {}
                _ => best = Some((name.as_str(), *count)),
            }
        }
        best
    }

    /// The scalar card values, with `None` where the data ran out.
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            record_count: self.row_count,
            category_count: self.category_counts.len(),
            avg_rating: self.rating.mean,
            avg_price: self.price.mean,
            avg_discounted_price: self.discounted_price.mean,
            dominant_category: self.dominant_category().map(|(name, _)| name.to_string()),
        }
    }
}

/// Compute the full summary in one pass per concern.
pub fn summarize(dataset: &Dataset, roles: &ResolvedRoles) -> Summary {
    let rating = NumericSeries::from_values(role_values(dataset, roles, ColumnRole::Rating));
    let price = NumericSeries::from_values(role_values(dataset, roles, ColumnRole::Price));
    let discounted_price =
        NumericSeries::from_values(role_values(dataset, roles, ColumnRole::DiscountedPrice));
    let rating_histogram = RatingHistogram::from_ratings(&rating.values);

    Summary {
        row_count: dataset.row_count(),
        category_counts: category_counts(dataset, roles),
        rating,
        price,
        discounted_price,
        rating_histogram,
    }
}

fn category_counts(dataset: &Dataset, roles: &ResolvedRoles) -> Vec<(String, u64)> {
    let Some(col) = roles.get(ColumnRole::Category) else {
        return Vec::new();
    };
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for cell in dataset.column_values(col) {
        let Some(value) = cell else { continue };
        if value.is_blank() {
            continue;
        }
        let label = value.label();
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    counts
}

fn role_values(dataset: &Dataset, roles: &ResolvedRoles, role: ColumnRole) -> Vec<f64> {
    let Some(col) = roles.get(role) else {
        return Vec::new();
    };
    dataset
        .column_values(col)
        .filter_map(|cell| cell.and_then(|v| v.as_number()))
        .collect()
}
