//! Narrative text.
//!
//! Fixed English templates with computed scalars substituted in: five
//! insights, five strategies, three strengths, three weaknesses. A template
//! whose inputs are unavailable (empty dataset, unresolved role column) is
//! omitted from its list; lists can run short but never contain `NaN` or
//! placeholder sentinels. Strategies and weaknesses are advisory text with
//! no injected data and are always present in full.

use crate::domain::Narratives;
use crate::summary::Summary;

pub fn build_narratives(summary: &Summary) -> Narratives {
    Narratives {
        insights: insights(summary),
        strategies: strategies(),
        strengths: strengths(summary),
        weaknesses: weaknesses(),
    }
}

fn insights(summary: &Summary) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(avg) = summary.rating.mean {
        out.push(format!(
            "Customers rate the catalog {avg:.2} out of 5 on average."
        ));
    }

    if let (Some(price), Some(discounted)) = (summary.price.mean, summary.discounted_price.mean) {
        if price > 0.0 {
            let pct = (price - discounted) / price * 100.0;
            out.push(format!(
                "Average list price is {price:.2} against {discounted:.2} after discounts \
                 ({pct:.0}% off on average), a clear reliance on discounting."
            ));
        }
    }

    if let Some((name, count)) = summary.dominant_category() {
        let total = summary.category_total();
        let share = count as f64 / total as f64 * 100.0;
        out.push(format!(
            "{name} is the dominant category with {count} of {total} categorized products ({share:.0}%)."
        ));
    }

    if !summary.rating.values.is_empty() {
        let below = summary.rating.values.iter().filter(|&&r| r < 3.0).count();
        let pct = below as f64 / summary.rating.values.len() as f64 * 100.0;
        out.push(format!("{pct:.0}% of rated products score below 3 stars."));
    }

    if let (Some(price), Some(discounted)) = (summary.price.mean, summary.discounted_price.mean) {
        let saving = price - discounted;
        out.push(format!(
            "Discounting takes an average of {saving:.2} off each listing."
        ));
    }

    out
}

fn strategies() -> Vec<String> {
    vec![
        "Revisit discount depth on slow movers instead of discounting across the board."
            .to_string(),
        "Expand the catalog around the dominant category, where demand is proven.".to_string(),
        "Collect more reviews for sparsely rated products to firm up the rating signal."
            .to_string(),
        "Test smaller discounts on top-rated products; strong ratings can carry fuller prices."
            .to_string(),
        "Standardize product data entry so every record carries category, rating and price."
            .to_string(),
    ]
}

fn strengths(summary: &Summary) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(avg) = summary.rating.mean {
        out.push(format!(
            "Solid average rating of {avg:.2} across rated products."
        ));
    }
    out.push("Broad category coverage spreads demand risk.".to_string());
    out.push("Consistent discounting keeps the catalog price-competitive.".to_string());
    out
}

fn weaknesses() -> Vec<String> {
    vec![
        "Ratings cluster in a narrow band, making quality differences hard to read.".to_string(),
        "Heavy discount reliance can erode margin and anchor low price expectations.".to_string(),
        "Sparse or free-text fields weaken category and rating coverage.".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, RoleBindings, Value};
    use crate::summary::summarize;

    fn text_row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| Value::Text(c.to_string())).collect()
    }

    fn catalog_summary() -> Summary {
        let dataset = Dataset::new(
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
        );
        let roles = RoleBindings::default().resolve(&dataset.columns).unwrap();
        summarize(&dataset, &roles)
    }

    #[test]
    fn full_summary_fills_every_template() {
        let narratives = build_narratives(&catalog_summary());
        assert_eq!(narratives.insights.len(), 5);
        assert_eq!(narratives.strategies.len(), 5);
        assert_eq!(narratives.strengths.len(), 3);
        assert_eq!(narratives.weaknesses.len(), 3);
    }

    #[test]
    fn dominant_category_line_names_the_leader() {
        let narratives = build_narratives(&catalog_summary());
        let line = narratives
            .insights
            .iter()
            .find(|l| l.contains("dominant category"))
            .unwrap();
        assert!(line.contains("Electronics"));
        assert!(line.contains("2 of 3"));
        assert!(line.contains("67%"));
    }

    #[test]
    fn discount_percentage_is_derived_from_means() {
        let narratives = build_narratives(&catalog_summary());
        // mean price 56.67, mean discounted 48.33, so roughly 15% off.
        let line = narratives
            .insights
            .iter()
            .find(|l| l.contains("after discounts"))
            .unwrap();
        assert!(line.contains("15% off"));
    }

    #[test]
    fn empty_summary_omits_data_dependent_lines() {
        let narratives = build_narratives(&Summary::default());
        assert!(narratives.insights.is_empty());
        assert_eq!(narratives.strategies.len(), 5);
        // The interpolated strength drops out, the advisory ones stay.
        assert_eq!(narratives.strengths.len(), 2);
        assert_eq!(narratives.weaknesses.len(), 3);
        let all: Vec<&String> = narratives
            .insights
            .iter()
            .chain(&narratives.strategies)
            .chain(&narratives.strengths)
            .chain(&narratives.weaknesses)
            .collect();
        assert!(all.iter().all(|l| !l.contains("NaN")));
    }

    #[test]
    fn low_rating_share_counts_below_three_stars() {
        let summary = Summary {
            rating: crate::summary::NumericSeries::from_values(vec![1.5, 2.9, 3.0, 4.0]),
            ..Summary::default()
        };
        let narratives = build_narratives(&summary);
        let line = narratives
            .insights
            .iter()
            .find(|l| l.contains("below 3 stars"))
            .unwrap();
        assert!(line.starts_with("50%"));
    }
}
