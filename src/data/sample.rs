//! Synthetic product-catalog generation for the demo dashboard.
//!
//! The generated dataset carries the conventional role columns (`category`,
//! `rating`, `actual_price`, `discounted_price`) plus id/name text columns,
//! so every panel of the dashboard has something to show. Generation is
//! fully seeded: the same seed and row count always produce the same
//! dataset.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{Dataset, Value};
use crate::error::AppError;

/// Category mix, weights summing to 1.
const CATEGORIES: [(&str, f64); 5] = [
    ("Electronics", 0.34),
    ("Home & Kitchen", 0.26),
    ("Books", 0.16),
    ("Toys & Games", 0.14),
    ("Beauty", 0.10),
];

/// Generate a seeded demo catalog with `rows` products.
pub fn generate_catalog(rows: usize, seed: u64) -> Result<Dataset, AppError> {
    if rows == 0 {
        return Err(AppError::usage("Demo row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let rating_dist: Normal<f64> = Normal::new(4.1, 0.5)
        .map_err(|e| AppError::render(format!("Rating distribution error: {e}")))?;
    // Log-normal keeps prices positive with a realistic long tail.
    let price_dist: LogNormal<f64> = LogNormal::new(6.0, 0.9)
        .map_err(|e| AppError::render(format!("Price distribution error: {e}")))?;

    let columns = vec![
        "product_id".to_string(),
        "product_name".to_string(),
        "category".to_string(),
        "rating".to_string(),
        "actual_price".to_string(),
        "discounted_price".to_string(),
    ];

    let mut data_rows = Vec::with_capacity(rows);
    for i in 0..rows {
        let category = pick_category(&mut rng);
        let rating = round1(rating_dist.sample(&mut rng).clamp(1.0, 5.0));
        let price = round2(price_dist.sample(&mut rng).max(1.0));
        let discount: f64 = rng.gen_range(0.05..0.60);
        let discounted = round2((price * (1.0 - discount)).max(0.5));

        data_rows.push(vec![
            Value::Text(format!("P{:05}", i + 1)),
            Value::Text(format!("{category} Item {:03}", i + 1)),
            Value::Text(category.to_string()),
            Value::Number(rating),
            Value::Number(price),
            Value::Number(discounted),
        ]);
    }

    Ok(Dataset::new(columns, data_rows))
}

fn pick_category(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.r#gen();
    let mut acc = 0.0;
    for (name, weight) in CATEGORIES {
        acc += weight;
        if roll < acc {
            return name;
        }
    }
    CATEGORIES[CATEGORIES.len() - 1].0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_catalog() {
        let a = generate_catalog(50, 42).unwrap();
        let b = generate_catalog(50, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_catalog(50, 1).unwrap();
        let b = generate_catalog(50, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn catalog_carries_the_conventional_columns() {
        let ds = generate_catalog(10, 7).unwrap();
        assert_eq!(
            ds.columns,
            vec![
                "product_id",
                "product_name",
                "category",
                "rating",
                "actual_price",
                "discounted_price"
            ]
        );
        assert_eq!(ds.row_count(), 10);
    }

    #[test]
    fn generated_values_stay_in_range() {
        let ds = generate_catalog(200, 42).unwrap();
        for row in &ds.rows {
            let Value::Number(rating) = row[3] else {
                panic!("rating should be numeric")
            };
            let Value::Number(price) = row[4] else {
                panic!("price should be numeric")
            };
            let Value::Number(discounted) = row[5] else {
                panic!("discounted price should be numeric")
            };
            assert!((1.0..=5.0).contains(&rating));
            assert!(price >= 1.0);
            assert!(discounted > 0.0);
            assert!(discounted <= price);
        }
    }

    #[test]
    fn zero_rows_is_a_usage_error() {
        let err = generate_catalog(0, 42).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
