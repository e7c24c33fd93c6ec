//! Utility helpers for building synthetic purchase data
//!
//! Used by tests, examples, and benchmarking runs that need plausible
//! purchase histories without a real extractor snapshot.

use crate::PurchaseRecord;
use chrono::{Duration, NaiveDate};
use rand::{thread_rng, Rng};

/// Generate a synthetic purchase history for one product.
///
/// Orders are spaced `interval_days` apart with up to ±1 day of jitter,
/// and quantities vary around `base_quantity`.
///
/// # Arguments
/// * `product` - Product name for every generated record
/// * `start` - Date of the first order
/// * `interval_days` - Nominal days between orders (minimum 1)
/// * `orders` - Number of records to generate
/// * `base_quantity` - Typical units per order (minimum 1)
/// * `unit_price` - Price per unit
pub fn generate_product_records(
    product: &str,
    start: NaiveDate,
    interval_days: i64,
    orders: usize,
    base_quantity: u32,
    unit_price: f64,
) -> Vec<PurchaseRecord> {
    let mut rng = thread_rng();
    let interval_days = interval_days.max(1);
    let base_quantity = base_quantity.max(1);
    let mut records = Vec::with_capacity(orders);
    let mut date = start;

    for i in 0..orders {
        let quantity = rng.gen_range(base_quantity.saturating_sub(1).max(1)..=base_quantity + 1);
        records.push(PurchaseRecord {
            product: product.to_string(),
            date,
            quantity,
            unit_price,
            total_price: quantity as f64 * unit_price,
        });

        // Jitter every step except the first so histories stay irregular
        // the way real invoice data is.
        let jitter = if i == 0 { 0 } else { rng.gen_range(-1..=1) };
        let step = (interval_days + jitter).max(1);
        date = date + Duration::days(step);
    }

    records
}

/// Generate records for several products with staggered cadences.
///
/// Product `n` reorders roughly every `base_interval_days + n` days, which
/// gives batching tests a spread of order dates to group.
pub fn generate_basket(
    products: &[&str],
    start: NaiveDate,
    base_interval_days: i64,
    orders_per_product: usize,
) -> Vec<PurchaseRecord> {
    let mut records = Vec::new();
    for (i, product) in products.iter().enumerate() {
        let interval = base_interval_days + i as i64;
        let price = 2.50 + i as f64 * 1.25;
        records.extend(generate_product_records(
            product,
            start,
            interval,
            orders_per_product,
            2,
            price,
        ));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_product_records() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = generate_product_records("Milk", start, 7, 5, 2, 3.10);

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].date, start);
        for record in &records {
            assert!(record.quantity >= 1);
            assert!(record.total_price > 0.0);
        }
        // Dates strictly increase because the jittered step is floored at 1.
        for pair in records.windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
    }

    #[test]
    fn test_generate_basket_covers_all_products() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records = generate_basket(&["Milk", "Bread", "Eggs"], start, 7, 3);
        assert_eq!(records.len(), 9);
        assert!(records.iter().any(|r| r.product == "Eggs"));
    }
}
