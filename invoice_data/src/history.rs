//! Purchase history building
//!
//! Groups flat purchase records into one ordered history per product.
//! Product names are matched exactly (trimmed); callers must keep naming
//! consistent upstream.

use crate::PurchaseRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Counts of records dropped during ingest and history building.
///
/// Drops are non-fatal; the counts are carried into the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropStats {
    /// Lines under a document whose date could not be parsed
    pub unparseable_date: usize,
    /// Lines with a zero or missing quantity
    pub non_positive_quantity: usize,
    /// Lines with a missing, unparseable, or zero price
    pub unparseable_price: usize,
}

impl DropStats {
    /// Total number of dropped records.
    pub fn total(&self) -> usize {
        self.unparseable_date + self.non_positive_quantity + self.unparseable_price
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: &DropStats) {
        self.unparseable_date += other.unparseable_date;
        self.non_positive_quantity += other.non_positive_quantity;
        self.unparseable_price += other.unparseable_price;
    }
}

/// Ordered purchase observations for a single product.
///
/// Records are sorted by date ascending on construction (stable, so
/// same-day records keep their input order); that is the only mutation
/// path, so the ordering invariant holds for the life of the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductHistory {
    product: String,
    records: Vec<PurchaseRecord>,
}

impl ProductHistory {
    /// Build a history from records of one product, sorting by date.
    pub fn new(product: String, mut records: Vec<PurchaseRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { product, records }
    }

    /// The product name this history belongs to.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// The sorted records.
    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no observations.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observation dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Quantities in date order.
    pub fn quantities(&self) -> Vec<u32> {
        self.records.iter().map(|r| r.quantity).collect()
    }

    /// Gaps in days between consecutive observations.
    pub fn gap_days(&self) -> Vec<i64> {
        self.records
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days())
            .collect()
    }

    /// Date of the first observation.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    /// Date of the most recent observation.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Unit price of the most recent observation; latest price wins.
    pub fn latest_unit_price(&self) -> Option<f64> {
        self.records.last().map(|r| r.unit_price)
    }
}

/// Builds per-product histories from a flat record collection.
#[derive(Debug)]
pub struct HistoryBuilder;

impl HistoryBuilder {
    /// Group records by trimmed product name and sort each group by date.
    ///
    /// Records with a zero quantity are dropped and counted; everything
    /// else survives. The map is ordered by product name so iteration is
    /// deterministic.
    pub fn build(records: Vec<PurchaseRecord>) -> (BTreeMap<String, ProductHistory>, DropStats) {
        let mut grouped: BTreeMap<String, Vec<PurchaseRecord>> = BTreeMap::new();
        let mut dropped = DropStats::default();

        for record in records {
            if record.quantity == 0 {
                warn!(product = %record.product, date = %record.date, "Dropping zero-quantity record");
                dropped.non_positive_quantity += 1;
                continue;
            }
            let key = record.product.trim().to_string();
            grouped.entry(key).or_default().push(record);
        }

        let histories = grouped
            .into_iter()
            .map(|(product, records)| {
                let history = ProductHistory::new(product.clone(), records);
                (product, history)
            })
            .collect();

        (histories, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, date: (i32, u32, u32), quantity: u32) -> PurchaseRecord {
        PurchaseRecord {
            product: product.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity,
            unit_price: 3.10,
            total_price: quantity as f64 * 3.10,
        }
    }

    #[test]
    fn test_build_groups_and_sorts() {
        let records = vec![
            record("Milk", (2024, 1, 8), 2),
            record("Bread", (2024, 1, 1), 1),
            record("Milk", (2024, 1, 1), 2),
        ];

        let (histories, dropped) = HistoryBuilder::build(records);
        assert_eq!(histories.len(), 2);
        assert_eq!(dropped.total(), 0);

        let milk = &histories["Milk"];
        assert_eq!(milk.len(), 2);
        assert_eq!(milk.first_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(milk.last_date(), NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(milk.gap_days(), vec![7]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let records = vec![
            record("Milk", (2024, 1, 15), 1),
            record("Milk", (2024, 1, 1), 2),
            record("Milk", (2024, 1, 8), 2),
        ];
        let (histories, _) = HistoryBuilder::build(records);
        let milk = &histories["Milk"];

        let resorted = ProductHistory::new(milk.product().to_string(), milk.records().to_vec());
        assert_eq!(&resorted, milk);
    }

    #[test]
    fn test_same_day_ties_keep_input_order() {
        let mut first = record("Milk", (2024, 1, 1), 2);
        first.unit_price = 3.00;
        let mut second = record("Milk", (2024, 1, 1), 2);
        second.unit_price = 3.25;

        let (histories, _) = HistoryBuilder::build(vec![first, second]);
        let milk = &histories["Milk"];
        // Stable sort: the later-seen record stays last, so its price wins.
        assert_eq!(milk.latest_unit_price(), Some(3.25));
    }

    #[test]
    fn test_zero_quantity_dropped_and_counted() {
        let records = vec![record("Milk", (2024, 1, 1), 0), record("Milk", (2024, 1, 8), 2)];
        let (histories, dropped) = HistoryBuilder::build(records);
        assert_eq!(histories["Milk"].len(), 1);
        assert_eq!(dropped.non_positive_quantity, 1);
    }

    #[test]
    fn test_trimmed_names_share_history() {
        let mut padded = record("Milk", (2024, 1, 1), 2);
        padded.product = " Milk ".to_string();
        let (histories, _) = HistoryBuilder::build(vec![padded, record("Milk", (2024, 1, 8), 2)]);
        assert_eq!(histories.len(), 1);
        assert_eq!(histories["Milk"].len(), 2);
    }
}
