//! Monthly budget aggregation over finalized batches

use crate::batching::OrderBatch;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Projected spend per calendar month.
///
/// Pure aggregation of finalized batches: each batch's subtotal plus
/// delivery fee lands in the month of its batch date. Keys are `YYYY-MM`
/// labels, so lexical order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyBudget {
    totals: BTreeMap<String, f64>,
}

impl MonthlyBudget {
    /// Aggregate a finalized batch sequence.
    pub fn from_batches(batches: &[OrderBatch]) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for batch in batches {
            let label = batch.batch_date.format("%Y-%m").to_string();
            *totals.entry(label).or_insert(0.0) += batch.total();
        }
        Self { totals }
    }

    /// The month label → spend mapping, in chronological order.
    pub fn totals(&self) -> &BTreeMap<String, f64> {
        &self.totals
    }

    /// Projected spend for one month label, if any batch landed there.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.totals.get(label).copied()
    }

    /// Sum over all months.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Whether no batch contributed any spend.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl fmt::Display for MonthlyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated Monthly Budget:")?;
        for (month, total) in &self.totals {
            writeln!(f, "  {}: ${:.2}", month, total)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::ProjectedOrder;
    use chrono::NaiveDate;

    fn batch(on: (i32, u32, u32), subtotal: f64, delivery_fee: f64) -> OrderBatch {
        let date = NaiveDate::from_ymd_opt(on.0, on.1, on.2).unwrap();
        OrderBatch {
            batch_date: date,
            members: vec![ProjectedOrder {
                product: "Milk".to_string(),
                order_date: date,
                quantity: 1,
                unit_price: subtotal,
                line_total: subtotal,
            }],
            subtotal,
            delivery_fee,
            below_minimum: false,
            merged_from: Vec::new(),
        }
    }

    #[test]
    fn test_batches_aggregate_by_month() {
        let batches = vec![
            batch((2024, 2, 1), 60.0, 2.0),
            batch((2024, 2, 20), 55.0, 2.0),
            batch((2024, 3, 5), 70.0, 2.0),
        ];

        let budget = MonthlyBudget::from_batches(&batches);
        assert_eq!(budget.get("2024-02"), Some(119.0));
        assert_eq!(budget.get("2024-03"), Some(72.0));
        assert_eq!(budget.get("2024-04"), None);
    }

    #[test]
    fn test_budget_total_matches_batch_totals() {
        let batches = vec![
            batch((2024, 2, 1), 60.0, 2.0),
            batch((2024, 3, 5), 70.0, 2.0),
            batch((2024, 4, 9), 31.5, 2.0),
        ];
        let budget = MonthlyBudget::from_batches(&batches);

        let batch_sum: f64 = batches.iter().map(|b| b.total()).sum();
        assert!((budget.total() - batch_sum).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batches_give_empty_budget() {
        let budget = MonthlyBudget::from_batches(&[]);
        assert!(budget.is_empty());
        assert_eq!(budget.total(), 0.0);
    }

    #[test]
    fn test_labels_sort_chronologically() {
        let batches = vec![
            batch((2024, 12, 1), 60.0, 2.0),
            batch((2025, 1, 15), 60.0, 2.0),
        ];
        let budget = MonthlyBudget::from_batches(&batches);
        let labels: Vec<_> = budget.totals().keys().cloned().collect();
        assert_eq!(labels, vec!["2024-12", "2025-01"]);
    }
}
