//! Forecast report assembly and rendering
//!
//! The report bundles everything a run produced: the batch schedule, the
//! monthly budget, products skipped for thin history, and drop counts from
//! ingest. `Display` renders the console plan; `Serialize` is the
//! machine-readable form.

use crate::batching::OrderBatch;
use crate::budget::MonthlyBudget;
use chrono::NaiveDate;
use invoice_data::DropStats;
use serde::Serialize;
use std::fmt;

/// A product excluded from projection for lack of history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedProduct {
    pub product: String,
    /// How many observations it had (always fewer than two)
    pub observations: usize,
}

/// Full output of one forecast run.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    /// Reference date the forecast was computed from
    pub today: NaiveDate,
    /// Days ahead that were projected
    pub horizon_days: i64,
    /// Finalized delivery batches in date order
    pub batches: Vec<OrderBatch>,
    /// Projected spend per calendar month
    pub budget: MonthlyBudget,
    /// Products with insufficient history to forecast
    pub skipped: Vec<SkippedProduct>,
    /// Records dropped during ingest and history building
    pub dropped: DropStats,
}

impl ForecastReport {
    /// Total projected spend across all batches, delivery fees included.
    pub fn total_spend(&self) -> f64 {
        self.batches.iter().map(|b| b.total()).sum()
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ForecastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Predicted orders for the next {} days from {}:",
            self.horizon_days, self.today
        )?;

        if self.batches.is_empty() {
            writeln!(f, "  No orders due in this window.")?;
        }

        for (i, batch) in self.batches.iter().enumerate() {
            let status = if batch.below_minimum {
                " [BELOW MIN]"
            } else {
                ""
            };
            writeln!(f)?;
            writeln!(
                f,
                "Order #{} - {} - items ${:.2} + delivery ${:.2} = ${:.2}{}",
                i + 1,
                batch.batch_date,
                batch.subtotal,
                batch.delivery_fee,
                batch.total(),
                status
            )?;
            for merged in &batch.merged_from {
                writeln!(f, "  (absorbed orders from {})", merged)?;
            }
            writeln!(
                f,
                "  {:<50} | {:>4} | {:>8} | {:>8}",
                "Product", "Qty", "Unit $", "Total $"
            )?;
            for member in &batch.members {
                writeln!(
                    f,
                    "  {:<50} | {:>4} | {:>8.2} | {:>8.2}",
                    truncate(&member.product, 50),
                    member.quantity,
                    member.unit_price,
                    member.line_total
                )?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.budget)?;
        writeln!(f, "  Total: ${:.2}", self.total_spend())?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Insufficient history ({} products not forecast):",
                self.skipped.len()
            )?;
            for skipped in &self.skipped {
                writeln!(
                    f,
                    "  {} ({} observation{})",
                    skipped.product,
                    skipped.observations,
                    if skipped.observations == 1 { "" } else { "s" }
                )?;
            }
        }

        if self.dropped.total() > 0 {
            writeln!(f)?;
            writeln!(
                f,
                "Dropped {} malformed record(s): {} undated, {} zero-quantity, {} unpriced",
                self.dropped.total(),
                self.dropped.unparseable_date,
                self.dropped.non_positive_quantity,
                self.dropped.unparseable_price
            )?;
        }

        Ok(())
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.len() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::ProjectedOrder;

    fn sample_report() -> ForecastReport {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let batch = OrderBatch {
            batch_date: date,
            members: vec![ProjectedOrder {
                product: "Full Cream Milk 2L".to_string(),
                order_date: date,
                quantity: 2,
                unit_price: 3.10,
                line_total: 6.20,
            }],
            subtotal: 6.20,
            delivery_fee: 2.0,
            below_minimum: true,
            merged_from: Vec::new(),
        };
        let budget = MonthlyBudget::from_batches(std::slice::from_ref(&batch));

        ForecastReport {
            today: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            horizon_days: 30,
            batches: vec![batch],
            budget,
            skipped: vec![SkippedProduct {
                product: "Saffron 1g".to_string(),
                observations: 1,
            }],
            dropped: DropStats::default(),
        }
    }

    #[test]
    fn test_display_mentions_key_sections() {
        let rendered = sample_report().to_string();
        assert!(rendered.contains("Order #1"));
        assert!(rendered.contains("BELOW MIN"));
        assert!(rendered.contains("Full Cream Milk 2L"));
        assert!(rendered.contains("2024-02: $8.20"));
        assert!(rendered.contains("Saffron 1g"));
    }

    #[test]
    fn test_json_round_trips_structure() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["batches"][0]["members"][0]["quantity"], 2);
        assert_eq!(value["horizon_days"], 30);
    }

    #[test]
    fn test_truncate_long_names() {
        let long = "A".repeat(60);
        let short = truncate(&long, 50);
        assert_eq!(short.len(), 50);
        assert!(short.ends_with("..."));
    }
}
