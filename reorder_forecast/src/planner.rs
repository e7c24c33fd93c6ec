//! End-to-end forecast planning
//!
//! Wires the pipeline together: history building → interval estimation →
//! forward projection → batching → monthly budget. One call, one immutable
//! input snapshot, one report; nothing is carried between runs.

use crate::batching::OrderBatcher;
use crate::budget::MonthlyBudget;
use crate::config::ForecastConfig;
use crate::error::Result;
use crate::models::mean_interval::MeanIntervalEstimator;
use crate::models::{Estimate, ProductModel, ReorderEstimator};
use crate::projector::{ForwardProjector, ProjectedOrder};
use crate::report::{ForecastReport, SkippedProduct};
use chrono::NaiveDate;
use invoice_data::{HistoryBuilder, PurchaseRecord, StockSnapshot};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Runs the full forecast pipeline over a purchase record snapshot.
#[derive(Debug, Clone)]
pub struct ForecastPlanner {
    config: ForecastConfig,
}

impl ForecastPlanner {
    /// Create a planner, validating the configuration up front.
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this planner runs with.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Compute a forecast report from flat purchase records.
    ///
    /// An empty or fully-dropped input yields an empty report; "no orders
    /// due" is a valid outcome, not an error.
    pub fn plan(
        &self,
        records: Vec<PurchaseRecord>,
        stock: Option<&StockSnapshot>,
        today: NaiveDate,
    ) -> Result<ForecastReport> {
        let (histories, dropped) = HistoryBuilder::build(records);
        info!(
            products = histories.len(),
            dropped = dropped.total(),
            "Built purchase histories"
        );

        let estimator = MeanIntervalEstimator::new(&self.config);
        let mut models: BTreeMap<String, ProductModel> = BTreeMap::new();
        let mut skipped: Vec<SkippedProduct> = Vec::new();

        for (product, history) in &histories {
            match estimator.estimate(history)? {
                Estimate::Model(model) => {
                    debug!(
                        product = %product,
                        interval_days = model.interval_days,
                        typical_quantity = model.typical_quantity,
                        "Estimated reorder model"
                    );
                    models.insert(product.clone(), model);
                }
                Estimate::InsufficientHistory { observations } => {
                    skipped.push(SkippedProduct {
                        product: product.clone(),
                        observations,
                    });
                }
            }
        }

        let projector = ForwardProjector::new(today, self.config.horizon_days);
        let orders: Vec<ProjectedOrder> = models
            .values()
            .flat_map(|model| projector.project(model))
            .collect();
        info!(
            models = models.len(),
            skipped = skipped.len(),
            projected_orders = orders.len(),
            "Projected order events"
        );

        let batcher = OrderBatcher::new(&self.config);
        let batches = batcher.batch(orders, &models, stock, today);
        let budget = MonthlyBudget::from_batches(&batches);
        info!(batches = batches.len(), total = budget.total(), "Forecast complete");

        Ok(ForecastReport {
            today,
            horizon_days: self.config.horizon_days,
            batches,
            budget,
            skipped,
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    fn record(product: &str, date: (i32, u32, u32), quantity: u32, price: f64) -> PurchaseRecord {
        PurchaseRecord {
            product: product.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity,
            unit_price: price,
            total_price: quantity as f64 * price,
        }
    }

    #[test]
    fn test_invalid_config_fails_before_compute() {
        let config = ForecastConfig {
            horizon_days: -1,
            ..Default::default()
        };
        assert!(matches!(
            ForecastPlanner::new(config),
            Err(ForecastError::Config(_))
        ));
    }

    #[test]
    fn test_empty_input_completes_with_empty_report() {
        let planner = ForecastPlanner::new(ForecastConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let report = planner.plan(Vec::new(), None, today).unwrap();
        assert!(report.batches.is_empty());
        assert!(report.budget.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_single_observation_product_is_skipped_not_fatal() {
        let planner = ForecastPlanner::new(ForecastConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let records = vec![
            record("Saffron 1g", (2024, 1, 10), 1, 12.0),
            record("Milk", (2024, 1, 1), 2, 3.10),
            record("Milk", (2024, 1, 8), 2, 3.10),
        ];

        let report = planner.plan(records, None, today).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].product, "Saffron 1g");
        assert!(report
            .batches
            .iter()
            .flat_map(|b| &b.members)
            .all(|m| m.product == "Milk"));
    }

    #[test]
    fn test_weekly_product_projects_through_horizon() {
        let config = ForecastConfig {
            horizon_days: 21,
            ..Default::default()
        };
        let planner = ForecastPlanner::new(config).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        let records = vec![
            record("Milk", (2024, 1, 1), 2, 3.10),
            record("Milk", (2024, 1, 8), 2, 3.10),
        ];

        let report = planner.plan(records, None, today).unwrap();
        let dates: Vec<NaiveDate> = report
            .batches
            .iter()
            .flat_map(|b| b.members.iter().map(|m| m.order_date))
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
            ]
        );
    }
}
