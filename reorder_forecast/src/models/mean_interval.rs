//! Mean-interval reorder estimation

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::{Estimate, ProductModel, ReorderEstimator};
use invoice_data::ProductHistory;

/// Estimator using the arithmetic mean of gaps between purchases.
///
/// Requires at least two observations; the interval is floored at one day
/// so same-day duplicate purchases cannot produce an infinite-frequency
/// projection.
#[derive(Debug, Clone)]
pub struct MeanIntervalEstimator {
    name: String,
    frequent_interval_days: f64,
    frequent_min_observations: usize,
}

impl MeanIntervalEstimator {
    /// Create an estimator using the frequent-product thresholds from the
    /// given configuration.
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            name: "Mean Interval".to_string(),
            frequent_interval_days: config.frequent_interval_days,
            frequent_min_observations: config.frequent_min_observations,
        }
    }
}

impl ReorderEstimator for MeanIntervalEstimator {
    fn estimate(&self, history: &ProductHistory) -> Result<Estimate> {
        if history.is_empty() {
            return Err(ForecastError::Data(format!(
                "Empty history for '{}'",
                history.product()
            )));
        }
        if history.len() < 2 {
            return Ok(Estimate::InsufficientHistory {
                observations: history.len(),
            });
        }

        let gaps = history.gap_days();
        let mean_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        // Same-day duplicates produce a 0 mean; floor at one day.
        let interval_days = mean_gap.max(1.0);

        let quantities = history.quantities();
        let mean_quantity =
            quantities.iter().map(|&q| q as f64).sum::<f64>() / quantities.len() as f64;
        let typical_quantity = (mean_quantity.round() as u32).max(1);

        let unit_price = history.latest_unit_price().ok_or_else(|| {
            ForecastError::Data(format!("No price observed for '{}'", history.product()))
        })?;
        let last_purchase_date = history.last_date().ok_or_else(|| {
            ForecastError::Data(format!("No dates observed for '{}'", history.product()))
        })?;

        let frequent = history.len() >= self.frequent_min_observations
            && interval_days <= self.frequent_interval_days;

        Ok(Estimate::Model(ProductModel {
            product: history.product().to_string(),
            interval_days,
            typical_quantity,
            unit_price,
            last_purchase_date,
            observations: history.len(),
            frequent,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
