//! Forecast configuration
//!
//! Every tunable the pipeline uses lives here as an explicit immutable
//! value handed to each component, with defaults matching the delivery
//! service this was built around: a $50 minimum order with a flat $2
//! delivery fee.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Immutable configuration for one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// How far ahead to project orders, in days
    pub horizon_days: i64,
    /// Orders within this many days of a batch's anchor date join the batch
    pub grouping_window_days: i64,
    /// An under-minimum batch merges forward when the next batch's anchor
    /// is within this many days; must be larger than the grouping window
    pub merge_window_days: i64,
    /// Minimum spend for a standalone batch
    pub min_batch_spend: f64,
    /// Flat delivery fee charged per batch
    pub delivery_fee: f64,
    /// On-hand target above which a product's next order is suppressed
    pub default_stock_cap: u32,
    /// Higher on-hand target for frequently reordered products
    pub frequent_stock_cap: u32,
    /// A product is "frequent" when its interval is at most this many days
    pub frequent_interval_days: f64,
    /// ...and it has at least this many observations
    pub frequent_min_observations: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 150,
            grouping_window_days: 3,
            merge_window_days: 6,
            min_batch_spend: 50.0,
            delivery_fee: 2.0,
            default_stock_cap: 2,
            frequent_stock_cap: 5,
            frequent_interval_days: 14.0,
            frequent_min_observations: 3,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from a TOML file, applying defaults for any
    /// omitted keys, and validate it.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ForecastConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is inside its valid range.
    ///
    /// Called before any computation so a bad configuration fails fast,
    /// distinct from data errors.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days <= 0 {
            return Err(ForecastError::Config(format!(
                "horizon_days must be positive, got {}",
                self.horizon_days
            )));
        }
        if self.grouping_window_days <= 0 {
            return Err(ForecastError::Config(format!(
                "grouping_window_days must be positive, got {}",
                self.grouping_window_days
            )));
        }
        if self.merge_window_days <= self.grouping_window_days {
            return Err(ForecastError::Config(format!(
                "merge_window_days ({}) must be larger than grouping_window_days ({})",
                self.merge_window_days, self.grouping_window_days
            )));
        }
        if self.min_batch_spend < 0.0 {
            return Err(ForecastError::Config(format!(
                "min_batch_spend must not be negative, got {}",
                self.min_batch_spend
            )));
        }
        if self.delivery_fee < 0.0 {
            return Err(ForecastError::Config(format!(
                "delivery_fee must not be negative, got {}",
                self.delivery_fee
            )));
        }
        if self.default_stock_cap == 0 || self.frequent_stock_cap == 0 {
            return Err(ForecastError::Config(
                "stock caps must be at least 1".to_string(),
            ));
        }
        if self.frequent_interval_days <= 0.0 {
            return Err(ForecastError::Config(format!(
                "frequent_interval_days must be positive, got {}",
                self.frequent_interval_days
            )));
        }
        if self.frequent_min_observations < 2 {
            return Err(ForecastError::Config(format!(
                "frequent_min_observations must be at least 2, got {}",
                self.frequent_min_observations
            )));
        }
        Ok(())
    }
}
