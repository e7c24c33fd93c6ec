//! Reorder models derived from purchase histories
//!
//! A [`ReorderEstimator`] turns one product's history into a
//! [`ProductModel`]: the reorder interval, typical quantity, and latest
//! price the projector steps forward from. Model fields are recomputed
//! from history on every run and never persisted.

use crate::config::ForecastConfig;
use crate::error::Result;
use chrono::NaiveDate;
use invoice_data::ProductHistory;
use serde::Serialize;

/// Derived reorder pattern for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductModel {
    /// Product name the model belongs to
    pub product: String,
    /// Mean days between consecutive purchases, floored at 1.0
    pub interval_days: f64,
    /// Rounded mean quantity per purchase, at least 1
    pub typical_quantity: u32,
    /// Most recent observed unit price
    pub unit_price: f64,
    /// Date of the most recent purchase
    pub last_purchase_date: NaiveDate,
    /// Number of observations the model was derived from
    pub observations: usize,
    /// Whether the product reorders often enough for the higher stock cap
    pub frequent: bool,
}

impl ProductModel {
    /// The interval as whole calendar days for date stepping, minimum 1.
    pub fn step_days(&self) -> i64 {
        (self.interval_days.round() as i64).max(1)
    }

    /// The on-hand stock cap that applies to this product.
    pub fn stock_cap(&self, config: &ForecastConfig) -> u32 {
        if self.frequent {
            config.frequent_stock_cap
        } else {
            config.default_stock_cap
        }
    }
}

/// Outcome of estimating a product's reorder pattern.
///
/// A single observation gives no interval to infer, so such products are
/// signalled as insufficient rather than treated as an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// A usable model was derived
    Model(ProductModel),
    /// Too few observations to infer an interval
    InsufficientHistory { observations: usize },
}

/// Estimator that derives a reorder model from a purchase history
pub trait ReorderEstimator {
    /// Derive a model, or signal that the history cannot support one.
    fn estimate(&self, history: &ProductHistory) -> Result<Estimate>;

    /// Get the name of the estimator
    fn name(&self) -> &str;
}

pub mod mean_interval;
