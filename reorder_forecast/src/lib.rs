//! # Reorder Forecast
//!
//! A Rust library for forecasting grocery reorder timing from invoice
//! purchase history and packing the projected orders into delivery-fee-
//! efficient batches.
//!
//! ## Features
//!
//! - Per-product reorder models (mean purchase interval, typical quantity)
//! - Forward projection of order events over a configurable horizon,
//!   with catch-up for overdue products
//! - Date-window batching with a minimum-spend merge pass and stock-cap
//!   suppression
//! - Monthly budget aggregation and a renderable forecast report
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use invoice_data::SnapshotLoader;
//! use reorder_forecast::{ForecastConfig, ForecastPlanner};
//!
//! // Load the extractor's snapshot
//! let docs = SnapshotLoader::from_json("extracted_data.json").unwrap();
//! let (records, _dropped) = SnapshotLoader::flatten(&docs);
//!
//! // Plan with default configuration
//! let planner = ForecastPlanner::new(ForecastConfig::default()).unwrap();
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let report = planner.plan(records, None, today).unwrap();
//!
//! println!("{}", report);
//! ```
//!
//! Every run recomputes from the full snapshot; no state is carried
//! between runs, so a given snapshot and configuration always produce the
//! same report.

pub mod batching;
pub mod budget;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod projector;
pub mod report;

// Re-export commonly used types
pub use crate::batching::{OrderBatch, OrderBatcher};
pub use crate::budget::MonthlyBudget;
pub use crate::config::ForecastConfig;
pub use crate::error::{ForecastError, Result};
pub use crate::models::mean_interval::MeanIntervalEstimator;
pub use crate::models::{Estimate, ProductModel, ReorderEstimator};
pub use crate::planner::ForecastPlanner;
pub use crate::projector::{ForwardProjector, ProjectedOrder, Projection};
pub use crate::report::{ForecastReport, SkippedProduct};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
