//! # Invoice Data
//!
//! `invoice_data` holds the purchase data types shared by the reorder
//! forecasting pipeline, plus the ingest layer that turns an extractor's
//! on-disk snapshot into flat purchase records.
//!
//! The extraction side (PDF conversion, field extraction, redaction) lives
//! outside this workspace; its contract is the snapshot schema handled by
//! [`SnapshotLoader`]. Everything downstream works on [`PurchaseRecord`]s.
//!
//! ## Usage Example
//!
//! ```no_run
//! use invoice_data::{HistoryBuilder, SnapshotLoader};
//!
//! let docs = SnapshotLoader::from_json("extracted_data.json").unwrap();
//! let (records, dropped) = SnapshotLoader::flatten(&docs);
//! let (histories, _) = HistoryBuilder::build(records);
//!
//! println!("{} products, {} lines dropped", histories.len(), dropped.total());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod history;
mod snapshot;
pub mod utils;

pub use history::{DropStats, HistoryBuilder, ProductHistory};
pub use snapshot::{
    parse_invoice_date, InvoiceCategory, InvoiceDocument, InvoiceLine, RawValue, SnapshotLoader,
    StockItem, StockSnapshot,
};

/// Errors that can occur while loading or validating purchase data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DataError>;

/// A single purchased line item, flattened out of an invoice document.
///
/// Records are immutable once extracted; identity is the combination of
/// normalized product name, purchase date, and line occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Product name as printed on the invoice (trimmed)
    pub product: String,
    /// Invoice date the line was purchased on
    pub date: NaiveDate,
    /// Units purchased; always at least 1
    pub quantity: u32,
    /// Price per unit at purchase time
    pub unit_price: f64,
    /// Total charged for the line
    pub total_price: f64,
}

impl PurchaseRecord {
    /// Create a record, rejecting non-positive quantities and prices.
    pub fn new(
        product: &str,
        date: NaiveDate,
        quantity: u32,
        unit_price: f64,
        total_price: f64,
    ) -> Result<Self> {
        let product = product.trim();
        if product.is_empty() {
            return Err(DataError::InvalidRecord(
                "Product name must not be empty".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(DataError::InvalidRecord(format!(
                "Quantity for '{}' must be positive",
                product
            )));
        }
        if unit_price <= 0.0 {
            return Err(DataError::InvalidRecord(format!(
                "Unit price for '{}' must be positive",
                product
            )));
        }

        Ok(Self {
            product: product.to_string(),
            date,
            quantity,
            unit_price,
            total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = PurchaseRecord::new("Full Cream Milk 2L", date, 2, 3.10, 6.20).unwrap();
        assert_eq!(record.product, "Full Cream Milk 2L");
        assert_eq!(record.quantity, 2);
    }

    #[test]
    fn test_record_rejects_zero_quantity() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = PurchaseRecord::new("Milk", date, 0, 3.10, 0.0);
        assert!(matches!(result, Err(DataError::InvalidRecord(_))));
    }

    #[test]
    fn test_record_trims_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = PurchaseRecord::new("  Eggs 12pk ", date, 1, 5.50, 5.50).unwrap();
        assert_eq!(record.product, "Eggs 12pk");
    }
}
