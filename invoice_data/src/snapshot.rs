//! Loading of extractor snapshots and stock snapshots
//!
//! The upstream extractor writes a JSON array of invoice documents, each
//! holding category groupings of line items. Numeric fields arrive as JSON
//! numbers or as decorated strings (`"$3.10"`, `"1,250"`), and redacted
//! fields may hold placeholder text, so every value is coerced defensively.

use crate::history::DropStats;
use crate::{PurchaseRecord, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

/// One extracted invoice document from the snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceDocument {
    /// Source document identifier (redacted filename)
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Invoice date as printed, e.g. `"15 January 2024"`
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub invoice_time: Option<String>,
    #[serde(default)]
    pub categories: Vec<InvoiceCategory>,
}

/// A category grouping of line items within an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
}

/// A raw line item as written by the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceLine {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub ordered: Option<RawValue>,
    #[serde(default)]
    pub picked: Option<RawValue>,
    #[serde(default)]
    pub unit_price: Option<RawValue>,
    #[serde(default)]
    pub total_price: Option<RawValue>,
}

/// A field that may be serialized as a number or a decorated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Num(f64),
    Text(String),
}

impl RawValue {
    /// Coerce to a number, stripping currency decoration from strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Num(v) => Some(*v),
            RawValue::Text(s) => s.trim().replace(['$', ','], "").parse().ok(),
        }
    }
}

/// Loader for extractor snapshots and flat exports
#[derive(Debug)]
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load the extractor's JSON snapshot of invoice documents.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Vec<InvoiceDocument>> {
        let file = File::open(path)?;
        let docs = serde_json::from_reader(BufReader::new(file))?;
        Ok(docs)
    }

    /// Flatten invoice documents into purchase records.
    ///
    /// Invoice/category grouping is irrelevant to forecasting, so every
    /// usable line becomes one flat record. Lines with an unparseable date,
    /// a non-positive quantity, or a missing/zero unit price are dropped
    /// and counted; drops never abort the run.
    pub fn flatten(docs: &[InvoiceDocument]) -> (Vec<PurchaseRecord>, DropStats) {
        let mut records = Vec::new();
        let mut dropped = DropStats::default();

        for doc in docs {
            let line_count: usize = doc.categories.iter().map(|c| c.items.len()).sum();
            let date = match doc.invoice_date.as_deref().and_then(parse_invoice_date) {
                Some(date) => date,
                None => {
                    warn!(
                        document = doc.filename.as_deref().unwrap_or("unknown"),
                        lines = line_count,
                        "Skipping document with unparseable invoice date"
                    );
                    dropped.unparseable_date += line_count;
                    continue;
                }
            };

            for category in &doc.categories {
                for item in &category.items {
                    match flatten_line(item, date) {
                        LineOutcome::Record(record) => records.push(record),
                        LineOutcome::NonPositiveQuantity => {
                            dropped.non_positive_quantity += 1;
                        }
                        LineOutcome::UnusablePrice => {
                            warn!(
                                product = item.product.as_deref().unwrap_or("unknown"),
                                category = %category.name,
                                "Dropping line with missing or zero price"
                            );
                            dropped.unparseable_price += 1;
                        }
                    }
                }
            }
        }

        (records, dropped)
    }

    /// Load flat purchase records from a CSV export.
    ///
    /// Alternate extractor format: one record per row with the columns
    /// `product,date,quantity,unit_price,total_price` and dates in ISO or
    /// invoice (`%d %B %Y`) form.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<(Vec<PurchaseRecord>, DropStats)> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        let mut dropped = DropStats::default();

        for row in reader.deserialize() {
            let row: CsvRow = row?;
            let Some(date) = parse_invoice_date(&row.date) else {
                warn!(product = %row.product, raw = %row.date, "Dropping row with unparseable date");
                dropped.unparseable_date += 1;
                continue;
            };
            if row.quantity == 0 {
                dropped.non_positive_quantity += 1;
                continue;
            }
            if row.unit_price <= 0.0 {
                dropped.unparseable_price += 1;
                continue;
            }
            let total = row
                .total_price
                .unwrap_or(row.quantity as f64 * row.unit_price);
            match PurchaseRecord::new(&row.product, date, row.quantity, row.unit_price, total) {
                Ok(record) => records.push(record),
                Err(_) => dropped.non_positive_quantity += 1,
            }
        }

        Ok((records, dropped))
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    product: String,
    date: String,
    quantity: u32,
    unit_price: f64,
    #[serde(default)]
    total_price: Option<f64>,
}

enum LineOutcome {
    Record(PurchaseRecord),
    NonPositiveQuantity,
    UnusablePrice,
}

fn flatten_line(item: &InvoiceLine, date: NaiveDate) -> LineOutcome {
    let product = item.product.as_deref().map(str::trim).unwrap_or("");
    if product.is_empty() {
        return LineOutcome::NonPositiveQuantity;
    }

    let quantity = item
        .ordered
        .as_ref()
        .and_then(RawValue::as_f64)
        .map(|q| q.round())
        .unwrap_or(0.0);
    if quantity < 1.0 {
        return LineOutcome::NonPositiveQuantity;
    }
    let quantity = quantity as u32;

    // Zero-priced lines are free/promotional items, not demand.
    let unit_price = item
        .unit_price
        .as_ref()
        .and_then(RawValue::as_f64)
        .unwrap_or(0.0);
    if unit_price <= 0.0 {
        return LineOutcome::UnusablePrice;
    }

    let total_price = item
        .total_price
        .as_ref()
        .and_then(RawValue::as_f64)
        .unwrap_or(quantity as f64 * unit_price);

    LineOutcome::Record(PurchaseRecord {
        product: product.to_string(),
        date,
        quantity,
        unit_price,
        total_price,
    })
}

/// Parse an invoice date as printed by the extractor (`"15 January 2024"`),
/// falling back to ISO form.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Current on-hand stock per product, supplied by an external count.
#[derive(Debug, Clone, Deserialize)]
pub struct StockSnapshot {
    /// When the count was taken, if known
    #[serde(default)]
    pub stock_date: Option<String>,
    #[serde(default)]
    pub items: Vec<StockItem>,
}

/// One counted product in the stock snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct StockItem {
    pub product: String,
    pub quantity: u32,
}

impl StockSnapshot {
    /// Load a stock snapshot from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(snapshot)
    }

    /// On-hand quantity for a product by exact (trimmed) name match.
    pub fn on_hand(&self, product: &str) -> Option<u32> {
        let product = product.trim();
        self.items
            .iter()
            .find(|item| item.product.trim() == product)
            .map(|item| item.quantity)
    }

    /// The count date, if present and parseable.
    pub fn date(&self) -> Option<NaiveDate> {
        self.stock_date.as_deref().and_then(parse_invoice_date)
    }
}
