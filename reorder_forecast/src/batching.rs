//! Grouping of projected orders into delivery batches
//!
//! Packs the union of all projected orders into date-windowed batches so
//! the flat delivery fee is amortized over a worthwhile spend. Batches
//! that land under the minimum merge forward into the next batch when it
//! is close enough; a trailing small batch is kept and flagged rather
//! than dropped, since the demand is real either way.

use crate::config::ForecastConfig;
use crate::models::ProductModel;
use crate::projector::ProjectedOrder;
use chrono::NaiveDate;
use invoice_data::StockSnapshot;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A group of projected orders intended to ship together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBatch {
    /// Representative date of the group: the first member's order date
    pub batch_date: NaiveDate,
    /// Member orders in (date, product) order
    pub members: Vec<ProjectedOrder>,
    /// Sum of member line totals
    pub subtotal: f64,
    /// Flat delivery fee for the batch
    pub delivery_fee: f64,
    /// Set on a trailing batch kept below the minimum spend
    pub below_minimum: bool,
    /// Anchor dates of smaller batches merged into this one
    pub merged_from: Vec<NaiveDate>,
}

impl OrderBatch {
    fn new(anchor: ProjectedOrder, delivery_fee: f64) -> Self {
        Self {
            batch_date: anchor.order_date,
            subtotal: anchor.line_total,
            members: vec![anchor],
            delivery_fee,
            below_minimum: false,
            merged_from: Vec::new(),
        }
    }

    fn push(&mut self, order: ProjectedOrder) {
        self.subtotal += order.line_total;
        self.members.push(order);
    }

    /// Subtotal plus delivery fee.
    pub fn total(&self) -> f64 {
        self.subtotal + self.delivery_fee
    }

    /// Number of member orders.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the batch holds no orders.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Absorb a smaller batch that sits earlier in the schedule.
    ///
    /// This batch keeps its own anchor date; the absorbed members keep
    /// their original order dates and are re-sorted into place.
    fn absorb(&mut self, mut earlier: OrderBatch) {
        self.subtotal += earlier.subtotal;
        self.merged_from.append(&mut earlier.merged_from);
        self.merged_from.push(earlier.batch_date);
        self.members.append(&mut earlier.members);
        self.members
            .sort_by(|a, b| a.order_date.cmp(&b.order_date).then_with(|| a.product.cmp(&b.product)));
    }
}

/// Packs projected orders into delivery batches.
#[derive(Debug)]
pub struct OrderBatcher<'a> {
    config: &'a ForecastConfig,
}

impl<'a> OrderBatcher<'a> {
    /// Create a batcher over the given configuration.
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Group projected orders into batches.
    ///
    /// The output is a partition of the input: every order appears in
    /// exactly one batch (less any orders suppressed by stock caps).
    pub fn batch(
        &self,
        mut orders: Vec<ProjectedOrder>,
        models: &BTreeMap<String, ProductModel>,
        stock: Option<&StockSnapshot>,
        today: NaiveDate,
    ) -> Vec<OrderBatch> {
        if let Some(stock) = stock {
            self.apply_stock_caps(&mut orders, models, stock, today);
        }

        orders.sort_by(|a, b| {
            a.order_date
                .cmp(&b.order_date)
                .then_with(|| a.product.cmp(&b.product))
        });

        let grouped = self.group_by_window(orders);
        self.merge_small_batches(grouped)
    }

    /// Reduce or suppress each product's nearest projected order when
    /// on-hand stock already covers its cap.
    ///
    /// Only the nearest occurrence is touched; later cycles still restock
    /// on schedule. A stale stock count is first depleted by the product's
    /// own consumption rate so old counts don't mask real demand.
    fn apply_stock_caps(
        &self,
        orders: &mut Vec<ProjectedOrder>,
        models: &BTreeMap<String, ProductModel>,
        stock: &StockSnapshot,
        today: NaiveDate,
    ) {
        let stock_age_days = stock
            .date()
            .map(|d| (today - d).num_days().max(0))
            .unwrap_or(0);

        let mut reduced: BTreeMap<String, u32> = BTreeMap::new();
        for (product, model) in models {
            let Some(counted) = stock.on_hand(product) else {
                continue;
            };

            let consumed =
                (stock_age_days as f64 / model.interval_days * model.typical_quantity as f64)
                    .floor() as u32;
            let on_hand = counted.saturating_sub(consumed);
            let cap = model.stock_cap(self.config);
            let needed = cap.saturating_sub(on_hand);
            reduced.insert(product.clone(), needed);
        }

        for (product, needed) in &reduced {
            let Some(nearest) = orders
                .iter()
                .enumerate()
                .filter(|(_, o)| &o.product == product)
                .min_by_key(|(_, o)| o.order_date)
                .map(|(i, _)| i)
            else {
                continue;
            };

            if *needed == 0 {
                debug!(product = %product, "Suppressing nearest order: stock at or above cap");
                orders.remove(nearest);
            } else if orders[nearest].quantity > *needed {
                let order = &mut orders[nearest];
                debug!(
                    product = %product,
                    from = order.quantity,
                    to = needed,
                    "Reducing nearest order to stock cap shortfall"
                );
                order.quantity = *needed;
                order.line_total = order.quantity as f64 * order.unit_price;
            }
        }
    }

    /// Greedy pass: an order joins the current batch while it falls within
    /// the grouping window of the batch's anchor date, otherwise it starts
    /// a new batch.
    fn group_by_window(&self, orders: Vec<ProjectedOrder>) -> Vec<OrderBatch> {
        let mut batches: Vec<OrderBatch> = Vec::new();

        for order in orders {
            match batches.last_mut() {
                Some(batch)
                    if (order.order_date - batch.batch_date).num_days()
                        <= self.config.grouping_window_days =>
                {
                    batch.push(order);
                }
                _ => batches.push(OrderBatch::new(order, self.config.delivery_fee)),
            }
        }

        batches
    }

    /// Left-to-right pass merging under-minimum batches into the next
    /// batch when its anchor is within the merge window. Forward merge is
    /// always preferred over leaving a batch under minimum, even when the
    /// combined batch ends up far above it. A trailing under-minimum batch
    /// with nothing to merge into is kept and flagged.
    fn merge_small_batches(&self, batches: Vec<OrderBatch>) -> Vec<OrderBatch> {
        let anchors: Vec<NaiveDate> = batches.iter().map(|b| b.batch_date).collect();
        let count = batches.len();
        let mut result: Vec<OrderBatch> = Vec::new();
        let mut carried: Option<OrderBatch> = None;

        for (i, mut batch) in batches.into_iter().enumerate() {
            if let Some(earlier) = carried.take() {
                debug!(
                    from = %earlier.batch_date,
                    into = %batch.batch_date,
                    "Merging under-minimum batch forward"
                );
                batch.absorb(earlier);
            }

            if batch.total() < self.config.min_batch_spend {
                let mergeable = i + 1 < count
                    && (anchors[i + 1] - batch.batch_date).num_days()
                        <= self.config.merge_window_days;
                if mergeable {
                    carried = Some(batch);
                    continue;
                }
                batch.below_minimum = true;
            }

            result.push(batch);
        }

        // `carried` is always consumed: a batch only rides forward when a
        // following batch exists.
        debug_assert!(carried.is_none());
        result
    }
}
