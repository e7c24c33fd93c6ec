//! Forward projection of reorder events
//!
//! Steps each product model forward from its last purchase date, one
//! interval at a time, emitting projected orders until the horizon.

use crate::models::ProductModel;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// A single forecast order event for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedOrder {
    pub product: String,
    pub order_date: NaiveDate,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Projects product models forward over a fixed window.
#[derive(Debug, Clone)]
pub struct ForwardProjector {
    today: NaiveDate,
    horizon_days: i64,
}

impl ForwardProjector {
    /// Create a projector for the given reference date and horizon.
    pub fn new(today: NaiveDate, horizon_days: i64) -> Self {
        Self {
            today,
            horizon_days,
        }
    }

    /// Lazily project order events for one product.
    ///
    /// The first candidate is one interval after the last purchase. If the
    /// product is overdue, the candidate is advanced interval by interval
    /// until it lands on or after today, so missed cycles collapse into
    /// "order soon" instead of being skipped silently. The walk is a
    /// bounded loop: the iteration cap covers the worst case of a one-day
    /// interval across the entire overdue span plus the horizon.
    pub fn project(&self, model: &ProductModel) -> Projection {
        let step = model.step_days();
        let end_date = self.today + Duration::days(self.horizon_days);
        let mut next_date = model.last_purchase_date + Duration::days(step);

        let overdue_days = (self.today - model.last_purchase_date).num_days().max(0);
        let max_iterations = overdue_days / step + 2;
        let mut iterations = 0;

        while next_date < self.today {
            if iterations >= max_iterations {
                warn!(
                    product = %model.product,
                    step_days = step,
                    "Catch-up loop hit its iteration cap"
                );
                break;
            }
            next_date = next_date + Duration::days(step);
            iterations += 1;
        }

        Projection {
            product: model.product.clone(),
            quantity: model.typical_quantity,
            unit_price: model.unit_price,
            step,
            next_date,
            end_date,
        }
    }
}

/// Lazy, finite sequence of projected orders for one product.
///
/// Empty when the model's interval exceeds the horizon: the product
/// simply doesn't come up for reorder inside the window.
#[derive(Debug, Clone)]
pub struct Projection {
    product: String,
    quantity: u32,
    unit_price: f64,
    step: i64,
    next_date: NaiveDate,
    end_date: NaiveDate,
}

impl Iterator for Projection {
    type Item = ProjectedOrder;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_date >= self.end_date {
            return None;
        }

        let order = ProjectedOrder {
            product: self.product.clone(),
            order_date: self.next_date,
            quantity: self.quantity,
            unit_price: self.unit_price,
            line_total: self.quantity as f64 * self.unit_price,
        };
        self.next_date = self.next_date + Duration::days(self.step);
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(last: (i32, u32, u32), interval_days: f64, quantity: u32) -> ProductModel {
        ProductModel {
            product: "Milk".to_string(),
            interval_days,
            typical_quantity: quantity,
            unit_price: 3.10,
            last_purchase_date: NaiveDate::from_ymd_opt(last.0, last.1, last.2).unwrap(),
            observations: 2,
            frequent: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_projection_within_horizon() {
        let projector = ForwardProjector::new(date(2024, 1, 8), 21);
        let orders: Vec<_> = projector.project(&model((2024, 1, 8), 7.0, 2)).collect();

        let dates: Vec<_> = orders.iter().map(|o| o.order_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 15), date(2024, 1, 22)]);
        assert!(orders.iter().all(|o| o.quantity == 2));
        assert!(orders.iter().all(|o| (o.line_total - 6.20).abs() < 1e-9));
    }

    #[test]
    fn test_catch_up_when_overdue() {
        // Last purchase six weeks ago; the next candidate lands today or
        // later, not in the past and not skipped past the whole backlog.
        let projector = ForwardProjector::new(date(2024, 2, 19), 14);
        let orders: Vec<_> = projector.project(&model((2024, 1, 8), 7.0, 1)).collect();

        assert!(!orders.is_empty());
        assert_eq!(orders[0].order_date, date(2024, 2, 19));
    }

    #[test]
    fn test_interval_beyond_horizon_is_empty() {
        let projector = ForwardProjector::new(date(2024, 1, 8), 21);
        let orders: Vec<_> = projector.project(&model((2024, 1, 8), 60.0, 1)).collect();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_first_candidate_on_today_is_kept() {
        // Next candidate falls exactly on today: no catch-up advance.
        let projector = ForwardProjector::new(date(2024, 1, 15), 7);
        let orders: Vec<_> = projector.project(&model((2024, 1, 8), 7.0, 1)).collect();
        assert_eq!(orders[0].order_date, date(2024, 1, 15));
    }

    #[test]
    fn test_one_day_interval_bounded() {
        let projector = ForwardProjector::new(date(2024, 3, 1), 5);
        let orders: Vec<_> = projector.project(&model((2024, 1, 1), 1.0, 1)).collect();
        // One order per day from today up to the horizon end.
        assert_eq!(orders.len(), 5);
        assert_eq!(orders[0].order_date, date(2024, 3, 1));
        assert_eq!(orders[4].order_date, date(2024, 3, 5));
    }
}
