//! Basic forecast example with synthetic purchase history
//!
//! Run with: cargo run --example basic_plan

use chrono::NaiveDate;
use invoice_data::utils::generate_basket;
use reorder_forecast::{ForecastConfig, ForecastPlanner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Eight weeks of synthetic shopping across a small basket
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let records = generate_basket(
        &[
            "Full Cream Milk 2L",
            "Sourdough Loaf",
            "Free Range Eggs 12pk",
            "Butter 500g",
            "Greek Yoghurt 1kg",
        ],
        start,
        6,
        8,
    );
    println!("Generated {} purchase records", records.len());

    let config = ForecastConfig {
        horizon_days: 30,
        ..Default::default()
    };
    let planner = ForecastPlanner::new(config)?;

    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let report = planner.plan(records, None, today)?;

    println!("{}", report);
    Ok(())
}
