//! Walkthrough of the full pipeline over synthetic retail data.
//!
//! Run with: cargo run --example sales_pipeline

use chrono::{Datelike, Months, TimeZone, Utc};
use retailcast::prelude::*;
use retailcast::render;

fn main() -> Result<()> {
    println!("=== retailcast sales pipeline ===\n");

    // 1. Synthesize seven years of monthly sales with a yearly swing, June
    //    promotions, a two-month outage in spring 2020, and a few sentinel
    //    rows standing in for missing prints.
    let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    let mut body = String::from("DATE,RSXFS\n");
    let mut promo_dates = Vec::new();
    let mut outage_dates = Vec::new();
    for i in 0..84u32 {
        let ts = start.checked_add_months(Months::new(i)).unwrap();
        let mut value = 300.0
            + 1.5 * i as f64
            + 20.0 * (2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0).sin();
        if ts.month() == 6 {
            value += 25.0;
            promo_dates.push(ts);
        }
        if ts.year() == 2020 && (ts.month() == 3 || ts.month() == 4) {
            value -= 80.0;
            outage_dates.push(ts);
        }
        if i % 29 == 13 {
            body.push_str(&format!("{},.\n", ts.format("%Y-%m-%d")));
        } else {
            body.push_str(&format!("{},{:.2}\n", ts.format("%Y-%m-%d"), value));
        }
    }

    let series = CsvSource::new("sales.csv", "DATE", "RSXFS")
        .with_sentinel(".")
        .read_from(body.as_bytes())?;
    println!("Loaded {} monthly observations", series.len());

    // 2. Three scenarios: plain, promotions + monthly component, outage.
    let promos = CalendarEventTable::from_events(
        promo_dates
            .iter()
            .map(|d| CalendarEvent::on_date("june_promo", *d))
            .collect(),
    );
    let outages = CalendarEventTable::from_events(
        outage_dates
            .iter()
            .map(|d| CalendarEvent::on_date("outage", *d))
            .collect(),
    );

    let scenarios = vec![
        Scenario::new("plain", AdditiveModel::new().weekly_seasonality(false)),
        Scenario::new(
            "promotions",
            AdditiveModel::new()
                .weekly_seasonality(false)
                .with_seasonality(Seasonality::monthly())
                .with_events(promos),
        ),
        Scenario::new(
            "outage-aware",
            AdditiveModel::new()
                .weekly_seasonality(false)
                .with_events(outages),
        ),
    ];

    let mut outcomes = Vec::new();
    for scenario in &scenarios {
        match scenario.run(&series, 24, Frequency::Monthly) {
            Ok(outcome) => {
                let m = &outcome.evaluation.metrics;
                println!(
                    "\n--- {} ---\n  r2 = {:.4}  mse = {:.2}  rmse = {:.2}  mae = {:.2}",
                    outcome.name, m.r_squared, m.mse, m.rmse, m.mae
                );
                outcomes.push(outcome);
            }
            Err(e) => println!("\n--- {} failed: {e} ---", scenario.name()),
        }
    }

    // 3. Compare the outage-aware forecast against the plain one.
    if let [plain, .., outage_aware] = outcomes.as_slice() {
        let comparison = compare(&outage_aware.forecast, &plain.forecast)?;
        println!(
            "\noutage-aware vs plain: mean diff {:.3}% over {} rows ({} zero-baseline rows skipped)",
            comparison.mean_pct_diff(),
            comparison.pct_diff().len(),
            comparison.zero_baseline_rows()
        );
    }

    // 4. Render the overlay and decomposition views for the last scenario.
    if let Some(outcome) = outcomes.last() {
        render::plot_forecast(&series, &outcome.forecast, "forecast.png")?;
        render::plot_components(&outcome.forecast, "components.png")?;
        println!("\nWrote forecast.png and components.png");
    }

    Ok(())
}
