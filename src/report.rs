//! Report Formatting Module
//! Plain-text views of loaded tables and forecasts.

use crate::data::{NormalizedRecord, RecordSet, Role};
use crate::stats::{ForecastError, ForecastReport, GroupForecast};
use std::fmt::Write;

/// `1234567.8` → `"1,234,568"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_inspect(name: &str, set: &RecordSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Source:   {name}");
    let _ = writeln!(out, "Encoding: {}", set.encoding);
    let _ = writeln!(out, "Columns:");
    for role in Role::ALL {
        let header = set.mapping.header(role).unwrap_or("(not found, using default)");
        let _ = writeln!(out, "  {:<14} {}", role.label(), header);
    }
    let _ = writeln!(
        out,
        "Rows:     {} raw, {} kept, {} dropped",
        set.raw_rows,
        set.len(),
        set.dropped_rows()
    );
    let r = &set.rejected;
    if r.total() > 0 {
        let _ = writeln!(
            out,
            "  missing year {}, missing month {}, missing price {}, invalid date {}",
            r.missing_year, r.missing_month, r.missing_price, r.invalid_date
        );
    }
    let _ = writeln!(out, "Regions:  {}", set.regions().join(", "));
    let _ = writeln!(out, "Sizes:    {}", set.size_categories().join(", "));
    out
}

pub fn format_history(records: &[&NormalizedRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:>12} {:>12}", "date", "price", "unit price");
    for r in records {
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>12}",
            r.date.format("%Y-%m"),
            format_thousands(r.price),
            format_thousands(r.unit_price)
        );
    }
    out
}

pub fn format_forecast(report: &ForecastReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - {} linear projection",
        report.region, report.size_category, report.target_year
    );
    let _ = writeln!(
        out,
        "  Latest unit price ({}): {}",
        report.latest_date.format("%Y-%m"),
        format_thousands(report.latest_value)
    );
    let _ = writeln!(
        out,
        "  {} projection:          {}",
        report.target_year,
        format_thousands(report.display_value())
    );
    match report.growth_percent {
        Some(growth) => {
            let _ = writeln!(out, "  Expected change:          {growth:+.1}%");
        }
        None => {
            let _ = writeln!(out, "  Expected change:          n/a");
        }
    }
    let _ = writeln!(
        out,
        "  Trend: {:.2} per year over {} observations",
        report.model.slope, report.model.points
    );
    out
}

pub fn format_forecast_error(error: &ForecastError) -> String {
    format!("Forecast could not be computed: {error}")
}

pub fn format_summary(groups: &[GroupForecast], target_year: i32) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<20} {:>6} {:>12} {:>12} {:>9}",
        "region",
        "size",
        "rows",
        "latest",
        target_year,
        "change"
    );
    for group in groups {
        let _ = match &group.outcome {
            Ok(report) => writeln!(
                out,
                "{:<12} {:<20} {:>6} {:>12} {:>12} {:>9}",
                group.region,
                group.size_category,
                group.records,
                format_thousands(report.latest_value),
                format_thousands(report.display_value()),
                report
                    .growth_percent
                    .map(|g| format!("{g:+.1}%"))
                    .unwrap_or_else(|| "n/a".to_string())
            ),
            Err(_) => writeln!(
                out,
                "{:<12} {:<20} {:>6} {:>12} {:>12} {:>9}",
                group.region, group.size_category, group.records, "-", "-", "no trend"
            ),
        };
    }
    out
}
