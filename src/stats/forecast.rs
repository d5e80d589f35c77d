//! Forecast Report Module
//! Projects one region × size-category series to a target year.

use crate::data::{NormalizedRecord, RecordSet};
use crate::stats::trend::{ForecastError, TrendModel};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Year the dashboards projected to.
pub const DEFAULT_TARGET_YEAR: i32 = 2026;

/// Points on the plotted trend line.
pub const DEFAULT_TREND_POINTS: usize = 50;

/// Forecast for one (region, size category) selection.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub region: String,
    pub size_category: String,
    pub target_year: i32,
    pub model: TrendModel,
    /// Unit-price of the most recent record.
    pub latest_value: f64,
    pub latest_date: NaiveDate,
    /// Unclamped projection at `target_year`.
    pub projected: f64,
    /// `None` when the latest value is zero.
    pub growth_percent: Option<f64>,
    /// Observed (time-index, unit-price) pairs.
    pub series: Vec<(f64, f64)>,
    /// Trend line from the first observation to `target_year`.
    pub trend: Vec<(f64, f64)>,
}

impl ForecastReport {
    /// `records` must already be filtered to one selection and sorted by date.
    pub fn build(
        region: &str,
        size_category: &str,
        records: &[&NormalizedRecord],
        target_year: i32,
        trend_points: usize,
    ) -> Result<Self, ForecastError> {
        let Some(latest) = records.last() else {
            return Err(ForecastError::EmptySelection {
                region: region.to_string(),
                size_category: size_category.to_string(),
            });
        };

        let series: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (r.time_index(), r.unit_price))
            .collect();
        let model = TrendModel::fit_points(&series)?;

        let target = target_year as f64;
        let projected = model.project(target);
        let start = series.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let latest_value = latest.unit_price;
        let growth_percent =
            (latest_value != 0.0).then(|| (projected - latest_value) / latest_value * 100.0);

        Ok(Self {
            region: region.to_string(),
            size_category: size_category.to_string(),
            target_year,
            trend: model.grid(start, target, trend_points),
            model,
            latest_value,
            latest_date: latest.date,
            projected,
            growth_percent,
            series,
        })
    }

    /// Projection clamped at zero for display as a price.
    pub fn display_value(&self) -> f64 {
        self.projected.max(0.0)
    }
}

/// Outcome for one group of a full summary.
#[derive(Debug, Clone)]
pub struct GroupForecast {
    pub region: String,
    pub size_category: String,
    pub records: usize,
    pub outcome: Result<ForecastReport, ForecastError>,
}

/// Forecast every (region, size category) group in parallel, ordered by key.
pub fn forecast_all(set: &RecordSet, target_year: i32, trend_points: usize) -> Vec<GroupForecast> {
    let mut groups: BTreeMap<(&str, &str), Vec<&NormalizedRecord>> = BTreeMap::new();
    for record in &set.records {
        groups
            .entry((record.region.as_str(), record.size_category.as_str()))
            .or_default()
            .push(record);
    }

    let groups: Vec<_> = groups.into_iter().collect();

    // Use rayon for parallel computation
    groups
        .par_iter()
        .map(|((region, size), records)| GroupForecast {
            region: region.to_string(),
            size_category: size.to_string(),
            records: records.len(),
            outcome: ForecastReport::build(region, size, records, target_year, trend_points),
        })
        .collect()
}
