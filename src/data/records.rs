//! Normalized Records Module
//! Cleaned presale price rows and the queries a filter UI needs.

use crate::data::columns::ColumnMapping;
use crate::data::encoding::CandidateEncoding;
use crate::data::processor::RejectionCounts;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;

/// Price per ㎡ → price per pyeong.
pub const UNIT_PRICE_FACTOR: f64 = 3.3;

/// Size category used when the source has none.
pub const ALL_SIZES: &str = "모든면적";

/// Headers written by [`RecordSet::write_csv`].
pub const EXPORT_HEADERS: [&str; 7] = ["지역명", "규모구분", "연도", "월", "분양가격", "날짜", "평당가"];

/// Fractional-year position of a month: `year + (month - 1) / 12`.
pub fn time_index(year: i32, month: u32) -> f64 {
    year as f64 + (month as f64 - 1.0) / 12.0
}

/// One cleaned row. Always carries a valid first-of-month date and a
/// finite, non-negative price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub region: String,
    pub size_category: String,
    pub year: i32,
    pub month: u32,
    pub price: f64,
    pub date: NaiveDate,
    pub unit_price: f64,
}

impl NormalizedRecord {
    /// `None` when (year, month) is not a calendar month or the price is
    /// negative or not finite.
    pub fn new(
        region: String,
        size_category: String,
        year: i32,
        month: u32,
        price: f64,
    ) -> Option<Self> {
        if !price.is_finite() || price < 0.0 {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            region,
            size_category,
            year,
            month,
            price,
            date,
            unit_price: price * UNIT_PRICE_FACTOR,
        })
    }

    pub fn time_index(&self) -> f64 {
        time_index(self.year, self.month)
    }
}

/// A loaded, cleaned table, sorted ascending by date.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSet {
    pub records: Vec<NormalizedRecord>,
    pub mapping: ColumnMapping,
    pub encoding: CandidateEncoding,
    /// Data rows in the source before cleaning.
    pub raw_rows: usize,
    pub rejected: RejectionCounts,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dropped_rows(&self) -> usize {
        self.raw_rows - self.records.len()
    }

    /// Sorted distinct regions.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|r| &r.region)
    }

    /// Sorted distinct size categories.
    pub fn size_categories(&self) -> Vec<String> {
        self.distinct(|r| &r.size_category)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&NormalizedRecord) -> &String,
    {
        self.records
            .iter()
            .map(field)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Records of one region × size category, in date order.
    pub fn filter(&self, region: &str, size_category: &str) -> Vec<&NormalizedRecord> {
        self.records
            .iter()
            .filter(|r| r.region == region && r.size_category == size_category)
            .collect()
    }

    /// (time-index, unit-price) pairs for plotting.
    pub fn series(&self, region: &str, size_category: &str) -> Vec<(f64, f64)> {
        self.filter(region, size_category)
            .into_iter()
            .map(|r| (r.time_index(), r.unit_price))
            .collect()
    }

    /// Records as a DataFrame with the export headers.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let rows = &self.records;
        let [region, size, year, month, price, date, unit_price] = EXPORT_HEADERS;

        DataFrame::new(vec![
            Column::new(region.into(), rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>()),
            Column::new(size.into(), rows.iter().map(|r| r.size_category.as_str()).collect::<Vec<_>>()),
            Column::new(year.into(), rows.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new(month.into(), rows.iter().map(|r| r.month).collect::<Vec<_>>()),
            Column::new(price.into(), rows.iter().map(|r| r.price).collect::<Vec<_>>()),
            Column::new(
                date.into(),
                rows.iter()
                    .map(|r| r.date.format("%Y-%m-%d").to_string())
                    .collect::<Vec<_>>(),
            ),
            Column::new(unit_price.into(), rows.iter().map(|r| r.unit_price).collect::<Vec<_>>()),
        ])
    }

    /// Write the records as UTF-8 CSV. Reloading the output yields the same
    /// records.
    ///
    /// Floats are written positionally: the loader's cleaner drops exponent
    /// markers, so `1.2e19` would come back as `1.2`.
    pub fn write_csv<W: Write>(&self, writer: W) -> PolarsResult<()> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer)
            .include_header(true)
            .with_float_scientific(Some(false))
            .finish(&mut df)
    }
}
