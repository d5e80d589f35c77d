//! Data Processor Module
//! Turns a raw string table into cleaned, dated presale records.

use crate::data::cleaner::{clean_text, clean_value, coerce_integer};
use crate::data::columns::{ColumnMapping, Role};
use crate::data::records::{NormalizedRecord, ALL_SIZES};
use polars::prelude::*;
use serde::Serialize;
use tracing::trace;

/// Why a raw row was left out of the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    MissingYear,
    MissingMonth,
    MissingPrice,
    InvalidDate,
}

/// Aggregate count of rejected rows per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub missing_year: usize,
    pub missing_month: usize,
    pub missing_price: usize,
    pub invalid_date: usize,
}

impl RejectionCounts {
    fn record(&mut self, reason: RowRejection) {
        match reason {
            RowRejection::MissingYear => self.missing_year += 1,
            RowRejection::MissingMonth => self.missing_month += 1,
            RowRejection::MissingPrice => self.missing_price += 1,
            RowRejection::InvalidDate => self.invalid_date += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_year + self.missing_month + self.missing_price + self.invalid_date
    }
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize every row of `df` using the discovered `mapping`.
    ///
    /// Rows missing a year, month or price, or whose year/month is not a
    /// calendar month, are dropped. The result is sorted by date; rows sharing
    /// a date keep their source order.
    pub fn normalize(
        df: &DataFrame,
        mapping: &ColumnMapping,
    ) -> PolarsResult<(Vec<NormalizedRecord>, RejectionCounts)> {
        let region = Self::string_column(df, mapping, Role::Region)?;
        let size = Self::string_column(df, mapping, Role::SizeCategory)?;
        let year = Self::string_column(df, mapping, Role::Year)?;
        let month = Self::string_column(df, mapping, Role::Month)?;
        let price = Self::string_column(df, mapping, Role::Price)?;

        let mut records = Vec::with_capacity(df.height());
        let mut rejected = RejectionCounts::default();

        for i in 0..df.height() {
            let row = Self::normalize_row(
                Self::cell(region.as_ref(), i),
                Self::cell(size.as_ref(), i),
                Self::cell(year.as_ref(), i),
                Self::cell(month.as_ref(), i),
                Self::cell(price.as_ref(), i),
            );
            match row {
                Ok(record) => records.push(record),
                Err(reason) => {
                    trace!(row = i, ?reason, "row rejected");
                    rejected.record(reason);
                }
            }
        }

        records.sort_by_key(|r| r.date);
        Ok((records, rejected))
    }

    fn normalize_row(
        region: Option<&str>,
        size: Option<&str>,
        year: Option<&str>,
        month: Option<&str>,
        price: Option<&str>,
    ) -> Result<NormalizedRecord, RowRejection> {
        let year = year.and_then(coerce_integer).ok_or(RowRejection::MissingYear)?;
        let month = month.and_then(coerce_integer).ok_or(RowRejection::MissingMonth)?;
        let price = price.and_then(clean_value).ok_or(RowRejection::MissingPrice)?;

        let month = u32::try_from(month).map_err(|_| RowRejection::InvalidDate)?;
        let region = clean_text(region).unwrap_or_default();
        let size = clean_text(size).unwrap_or_else(|| ALL_SIZES.to_string());

        NormalizedRecord::new(region, size, year, month, price).ok_or(RowRejection::InvalidDate)
    }

    fn cell(column: Option<&StringChunked>, i: usize) -> Option<&str> {
        column.and_then(|ca| ca.get(i))
    }

    /// Column for `role` as strings; `None` when the role was not mapped.
    fn string_column(
        df: &DataFrame,
        mapping: &ColumnMapping,
        role: Role,
    ) -> PolarsResult<Option<StringChunked>> {
        let Some(mapped) = mapping.get(role) else {
            return Ok(None);
        };
        let column = df.get_columns().get(mapped.index).ok_or_else(|| {
            PolarsError::ColumnNotFound(format!("{} (#{})", mapped.header, mapped.index).into())
        })?;
        let as_str = column.cast(&DataType::String)?;
        Ok(Some(as_str.str()?.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
        DataFrame::new(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name.into(), values))
                .collect(),
        )
        .unwrap()
    }

    fn mapping_for(df: &DataFrame) -> ColumnMapping {
        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        ColumnMapping::discover(&headers).unwrap()
    }

    #[test]
    fn drops_rows_with_missing_or_invalid_fields() {
        let df = table(vec![
            ("지역명", vec![Some("서울"); 6]),
            ("연도", vec![Some("2020"), None, Some("2020"), Some("2020"), Some("2020"), Some("2020")]),
            ("월", vec![Some("1"), Some("2"), Some("13"), Some("3"), Some("4"), Some("1월")]),
            (
                "분양가격",
                vec![Some("1,000"), Some("900"), Some("800"), Some("해당없음"), Some("1,100"), Some("950")],
            ),
        ]);
        let (records, rejected) = DataProcessor::normalize(&df, &mapping_for(&df)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(rejected.missing_year, 1);
        assert_eq!(rejected.missing_month, 1);
        assert_eq!(rejected.invalid_date, 1);
        assert_eq!(rejected.missing_price, 1);
        assert_eq!(rejected.total(), 4);
        assert_eq!(records[0].month, 1);
        assert_eq!(records[1].month, 4);
    }

    #[test]
    fn sorts_by_date_and_defaults_size() {
        let df = table(vec![
            ("city", vec![Some("부산"), Some("서울")]),
            ("year", vec![Some("2021"), Some("2019")]),
            ("month", vec![Some("6"), Some("12")]),
            ("price", vec![Some("500"), Some("700")]),
        ]);
        let (records, _) = DataProcessor::normalize(&df, &mapping_for(&df)).unwrap();

        assert_eq!(records[0].region, "서울");
        assert_eq!(records[1].region, "부산");
        assert!(records.iter().all(|r| r.size_category == ALL_SIZES));
    }

    #[test]
    fn blank_size_cells_fall_back_to_all_sizes() {
        let df = table(vec![
            ("지역", vec![Some("대구"), Some("대구")]),
            ("규모", vec![Some("전용 60㎡이하"), Some(" ")]),
            ("연도", vec![Some("2020"), Some("2020")]),
            ("월", vec![Some("1"), Some("2")]),
            ("가격", vec![Some("300"), None]),
        ]);
        let (records, rejected) = DataProcessor::normalize(&df, &mapping_for(&df)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size_category, "전용 60㎡이하");
        assert_eq!(rejected.missing_price, 1);

        let row =
            DataProcessor::normalize_row(Some("대구"), Some(" "), Some("2020"), Some("2"), Some("1"));
        assert_eq!(row.unwrap().size_category, ALL_SIZES);
    }

    #[test]
    fn negative_month_is_invalid_date() {
        let row = DataProcessor::normalize_row(Some("서울"), None, Some("2020"), Some("-1"), Some("1"));
        assert_eq!(row.unwrap_err(), RowRejection::InvalidDate);
    }
}
