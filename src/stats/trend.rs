//! Linear Trend Module
//! Ordinary least-squares degree-1 fit over (time-index, price) points.

use crate::data::NormalizedRecord;
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("At least 2 distinct time points are needed for a trend line (found {distinct_points})")]
    InsufficientData { distinct_points: usize },
    #[error("No records for region '{region}' and size category '{size_category}'")]
    EmptySelection {
        region: String,
        size_category: String,
    },
}

/// `price ≈ slope * time_index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    /// Observations the line was fit on.
    pub points: usize,
}

impl TrendModel {
    /// Fit unit-price against time-index.
    pub fn fit<'a, I>(records: I) -> Result<Self, ForecastError>
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        let points: Vec<(f64, f64)> = records
            .into_iter()
            .map(|r| (r.time_index(), r.unit_price))
            .collect();
        Self::fit_points(&points)
    }

    /// Least-squares line through `points`.
    pub fn fit_points(points: &[(f64, f64)]) -> Result<Self, ForecastError> {
        let distinct_points = Self::distinct_times(points);
        if distinct_points < 2 {
            return Err(ForecastError::InsufficientData { distinct_points });
        }

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();

        let x_mean = xs.iter().mean();
        let y_mean = ys.iter().mean();
        let x_var = xs.iter().variance();
        if !(x_var > 0.0) {
            return Err(ForecastError::InsufficientData { distinct_points });
        }
        let slope = xs.iter().covariance(ys.iter()) / x_var;

        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            points: points.len(),
        })
    }

    fn distinct_times(points: &[(f64, f64)]) -> usize {
        let mut times: Vec<u64> = points.iter().map(|p| p.0.to_bits()).collect();
        times.sort_unstable();
        times.dedup();
        times.len()
    }

    /// Evaluate the line at `time`. No clamping.
    pub fn project(&self, time: f64) -> f64 {
        self.slope * time + self.intercept
    }

    /// `n` evenly spaced `(time, projection)` pairs from `start` to `end`,
    /// both inclusive.
    pub fn grid(&self, start: f64, end: f64, n: usize) -> Vec<(f64, f64)> {
        match n {
            0 => Vec::new(),
            1 => vec![(start, self.project(start))],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        let t = if i == n - 1 { end } else { start + step * i as f64 };
                        (t, self.project(t))
                    })
                    .collect()
            }
        }
    }

    /// Sum of squared vertical deviations of `points` from the line.
    pub fn sum_squared_residuals(&self, points: &[(f64, f64)]) -> f64 {
        points
            .iter()
            .map(|&(x, y)| (y - self.project(x)).powi(2))
            .sum()
    }
}
