//! Stats module - Linear trend fitting and forecasting

mod forecast;
mod trend;

pub use forecast::{
    forecast_all, ForecastReport, GroupForecast, DEFAULT_TARGET_YEAR, DEFAULT_TREND_POINTS,
};
pub use trend::{ForecastError, TrendModel};
