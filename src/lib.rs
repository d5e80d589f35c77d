//! Presale Trend - CSV loading & linear price forecasting
//!
//! Loads presale price tables of unknown encoding and column naming, and
//! projects a region's unit price to a target year with a least-squares line.

pub mod config;
pub mod data;
pub mod discovery;
pub mod report;
pub mod session;
pub mod stats;

pub use config::Config;
pub use data::{DataLoader, LoadError, NormalizedRecord, RecordSet, Source};
pub use session::Session;
pub use stats::{ForecastError, ForecastReport, TrendModel};
