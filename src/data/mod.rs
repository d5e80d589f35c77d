//! Data module - CSV loading and normalization

pub mod cleaner;
mod columns;
mod encoding;
mod loader;
mod processor;
mod records;

pub use columns::{ColumnMapping, MappedColumn, Role};
pub use encoding::{CandidateEncoding, DecodeFailure, CANDIDATE_ENCODINGS};
pub use loader::{DataLoader, DecodeAttempt, LoadError, Source};
pub use processor::{DataProcessor, RejectionCounts, RowRejection};
pub use records::{
    time_index, NormalizedRecord, RecordSet, ALL_SIZES, EXPORT_HEADERS, UNIT_PRICE_FACTOR,
};
