//! CSV Data Loader Module
//! Reads presale price CSVs of unknown encoding and column naming using Polars.

use crate::data::columns::{ColumnMapping, Role};
use crate::data::encoding::{CandidateEncoding, CANDIDATE_ENCODINGS};
use crate::data::processor::DataProcessor;
use crate::data::records::RecordSet;
use polars::prelude::*;
use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// One failed decode-and-parse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAttempt {
    pub encoding: CandidateEncoding,
    pub reason: String,
}

impl fmt::Display for DecodeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.encoding, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "File content could not be read under any candidate encoding; check the encoding and file format ({})",
        join(.attempts)
    )]
    Decode { attempts: Vec<DecodeAttempt> },
    #[error(
        "Essential columns not found: {} (headers found: {headers:?})",
        join(.missing)
    )]
    Schema {
        missing: Vec<Role>,
        headers: Vec<String>,
    },
    #[error("Failed to build table: {0}")]
    Table(#[from] PolarsError),
}

fn join<'a, T: fmt::Display + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where a table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    /// Uploaded content; `name` is only used for display.
    Bytes { name: String, data: Vec<u8> },
}

impl Source {
    pub fn name(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Bytes { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

/// Stateless loader; caching is the caller's job (see `Session`).
pub struct DataLoader;

impl DataLoader {
    pub fn load(source: &Source) -> Result<RecordSet, LoadError> {
        match source {
            Source::Path(path) => Self::load_path(path),
            Source::Bytes { data, .. } => Self::load_bytes(data),
        }
    }

    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<RecordSet, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            context: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "loading csv");
        Self::load_bytes(&bytes)
    }

    /// Rewind `reader` to offset 0 and load everything it holds.
    pub fn load_reader<R: Read + Seek>(mut reader: R) -> Result<RecordSet, LoadError> {
        let io_err = |source| LoadError::Io {
            context: "source stream".to_string(),
            source,
        };
        reader.seek(SeekFrom::Start(0)).map_err(io_err)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(io_err)?;
        Self::load_bytes(&bytes)
    }

    pub fn load_bytes(bytes: &[u8]) -> Result<RecordSet, LoadError> {
        let (df, encoding) = Self::read_table(bytes)?;

        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mapping = ColumnMapping::discover(&headers)?;
        for (role, column) in mapping.iter() {
            debug!(%role, header = %column.header, index = column.index, "column mapped");
        }

        let (records, rejected) = DataProcessor::normalize(&df, &mapping)?;
        info!(
            %encoding,
            raw_rows = df.height(),
            kept = records.len(),
            dropped = rejected.total(),
            "csv normalized"
        );

        Ok(RecordSet {
            records,
            mapping,
            encoding,
            raw_rows: df.height(),
            rejected,
        })
    }

    /// Try each candidate encoding in order; the first that both decodes and
    /// parses as a table wins.
    fn read_table(bytes: &[u8]) -> Result<(DataFrame, CandidateEncoding), LoadError> {
        let mut attempts = Vec::with_capacity(CANDIDATE_ENCODINGS.len());

        for encoding in CANDIDATE_ENCODINGS {
            let outcome = encoding
                .decode(bytes)
                .map_err(|e| e.to_string())
                .and_then(|text| Self::parse_csv(&text).map_err(|e| e.to_string()));

            match outcome {
                Ok(df) => {
                    debug!(%encoding, rows = df.height(), "decode attempt succeeded");
                    return Ok((df, encoding));
                }
                Err(reason) => {
                    debug!(%encoding, %reason, "decode attempt failed");
                    attempts.push(DecodeAttempt { encoding, reason });
                }
            }
        }

        Err(LoadError::Decode { attempts })
    }

    /// Parse comma-separated text with a header row, keeping every cell as a
    /// string.
    fn parse_csv(text: &str) -> PolarsResult<DataFrame> {
        if text.trim().is_empty() {
            return Err(PolarsError::NoData("empty CSV".into()));
        }
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()
    }
}
