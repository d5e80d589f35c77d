//! Session Cache Module
//! Caller-held cache of loaded record sets, keyed by source identity.

use crate::data::{DataLoader, LoadError, RecordSet, Source};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::Hasher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Identity of a source: file path + metadata, or a content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    File {
        path: PathBuf,
        modified: Option<SystemTime>,
        len: u64,
    },
    Content {
        digest: u64,
        len: usize,
    },
}

impl SourceKey {
    pub fn for_source(source: &Source) -> Result<Self, LoadError> {
        match source {
            Source::Path(path) => {
                let metadata = std::fs::metadata(path).map_err(|source| LoadError::Io {
                    context: path.display().to_string(),
                    source,
                })?;
                Ok(SourceKey::File {
                    path: std::fs::canonicalize(path).unwrap_or_else(|_| path.clone()),
                    modified: metadata.modified().ok(),
                    len: metadata.len(),
                })
            }
            Source::Bytes { data, .. } => {
                let mut hasher = FxHasher::default();
                hasher.write(data);
                Ok(SourceKey::Content {
                    digest: hasher.finish(),
                    len: data.len(),
                })
            }
        }
    }
}

/// Loaded record sets for one user/session. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct Session {
    cache: FxHashMap<SourceKey, Arc<RecordSet>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached record set for `source`, loading it on a miss.
    pub fn load(&mut self, source: &Source) -> Result<Arc<RecordSet>, LoadError> {
        let key = SourceKey::for_source(source)?;
        if let Some(set) = self.cache.get(&key) {
            debug!(source = %source.name(), "session cache hit");
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(DataLoader::load(source)?);
        self.cache.insert(key, Arc::clone(&set));
        Ok(set)
    }

    /// Drop the cached entry for `source`; true if one existed.
    pub fn invalidate(&mut self, source: &Source) -> bool {
        SourceKey::for_source(source)
            .map(|key| self.cache.remove(&key).is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
