//! Process-wide cache of aggregated tables.
//!
//! Each data file is aggregated at most once per fingerprint. Entries are
//! never evicted or mutated: a restart (or a changed file) is the only way to
//! get a fresh table.

use crate::data::aggregator::{aggregate_frame, AggregateError, WideTable};
use crate::data::loader::{load_records, LoaderError, SourceFingerprint};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

#[derive(Default)]
pub struct AggregateCache {
    entries: Mutex<HashMap<SourceFingerprint, Arc<WideTable>>>,
}

static SHARED: OnceLock<AggregateCache> = OnceLock::new();

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the whole process.
    pub fn shared() -> &'static AggregateCache {
        SHARED.get_or_init(AggregateCache::new)
    }

    /// Return the aggregated table for `path`, loading it on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<WideTable>, CacheError> {
        let key = SourceFingerprint::of(path)?;

        if let Some(table) = self.lookup(&key) {
            tracing::debug!(path = %key.path.display(), "aggregate cache hit");
            return Ok(table);
        }

        tracing::debug!(path = %key.path.display(), "aggregate cache miss");
        let table = Arc::new(aggregate_frame(load_records(path)?)?);

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Another caller may have won the race; keep whichever landed first.
        let stored = entries.entry(key).or_insert(table);
        Ok(Arc::clone(stored))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &SourceFingerprint) -> Option<Arc<WideTable>> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_second_load_reuses_table() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"year,name,n\n1910,Harry,5\n1910,Harry,1\n1911,Gertrude,2\n")
            .unwrap();
        file.flush().unwrap();

        let cache = AggregateCache::new();
        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.count(1910, "Harry"), Some(6));
        assert_eq!(first.count(1910, "Gertrude"), Some(0));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"year,label\n1910,Harry\n").unwrap();
        file.flush().unwrap();

        let cache = AggregateCache::new();
        assert!(cache.get_or_load(file.path()).is_err());
        assert!(cache.is_empty());
    }
}
