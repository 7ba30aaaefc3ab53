use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{CotizaError, DEFAULT_CACHE_KEY, RateSnapshot};

/// Minimal string key-value storage, the shape of a browser's local storage.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns `CacheRead` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, CotizaError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    /// Returns `CacheWrite` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), CotizaError>;
}

/// Single-slot store for the last known good snapshot.
///
/// Both operations are synchronous and infallible from the caller's point of view:
/// the cache is best-effort.
pub trait SnapshotStore: Send + Sync {
    /// Overwrite the slot with `snapshot`. Persistence errors are swallowed.
    fn save(&self, snapshot: &RateSnapshot);

    /// The last saved snapshot verbatim, or `None` when nothing was saved or the
    /// stored value cannot be parsed.
    fn load(&self) -> Option<RateSnapshot>;
}

/// In-process storage backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CotizaError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| CotizaError::CacheRead("memory storage lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CotizaError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| CotizaError::CacheWrite("memory storage lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage keeping each key in `<dir>/<key>.json`.
///
/// Each write lands in its own uniquely named temporary sibling and is renamed over
/// the target, so a reader never observes a half-written value and concurrent
/// writers never share a temporary file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CotizaError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(CotizaError::InvalidArg(format!(
                "storage key {key:?} is not a plain file name"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CotizaError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CotizaError::CacheRead(format!("{}: {e}", path.display()))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CotizaError> {
        let path = self.path_for(key)?;
        let write_err = |e: std::io::Error| CotizaError::CacheWrite(format!("{}: {e}", path.display()));
        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        tmp.write_all(value.as_bytes()).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// `SnapshotStore` persisting the snapshot as JSON under one well-known key.
#[derive(Clone)]
pub struct SnapshotCache {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl SnapshotCache {
    /// Cache over `storage` using the slot named `key`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Cache over fresh in-memory storage using the default slot name.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_CACHE_KEY)
    }

    /// Name of the persisted slot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the slot, distinguishing "absent" from "present but unreadable".
    ///
    /// # Errors
    /// Returns `CacheRead` when the storage fails or the stored value does not parse
    /// as a valid snapshot.
    pub fn read(&self) -> Result<Option<RateSnapshot>, CotizaError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        let snapshot: RateSnapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    /// Serialize and write `snapshot`, surfacing persistence errors.
    ///
    /// # Errors
    /// Returns `CacheWrite` when serialization or the underlying write fails.
    pub fn write(&self, snapshot: &RateSnapshot) -> Result<(), CotizaError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| CotizaError::CacheWrite(e.to_string()))?;
        self.storage.set(&self.key, &raw)
    }
}

impl SnapshotStore for SnapshotCache {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cotiza_core::cache::save",
            skip(self, snapshot),
            fields(key = %self.key, provider = %snapshot.provider()),
        )
    )]
    fn save(&self, snapshot: &RateSnapshot) {
        if let Err(e) = self.write(snapshot) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "failed to persist rate snapshot");
            #[cfg(not(feature = "tracing"))]
            let _ = e;
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "cotiza_core::cache::load", skip(self), fields(key = %self.key))
    )]
    fn load(&self) -> Option<RateSnapshot> {
        match self.read() {
            Ok(v) => v,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "ignoring unreadable cached snapshot");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
                None
            }
        }
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurrencyCode;

    fn snapshot(ts: i64) -> RateSnapshot {
        RateSnapshot::new_at(
            CurrencyCode::USD,
            "2025-10-07",
            [(CurrencyCode::ARS, 1400.5), (CurrencyCode::EUR, 0.93)]
                .into_iter()
                .collect(),
            "open.er-api.com",
            ts,
        )
        .unwrap()
    }

    #[test]
    fn empty_slot_loads_none() {
        let cache = SnapshotCache::in_memory();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn save_overwrites_single_slot() {
        let cache = SnapshotCache::in_memory();
        cache.save(&snapshot(1));
        cache.save(&snapshot(2));
        assert_eq!(cache.load().map(|s| s.fetched_at_epoch_ms()), Some(2));
    }

    #[test]
    fn unparsable_value_is_absent_but_reported_by_read() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(DEFAULT_CACHE_KEY, "{not json").unwrap();
        let cache = SnapshotCache::new(storage, DEFAULT_CACHE_KEY);
        assert_eq!(cache.load(), None);
        assert!(matches!(cache.read(), Err(CotizaError::CacheRead(_))));
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new("unused");
        for key in ["", "../x", "a/b", ".hidden"] {
            assert!(matches!(
                storage.get(key),
                Err(CotizaError::InvalidArg(_))
            ));
        }
    }
}
