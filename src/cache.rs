//! cache.rs — day-keyed persistence of the last successful report.
//!
//! One process-wide slot pair: the serialized report and the date key it
//! was stored under. `load` answers "is today's report already here?";
//! stale entries are ignored, not deleted, and the next successful
//! acquisition overwrites them. The store itself is injected so tests can
//! substitute an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::report::DailyReport;

/// Slot holding the serialized [`DailyReport`].
pub const REPORT_SLOT: &str = "daily_report";
/// Slot holding the date key used for invalidation.
pub const DATE_SLOT: &str = "report_date";

/// Minimal string key-value surface over whatever the host offers.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Convenient alias used by callers.
pub type DynStore = Arc<dyn KeyValueStore>;

/// On-disk store: one file per slot, atomic tmp+rename writes.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        let _ = fs::create_dir_all(&dir); // best-effort
        Self { dir }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.lock().expect("store mutex poisoned");
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.inner.lock().expect("store mutex poisoned");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Day-keyed cache over an injected store.
pub struct ReportCache {
    store: DynStore,
}

impl ReportCache {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Returns the cached report only when it was stored under `date_key`.
    /// A mismatched or missing date slot, or an unreadable report slot,
    /// reads as absent.
    pub fn load(&self, date_key: &str) -> Option<DailyReport> {
        let stored_key = self.store.get(DATE_SLOT)?;
        if stored_key != date_key {
            debug!(%stored_key, %date_key, "cached report is stale");
            return None;
        }
        let raw = self.store.get(REPORT_SLOT)?;
        serde_json::from_str(&raw).ok()
    }

    /// Overwrites both slots with the given report and date key.
    pub fn store(&self, date_key: &str, report: &DailyReport) -> io::Result<()> {
        let json = serde_json::to_string(report)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.store.set(REPORT_SLOT, &json)?;
        self.store.set(DATE_SLOT, date_key)?;
        debug!(%date_key, "daily report cached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("trendsphere-test-{tag}-{nonce}"))
    }

    #[test]
    fn file_store_round_trips_a_slot() {
        let store = FileStore::new(unique_dir("roundtrip"));
        assert!(store.get("missing").is_none());
        store.set("slot", "value").expect("write slot");
        assert_eq!(store.get("slot").as_deref(), Some("value"));
        store.set("slot", "other").expect("overwrite slot");
        assert_eq!(store.get("slot").as_deref(), Some("other"));
    }

    #[test]
    fn file_store_leaves_no_tmp_file_behind() {
        let dir = unique_dir("tmpfile");
        let store = FileStore::new(dir.clone());
        store.set("slot", "value").expect("write slot");
        assert!(!dir.join("slot.json.tmp").exists());
        assert!(dir.join("slot.json").exists());
    }

    #[test]
    fn memory_store_is_independent_per_instance() {
        let a = MemoryStore::default();
        let b = MemoryStore::default();
        a.set("k", "v").unwrap();
        assert!(b.get("k").is_none());
    }
}
