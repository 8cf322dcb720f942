//! Single-record fortune cache
//!
//! Stored as `{"fortune": "...", "timestamp": <epoch seconds>}`. Anything
//! that cannot be read back as a valid fortune is treated as a miss.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::consts::TAG;
use crate::core::{CachedFortune, Fortune, now_epoch};
use crate::error::PersistError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    fortune: String,
    #[serde(deserialize_with = "epoch_seconds")]
    timestamp: i64,
}

/// Accept both integer and fractional epoch seconds
fn epoch_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    f64::deserialize(deserializer).map(|secs| secs as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClearOutcome {
    Cleared,
    NothingToClear,
}

#[derive(Debug, Clone)]
pub(crate) struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub(crate) fn load(&self) -> Option<CachedFortune> {
        let content = fs::read_to_string(&self.path).ok()?;
        let record: CacheRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                debug!("Ignoring unreadable cache {}: {e}", self.path.display());
                return None;
            }
        };
        let fortune = Fortune::parse(&record.fortune)?;
        Some(CachedFortune {
            fortune,
            timestamp: record.timestamp,
        })
    }

    /// Best-effort save: failures are reported and swallowed
    pub(crate) fn save(&self, fortune: &Fortune) {
        if let Err(e) = self.try_save(fortune, now_epoch()) {
            warn!("{TAG} {e}");
        }
    }

    /// Write via a temp file and rename so readers never see a partial record
    pub(crate) fn try_save(&self, fortune: &Fortune, timestamp: i64) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let record = CacheRecord {
            fortune: fortune.as_str().to_string(),
            timestamp,
        };
        let payload = serde_json::to_vec(&record).map_err(PersistError::Encode)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", std::process::id()));
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, payload).map_err(PersistError::WriteCache)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(PersistError::WriteCache(e));
        }
        Ok(())
    }

    pub(crate) fn clear(&self) -> Result<ClearOutcome, PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(ClearOutcome::Cleared),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ClearOutcome::NothingToClear),
            Err(e) => Err(PersistError::Clear(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn store_in(dir: &Path) -> CacheStore {
        CacheStore::new(dir.join("share").join("fortunebot").join("cache.json"))
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let fortune = Fortune::parse("🤖 Good luck.").unwrap();

        store.save(&fortune);
        let cached = store.load().unwrap();

        assert_eq!(cached.fortune, fortune);
        assert!((now_epoch() - cached.timestamp).abs() <= 5);
        assert!(cached.is_fresh_at(60, now_epoch()));
    }

    #[test]
    fn saved_file_is_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .try_save(&Fortune::parse("🤖 Hi").unwrap(), 1_700_000_000)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["fortune"], "🤖 Hi");
        assert_eq!(raw["timestamp"], 1_700_000_000);
        // no temp files left behind
        let entries = fs::read_dir(store.path().parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn load_missing_or_corrupt_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load().is_none());

        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_none());

        fs::write(store.path(), r#"{"fortune": "x"}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_rejects_tagged_or_blank_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(
            store.path(),
            r#"{"fortune": "[fortunebot] Error: no API key provided", "timestamp": 1700000000}"#,
        )
        .unwrap();
        assert!(store.load().is_none());

        fs::write(store.path(), r#"{"fortune": "  ", "timestamp": 1700000000}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_accepts_fractional_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"fortune": "🤖 Old", "timestamp": 1700000000.0}"#,
        )
        .unwrap();

        let cached = store.load().unwrap();
        assert_eq!(cached.timestamp, 1_700_000_000);
        assert!(!cached.is_fresh_at(60, now_epoch()));
    }

    #[test]
    fn save_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file where a directory should be").unwrap();
        let store = CacheStore::new(blocker.join("cache.json"));
        let fortune = Fortune::parse("🤖 Hi").unwrap();

        assert!(matches!(
            store.try_save(&fortune, 1),
            Err(PersistError::CreateDir { .. })
        ));
        // the swallowing variant must not panic
        store.save(&fortune);
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_distinguishes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.clear().unwrap(), ClearOutcome::NothingToClear);

        store
            .try_save(&Fortune::parse("🤖 Hi").unwrap(), 1)
            .unwrap();
        assert_eq!(store.clear().unwrap(), ClearOutcome::Cleared);
        assert!(!store.path().exists());
        assert_eq!(store.clear().unwrap(), ClearOutcome::NothingToClear);
    }
}
