//! JSON document store.
//!
//! Every persisted collection is a whole JSON document that is read in full
//! and overwritten in full. A missing or zero-length file is a first run, not
//! an error: the default document is written out and returned. Saves go
//! through a temp file in the same directory followed by a rename, so a
//! crash mid-write never leaves a torn document behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atomic rename failed: {0}")]
    Rename(#[from] tempfile::PersistError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The persisted documents, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    Patients,
    Earnings,
    Tests,
    AdminConfig,
}

impl DataFile {
    /// File name within the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DataFile::Patients => "patients.json",
            DataFile::Earnings => "earnings.json",
            DataFile::Tests => "tests.json",
            DataFile::AdminConfig => "admin_config.json",
        }
    }
}

/// Whole-document JSON store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    /// Open a store at the given directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Path of a document within the data directory.
    pub fn path(&self, file: DataFile) -> PathBuf {
        self.data_dir.join(file.file_name())
    }

    /// Load a document, writing and returning `default` when the file is
    /// missing or empty.
    pub fn load_or_init<T>(&self, file: DataFile, default: T) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = self.path(file);
        let first_run = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if first_run {
            tracing::info!(file = file.file_name(), "initializing default document");
            self.save(file, &default)?;
            return Ok(default);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrite a document atomically: serialize to a temp file in the same
    /// directory, then rename over the target.
    pub fn save<T: Serialize>(&self, file: DataFile, value: &T) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        serde_json::to_writer_pretty(&mut tmp, value)?;
        tmp.persist(self.path(file))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_default_and_creates_it() {
        let (_dir, store) = scratch_store();
        let earnings: BTreeMap<String, f64> =
            store.load_or_init(DataFile::Earnings, BTreeMap::new()).unwrap();
        assert!(earnings.is_empty());
        assert!(store.path(DataFile::Earnings).exists());
    }

    #[test]
    fn test_empty_file_is_first_run() {
        let (_dir, store) = scratch_store();
        fs::write(store.path(DataFile::Tests), "").unwrap();
        let tests: BTreeMap<String, f64> =
            store.load_or_init(DataFile::Tests, BTreeMap::new()).unwrap();
        assert!(tests.is_empty());
        // the default got written out in place of the empty file
        assert!(fs::metadata(store.path(DataFile::Tests)).unwrap().len() > 0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = scratch_store();
        let mut earnings = BTreeMap::new();
        earnings.insert("2024-01-05".to_string(), 500.0);
        store.save(DataFile::Earnings, &earnings).unwrap();

        let loaded: BTreeMap<String, f64> =
            store.load_or_init(DataFile::Earnings, BTreeMap::new()).unwrap();
        assert_eq!(loaded, earnings);
    }

    #[test]
    fn test_save_overwrites_whole_document() {
        let (_dir, store) = scratch_store();
        let mut earnings = BTreeMap::new();
        earnings.insert("2024-01-05".to_string(), 500.0);
        store.save(DataFile::Earnings, &earnings).unwrap();

        earnings.clear();
        earnings.insert("2024-02-01".to_string(), 150.0);
        store.save(DataFile::Earnings, &earnings).unwrap();

        let loaded: BTreeMap<String, f64> =
            store.load_or_init(DataFile::Earnings, BTreeMap::new()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("2024-02-01"), Some(&150.0));
    }
}
