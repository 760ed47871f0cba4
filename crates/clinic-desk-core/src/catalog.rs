//! Test catalog management.
//!
//! The catalog is the admin-editable price list. Edits never touch historic
//! patient records: each record snapshots test names and costs at selection
//! time.

use thiserror::Error;

use crate::models::TestCatalog;
use crate::store::{DataFile, JsonStore, StoreError};

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("test name must not be empty")]
    EmptyName,

    #[error("test already exists: {0}")]
    Duplicate(String),

    #[error("test not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Owns the test catalog and persists `tests.json` after each mutation.
pub struct TestCatalogManager {
    store: JsonStore,
    catalog: TestCatalog,
}

impl TestCatalogManager {
    /// Load the catalog, initializing an empty one on first run.
    pub fn open(store: JsonStore) -> CatalogResult<Self> {
        let catalog = store.load_or_init(DataFile::Tests, TestCatalog::new())?;
        Ok(Self { store, catalog })
    }

    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    /// Add a new test. The name must be non-empty after trimming and not
    /// already present.
    pub fn add_test(&mut self, name: &str, price: f64) -> CatalogResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.catalog.contains(name) {
            return Err(CatalogError::Duplicate(name.to_string()));
        }
        tracing::info!(name, price, "adding catalog test");
        self.catalog.insert(name.to_string(), price);
        self.persist()
    }

    /// Rename and/or reprice an existing test: the old key is removed and the
    /// new name inserted with the new price. Historic records keep their
    /// snapshotted name and cost.
    pub fn rename_or_reprice(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_price: f64,
    ) -> CatalogResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !self.catalog.contains(old_name) {
            return Err(CatalogError::NotFound(old_name.to_string()));
        }
        if new_name != old_name && self.catalog.contains(new_name) {
            return Err(CatalogError::Duplicate(new_name.to_string()));
        }
        tracing::info!(old_name, new_name, new_price, "updating catalog test");
        self.catalog.remove(old_name);
        self.catalog.insert(new_name.to_string(), new_price);
        self.persist()
    }

    /// Remove a test from the catalog. Historic records are unaffected.
    pub fn delete_test(&mut self, name: &str) -> CatalogResult<()> {
        if self.catalog.remove(name).is_none() {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        tracing::info!(name, "deleting catalog test");
        self.persist()
    }

    fn persist(&self) -> CatalogResult<()> {
        self.store.save(DataFile::Tests, &self.catalog)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_catalog() -> (tempfile::TempDir, TestCatalogManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("data")).unwrap();
        let manager = TestCatalogManager::open(store).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_add_and_duplicate() {
        let (_dir, mut manager) = scratch_catalog();
        manager.add_test("CBC", 200.0).unwrap();
        assert_eq!(manager.catalog().price_of("CBC"), Some(200.0));

        let err = manager.add_test("CBC", 250.0).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(_)));
        // price unchanged
        assert_eq!(manager.catalog().price_of("CBC"), Some(200.0));
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let (_dir, mut manager) = scratch_catalog();
        assert!(matches!(
            manager.add_test("   ", 100.0),
            Err(CatalogError::EmptyName)
        ));
        assert!(manager.catalog().is_empty());
    }

    #[test]
    fn test_rename_and_reprice() {
        let (_dir, mut manager) = scratch_catalog();
        manager.add_test("CBC", 200.0).unwrap();
        manager.rename_or_reprice("CBC", "Complete Blood Count", 250.0).unwrap();

        assert!(!manager.catalog().contains("CBC"));
        assert_eq!(manager.catalog().price_of("Complete Blood Count"), Some(250.0));
    }

    #[test]
    fn test_reprice_in_place() {
        let (_dir, mut manager) = scratch_catalog();
        manager.add_test("CBC", 200.0).unwrap();
        manager.rename_or_reprice("CBC", "CBC", 250.0).unwrap();
        assert_eq!(manager.catalog().price_of("CBC"), Some(250.0));
        assert_eq!(manager.catalog().len(), 1);
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let (_dir, mut manager) = scratch_catalog();
        manager.add_test("CBC", 200.0).unwrap();
        manager.add_test("X-Ray", 500.0).unwrap();
        let err = manager.rename_or_reprice("CBC", "X-Ray", 300.0).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(_)));
        assert_eq!(manager.catalog().price_of("X-Ray"), Some(500.0));
    }

    #[test]
    fn test_delete() {
        let (_dir, mut manager) = scratch_catalog();
        manager.add_test("CBC", 200.0).unwrap();
        manager.delete_test("CBC").unwrap();
        assert!(manager.catalog().is_empty());

        assert!(matches!(
            manager.delete_test("CBC"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("data")).unwrap();
        {
            let mut manager = TestCatalogManager::open(store.clone()).unwrap();
            manager.add_test("CBC", 200.0).unwrap();
        }
        let manager = TestCatalogManager::open(store).unwrap();
        assert_eq!(manager.catalog().price_of("CBC"), Some(200.0));
    }
}
