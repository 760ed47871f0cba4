//! Clinic Desk Core Library
//!
//! Single-user clinic front-desk core: patient records, a derived per-day
//! earnings ledger, a test price catalog, a password gate, and XML backups,
//! all persisted as whole JSON documents under a data directory.
//!
//! # Core Principle
//!
//! **The ledger is derived state.** For every date key in the earnings map,
//! the amount equals the sum of `total_amount` over patient records with that
//! visit date, and no key holds a value of zero or less. [`LedgerManager`] is
//! the only writer of both collections and re-establishes this on every
//! create, update, and delete.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, TestEntry, TestCatalog, etc.)
//! - [`store`]: Whole-document JSON persistence with atomic overwrite
//! - [`ledger`]: The patient list and earnings aggregate, kept consistent
//! - [`catalog`]: Admin-editable test price list
//! - [`auth`]: Shared-password gate for the admin and earnings views
//! - [`export`]: XML backup writer/reader and dated backup files
//!
//! # Concurrency model
//!
//! Single-threaded, single-process, sequential mutations. Two processes
//! sharing a data directory are last-writer-wins with no conflict detection.

pub mod auth;
pub mod catalog;
pub mod export;
pub mod ledger;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use auth::{AdminConfig, AuthSession};
pub use catalog::{CatalogError, TestCatalogManager};
pub use export::{patients_from_xml, patients_to_xml, BackupManager, ExportError};
pub use ledger::{DailyGroup, EarningsSummary, LedgerError, LedgerManager, SearchFilter};
pub use models::{phone_issues, Gender, PatientDraft, PatientRecord, PhoneIssue, TestCatalog, TestEntry};
pub use store::{DataFile, JsonStore, StoreError};

/// Umbrella error for callers driving the whole application.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}
