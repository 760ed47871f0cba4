//! Backup export: XML serialization of the patient list and dated backup
//! files on disk.

mod backup;
mod xml;

pub use backup::*;
pub use xml::*;

use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing field in backup document: {0}")]
    MissingField(String),

    #[error("invalid number in backup document: {0}")]
    InvalidNumber(String),

    #[error("invalid gender in backup document: {0}")]
    InvalidGender(String),

    #[error("malformed backup document: {0}")]
    Malformed(String),

    #[error("backup verification failed: wrote {expected} records, read back {actual}")]
    Verification { expected: usize, actual: usize },
}

pub type ExportResult<T> = Result<T, ExportError>;
