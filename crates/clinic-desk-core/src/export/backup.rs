//! Dated backup files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::models::PatientRecord;

use super::{patients_from_xml, patients_to_xml, ExportError, ExportResult};

/// Writes and lists XML backups of the patient list.
///
/// One backup file per calendar day of invocation, named
/// `patients_backup_<YYYY-MM-DD>.xml`; re-running on the same day overwrites
/// that day's file.
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Open a backup manager, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(backup_dir: P) -> ExportResult<Self> {
        let backup_dir = backup_dir.as_ref().to_path_buf();
        fs::create_dir_all(&backup_dir)?;
        Ok(Self { backup_dir })
    }

    /// Backup file name for a given day.
    pub fn file_name(date: NaiveDate) -> String {
        format!("patients_backup_{}.xml", date.format("%Y-%m-%d"))
    }

    /// Write a backup dated today.
    pub fn write_backup_today(&self, patients: &[PatientRecord]) -> ExportResult<PathBuf> {
        self.write_backup(patients, chrono::Local::now().date_naive())
    }

    /// Write a backup for the given day, overwriting any existing file for
    /// that day, and verify it by reading the document back.
    pub fn write_backup(
        &self,
        patients: &[PatientRecord],
        date: NaiveDate,
    ) -> ExportResult<PathBuf> {
        let path = self.backup_dir.join(Self::file_name(date));
        let document = patients_to_xml(patients);
        fs::write(&path, &document)?;

        let read_back = patients_from_xml(&document)?;
        if read_back.len() != patients.len() {
            return Err(ExportError::Verification {
                expected: patients.len(),
                actual: read_back.len(),
            });
        }
        tracing::info!(path = %path.display(), records = patients.len(), "backup written");
        Ok(path)
    }

    /// Existing `.xml` backups, newest file name first. The fixed-width date
    /// in the name makes lexicographic descending order date order.
    pub fn list_backups(&self) -> ExportResult<Vec<PathBuf>> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "xml") {
                backups.push(path);
            }
        }
        backups.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PatientDraft};

    fn make_record(name: &str) -> PatientRecord {
        PatientRecord::from_draft(
            PatientDraft {
                name: name.into(),
                age: 40,
                gender: Gender::Male,
                phone: "9000000000".into(),
                symptoms: String::new(),
                tests: Vec::new(),
                consultation_fee: 250.0,
            },
            "2024-01-05".into(),
            None,
        )
    }

    #[test]
    fn test_write_names_file_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::open(dir.path().join("backup")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        let path = manager.write_backup(&[make_record("Asha")], date).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "patients_backup_2024-01-05.xml"
        );
    }

    #[test]
    fn test_same_day_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::open(dir.path().join("backup")).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        manager.write_backup(&[make_record("Asha")], date).unwrap();
        manager
            .write_backup(&[make_record("Asha"), make_record("Ravi")], date)
            .unwrap();

        assert_eq!(manager.list_backups().unwrap().len(), 1);
        let document = fs::read_to_string(
            manager.list_backups().unwrap().first().unwrap(),
        )
        .unwrap();
        assert_eq!(patients_from_xml(&document).unwrap().len(), 2);
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::open(dir.path().join("backup")).unwrap();

        for day in [3, 15, 9] {
            let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            manager.write_backup(&[], date).unwrap();
        }
        // a stray non-xml file is ignored
        fs::write(dir.path().join("backup").join("notes.txt"), "x").unwrap();

        let names: Vec<_> = manager
            .list_backups()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "patients_backup_2024-01-15.xml",
                "patients_backup_2024-01-09.xml",
                "patients_backup_2024-01-03.xml",
            ]
        );
    }
}
