//! Backup round-trip: records written to the XML document and parsed back
//! must carry the same field values, including embedded tests.

use clinic_desk_core::{
    patients_from_xml, patients_to_xml, BackupManager, Gender, PatientDraft, PatientRecord,
    TestEntry,
};

fn sample_records() -> Vec<PatientRecord> {
    let asha = PatientRecord::from_draft(
        PatientDraft {
            name: "Asha".into(),
            age: 30,
            gender: Gender::Female,
            phone: "9876543210".into(),
            symptoms: "fever, headache".into(),
            tests: vec![
                TestEntry {
                    name: "CBC".into(),
                    value: "normal".into(),
                    cost: 200.0,
                },
                TestEntry {
                    name: "Liver & Kidney Panel".into(),
                    value: String::new(),
                    cost: 450.5,
                },
            ],
            consultation_fee: 300.0,
        },
        "2024-01-05".into(),
        Some("09:30".into()),
    );
    let ravi = PatientRecord::from_draft(
        PatientDraft {
            name: "Ravi <Jr>".into(),
            age: 0,
            gender: Gender::Male,
            phone: "not-a-phone".into(),
            symptoms: String::new(),
            tests: Vec::new(),
            consultation_fee: 150.0,
        },
        "2024-02-10".into(),
        None,
    );
    vec![asha, ravi]
}

#[test]
fn test_document_round_trip_preserves_fields() {
    let records = sample_records();
    let document = patients_to_xml(&records);
    let parsed = patients_from_xml(&document).unwrap();

    assert_eq!(parsed, records);
    // spot-check the embedded tests came through intact
    assert_eq!(parsed[0].tests.len(), 2);
    assert_eq!(parsed[0].tests[1].name, "Liver & Kidney Panel");
    assert_eq!(parsed[0].tests[1].cost, 450.5);
    assert!(parsed[1].tests.is_empty());
}

#[test]
fn test_backup_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let manager = BackupManager::open(dir.path().join("backup")).unwrap();
    let records = sample_records();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let path = manager.write_backup(&records, date).unwrap();
    let document = std::fs::read_to_string(path).unwrap();
    assert_eq!(patients_from_xml(&document).unwrap(), records);
}

#[test]
fn test_document_is_indented_and_hierarchical() {
    let document = patients_to_xml(&sample_records());
    assert!(document.starts_with("<?xml version=\"1.0\""));
    assert!(document.contains("\n  <Patient>"));
    assert!(document.contains("\n    <Tests>"));
    assert!(document.contains("\n      <Test>"));
}
