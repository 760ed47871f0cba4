//! Patient record models.

use serde::{Deserialize, Serialize};

/// Patient gender as captured on the intake form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

/// A diagnostic test attached to a patient record.
///
/// Stored by value: the name and cost are snapshotted from the catalog at
/// selection time, so later catalog edits never rewrite historic records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestEntry {
    /// Test name as it appeared in the catalog when selected
    pub name: String,
    /// Recorded result, may be empty
    pub value: String,
    /// Billed cost, defaults to the catalog price but editable per record
    pub cost: f64,
}

/// One visit/encounter entry with demographic, clinical, and billing data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Stable identifier, generated at creation
    pub record_id: String,
    /// Patient name
    pub name: String,
    /// Age in years (0-120)
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Phone number, expected 10 digits but not enforced
    pub phone: String,
    /// Free-text symptoms
    pub symptoms: String,
    /// Tests performed this visit, in selection order
    pub tests: Vec<TestEntry>,
    /// Consultation fee
    pub consultation_fee: f64,
    /// Billed total: consultation fee plus the sum of test costs
    pub total_amount: f64,
    /// Visit date, `YYYY-MM-DD`, immutable once created
    pub date: String,
    /// Visit time of day, `HH:MM`, immutable once created
    pub time: Option<String>,
}

impl PatientRecord {
    /// Build a record from a draft, stamping identity and the visit date/time.
    pub fn from_draft(draft: PatientDraft, date: String, time: Option<String>) -> Self {
        let total_amount = draft.total_amount();
        Self {
            record_id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            age: draft.age,
            gender: draft.gender,
            phone: draft.phone,
            symptoms: draft.symptoms,
            tests: draft.tests,
            consultation_fee: draft.consultation_fee,
            total_amount,
            date,
            time,
        }
    }

    /// Replace every mutable field from a draft. Identity, date, and time are
    /// kept; the total is recomputed, never taken from the caller.
    pub fn apply(&mut self, draft: PatientDraft) {
        self.total_amount = draft.total_amount();
        self.name = draft.name;
        self.age = draft.age;
        self.gender = draft.gender;
        self.phone = draft.phone;
        self.symptoms = draft.symptoms;
        self.tests = draft.tests;
        self.consultation_fee = draft.consultation_fee;
    }

    /// Parse the stored visit date, if well-formed.
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// The mutable field set of a patient record: the input to create, and the
/// full replacement set for update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientDraft {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone: String,
    pub symptoms: String,
    pub tests: Vec<TestEntry>,
    pub consultation_fee: f64,
}

impl PatientDraft {
    /// Billed total for these fields: fee plus the sum of test costs.
    pub fn total_amount(&self) -> f64 {
        self.consultation_fee + self.tests.iter().map(|t| t.cost).sum::<f64>()
    }
}

/// Advisory findings about a phone number. Shown to the operator as warnings;
/// saving is never blocked on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneIssue {
    /// Contains characters other than digits
    NonDigit,
    /// Fewer than 10 digits
    TooShort(usize),
    /// More than 10 digits
    TooLong(usize),
}

impl std::fmt::Display for PhoneIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhoneIssue::NonDigit => write!(f, "phone number must contain only digits"),
            PhoneIssue::TooShort(n) => write!(f, "phone number is too short ({}/10 digits)", n),
            PhoneIssue::TooLong(n) => write!(f, "phone number is too long ({}/10 digits)", n),
        }
    }
}

/// Check a phone number against the expected 10-digit shape. An empty input
/// yields no findings (nothing entered yet).
pub fn phone_issues(phone: &str) -> Vec<PhoneIssue> {
    let mut issues = Vec::new();
    if phone.is_empty() {
        return issues;
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        issues.push(PhoneIssue::NonDigit);
    }
    let len = phone.chars().count();
    if len < 10 {
        issues.push(PhoneIssue::TooShort(len));
    } else if len > 10 {
        issues.push(PhoneIssue::TooLong(len));
    }
    issues
}
