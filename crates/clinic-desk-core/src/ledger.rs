//! Patient ledger: the record collection and the per-day earnings aggregate.
//!
//! `LedgerManager` is the only writer of `patients.json` and `earnings.json`
//! and keeps them mutually consistent: for every date key present in the
//! earnings map, the amount equals the sum of `total_amount` over patients
//! with that visit date, and no key maps to a value of zero or less. Every
//! mutation recomputes the affected date's aggregate from the patient list
//! (the same strategy for create, update, and delete) and persists both
//! documents.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::models::{PatientDraft, PatientRecord};
use crate::store::{DataFile, JsonStore, StoreError};

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("patient name must not be empty")]
    EmptyName,

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Filter for [`LedgerManager::search`]. Both parts are optional; an empty
/// filter matches every record.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive substring against name, or raw substring against phone
    pub query: Option<String>,
    /// Inclusive visit-date range
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Records for one day, for the earnings drill-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGroup {
    pub date: String,
    pub total: f64,
    pub patients: Vec<PatientRecord>,
}

/// Earnings rollup as of a given date.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsSummary {
    /// Earnings on the as-of date
    pub today: f64,
    /// Earnings over the 7 dates ending at the as-of date, inclusive
    pub last_7_days: f64,
    /// Earnings over dates sharing the as-of date's `YYYY-MM` prefix
    pub this_month: f64,
    /// Records grouped by date, newest date first
    pub by_date: Vec<DailyGroup>,
}

/// Owns the patient list and the derived earnings map; sole writer of both.
pub struct LedgerManager {
    store: JsonStore,
    patients: Vec<PatientRecord>,
    earnings: BTreeMap<String, f64>,
}

impl LedgerManager {
    /// Load both collections from the store, initializing empty documents on
    /// first run.
    pub fn open(store: JsonStore) -> LedgerResult<Self> {
        let patients = store.load_or_init(DataFile::Patients, Vec::new())?;
        let earnings = store.load_or_init(DataFile::Earnings, BTreeMap::new())?;
        Ok(Self {
            store,
            patients,
            earnings,
        })
    }

    /// All records in insertion order. Callers present newest-first.
    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    /// The per-day earnings map.
    pub fn earnings(&self) -> &BTreeMap<String, f64> {
        &self.earnings
    }

    /// Look up a record by id.
    pub fn record(&self, record_id: &str) -> Option<&PatientRecord> {
        self.patients.iter().find(|p| p.record_id == record_id)
    }

    /// Create a record from a draft, stamping the visit date and time from
    /// the local clock.
    pub fn create_record(&mut self, draft: PatientDraft) -> LedgerResult<&PatientRecord> {
        let now = chrono::Local::now();
        self.create_record_dated(
            draft,
            now.format("%Y-%m-%d").to_string(),
            Some(now.format("%H:%M").to_string()),
        )
    }

    /// Create a record with an explicit visit date and time.
    ///
    /// Rejects a whitespace-only name before touching any state, so a failed
    /// create leaves both collections and both files untouched.
    pub fn create_record_dated(
        &mut self,
        draft: PatientDraft,
        date: String,
        time: Option<String>,
    ) -> LedgerResult<&PatientRecord> {
        if draft.name.trim().is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let record = PatientRecord::from_draft(draft, date, time);
        tracing::info!(
            record_id = %record.record_id,
            date = %record.date,
            total = record.total_amount,
            "creating patient record"
        );
        let date_key = record.date.clone();
        let idx = self.patients.len();
        self.patients.push(record);
        self.recompute_date(&date_key);
        self.persist()?;
        Ok(&self.patients[idx])
    }

    /// Replace the mutable fields of an existing record. The visit date and
    /// time are immutable, and the total is recomputed from the draft's fee
    /// and test costs, never taken from the caller.
    pub fn update_record(&mut self, record_id: &str, draft: PatientDraft) -> LedgerResult<()> {
        if draft.name.trim().is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let record = self
            .patients
            .iter_mut()
            .find(|p| p.record_id == record_id)
            .ok_or_else(|| LedgerError::NotFound(record_id.to_string()))?;
        record.apply(draft);
        let date = record.date.clone();
        tracing::info!(record_id, date = %date, "updating patient record");
        self.recompute_date(&date);
        self.persist()?;
        Ok(())
    }

    /// Remove a record, returning it. The date's aggregate is recomputed from
    /// the remaining records; a date left with no earnings loses its key.
    pub fn delete_record(&mut self, record_id: &str) -> LedgerResult<PatientRecord> {
        let idx = self
            .patients
            .iter()
            .position(|p| p.record_id == record_id)
            .ok_or_else(|| LedgerError::NotFound(record_id.to_string()))?;
        let record = self.patients.remove(idx);
        tracing::info!(record_id, date = %record.date, "deleting patient record");
        let date = record.date.clone();
        self.recompute_date(&date);
        self.persist()?;
        Ok(record)
    }

    /// Records matching the filter, in insertion order.
    ///
    /// While a date range is active, records whose stored date does not parse
    /// are skipped rather than failing the whole search.
    pub fn search(&self, filter: &SearchFilter) -> Vec<&PatientRecord> {
        let query = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        self.patients
            .iter()
            .filter(|p| match filter.date_range {
                None => true,
                Some((start, end)) => match p.parsed_date() {
                    Some(d) => start <= d && d <= end,
                    None => false,
                },
            })
            .filter(|p| match query {
                None => true,
                Some(q) => {
                    p.name.to_lowercase().contains(&q.to_lowercase()) || p.phone.contains(q)
                }
            })
            .collect()
    }

    /// Earnings rollup and per-day drill-down as of a date.
    pub fn earnings_summary(&self, as_of: NaiveDate) -> EarningsSummary {
        let as_of_key = as_of.format("%Y-%m-%d").to_string();
        let today = self.earnings.get(&as_of_key).copied().unwrap_or(0.0);

        let last_7_days = (0..7)
            .map(|i| (as_of - Duration::days(i)).format("%Y-%m-%d").to_string())
            .map(|key| self.earnings.get(&key).copied().unwrap_or(0.0))
            .sum();

        let month_prefix = as_of.format("%Y-%m").to_string();
        let this_month = self
            .earnings
            .iter()
            .filter(|(date, _)| date.starts_with(&month_prefix))
            .map(|(_, amount)| amount)
            .sum();

        let mut grouped: BTreeMap<&str, Vec<PatientRecord>> = BTreeMap::new();
        for p in &self.patients {
            grouped.entry(p.date.as_str()).or_default().push(p.clone());
        }
        let by_date = grouped
            .into_iter()
            .rev()
            .map(|(date, patients)| DailyGroup {
                date: date.to_string(),
                total: self.earnings.get(date).copied().unwrap_or(0.0),
                patients,
            })
            .collect();

        EarningsSummary {
            today,
            last_7_days,
            this_month,
            by_date,
        }
    }

    /// Recompute one date's aggregate from the patient list. A sum of zero or
    /// less removes the key entirely.
    fn recompute_date(&mut self, date: &str) {
        let sum: f64 = self
            .patients
            .iter()
            .filter(|p| p.date == date)
            .map(|p| p.total_amount)
            .sum();
        if sum > 0.0 {
            self.earnings.insert(date.to_string(), sum);
        } else {
            self.earnings.remove(date);
        }
    }

    /// Write both documents. Each write is atomic on its own; there is no
    /// cross-file transaction (single-writer model).
    fn persist(&self) -> LedgerResult<()> {
        self.store.save(DataFile::Patients, &self.patients)?;
        self.store.save(DataFile::Earnings, &self.earnings)?;
        Ok(())
    }
}
