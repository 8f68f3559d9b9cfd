//! In-memory patient record store.
//!
//! The store is the single source of truth for the patient collection.
//! Insertion order is the only ordering; edits replace records in place.

use std::collections::HashSet;

use log::{debug, info};
use thiserror::Error;

use crate::models::{join_fields, PatientField, PatientRecord};

/// Store errors.
///
/// Mutations on a live store never fail; these only arise when rebuilding a
/// store from an external snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record with empty id")]
    EmptyId,

    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    #[error("Record {id} has empty fields: {}", join_fields(.missing))]
    InvalidRecord {
        id: String,
        missing: Vec<PatientField>,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Appended at the end of the collection
    Inserted,
    /// Replaced the record at this position
    Replaced(usize),
}

/// Ordered collection of patient records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<PatientRecord>,
    /// Every id ever stored, including removed ones
    issued_ids: HashSet<String>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, keeping its order.
    pub fn from_records(records: Vec<PatientRecord>) -> StoreResult<Self> {
        let mut store = Self::new();
        for record in records {
            if record.id.is_empty() {
                return Err(StoreError::EmptyId);
            }
            if store.contains(&record.id) {
                return Err(StoreError::DuplicateId(record.id));
            }
            let missing = record.fields().missing_fields();
            if !missing.is_empty() {
                return Err(StoreError::InvalidRecord {
                    id: record.id,
                    missing,
                });
            }
            store.issued_ids.insert(record.id.clone());
            store.records.push(record);
        }
        debug!(
            "event=store_restored module=store status=ok count={}",
            store.len()
        );
        Ok(store)
    }

    /// Current collection in insertion order.
    pub fn list(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<PatientRecord> {
        self.records.clone()
    }

    /// Replace the record with the same id in place, or append it.
    pub fn upsert(&mut self, record: PatientRecord) -> UpsertOutcome {
        debug_assert!(!record.id.is_empty(), "record id must not be empty");

        if let Some(index) = self.position(&record.id) {
            info!(
                "event=record_upsert module=store status=replaced id={} position={}",
                record.id, index
            );
            self.records[index] = record;
            return UpsertOutcome::Replaced(index);
        }

        info!(
            "event=record_upsert module=store status=inserted id={} position={}",
            record.id,
            self.records.len()
        );
        self.issued_ids.insert(record.id.clone());
        self.records.push(record);
        UpsertOutcome::Inserted
    }

    /// Remove the record with this id. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<PatientRecord> {
        let Some(index) = self.position(id) else {
            debug!("event=record_remove module=store status=absent id={}", id);
            return None;
        };
        info!("event=record_remove module=store status=ok id={}", id);
        Some(self.records.remove(index))
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Position of a record in the collection.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    /// Check if a record with this id is currently stored.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Check if this id has ever been stored in this session.
    pub fn is_id_issued(&self, id: &str) -> bool {
        self.issued_ids.contains(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
