//! Patient roster snapshot for hand-off to an external persistence layer.

use serde::{Deserialize, Serialize};

use super::ExportResult;
use crate::models::PatientRecord;
use crate::store::RecordStore;

/// Roster format version written into every export.
pub const ROSTER_FORMAT_VERSION: u32 = 1;

/// Full patient roster export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRoster {
    /// Export metadata
    pub metadata: RosterMetadata,
    /// Patients in store order
    pub patients: Vec<PatientRecord>,
}

/// Roster export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterMetadata {
    /// Export timestamp
    pub exported_at: String,
    /// Number of patients
    pub patient_count: usize,
    /// Roster format version
    pub format_version: u32,
}

impl PatientRoster {
    /// Snapshot the current contents of a store.
    pub fn from_store(store: &RecordStore) -> Self {
        let patients = store.snapshot();
        Self {
            metadata: RosterMetadata {
                exported_at: chrono::Utc::now().to_rfc3339(),
                patient_count: patients.len(),
                format_version: ROSTER_FORMAT_VERSION,
            },
            patients,
        }
    }

    /// Parse a roster previously written by [`PatientRoster::to_json`].
    pub fn from_json(json: &str) -> ExportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a store from the roster, validating every record.
    pub fn into_store(self) -> ExportResult<RecordStore> {
        Ok(RecordStore::from_records(self.patients)?)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("id,pet_name,owner_name,email,intake_date,symptoms\n");

        for patient in &self.patients {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                escape_csv(&patient.id),
                escape_csv(&patient.pet_name),
                escape_csv(&patient.owner_name),
                escape_csv(&patient.email),
                escape_csv(&patient.intake_date),
                escape_csv(&patient.symptoms),
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
