//! Vet-Patients Core Library
//!
//! In-memory patient record management for a veterinary intake form.
//!
//! # Architecture
//!
//! ```text
//!        View (native UI, via FFI)
//!     │            │               ▲
//!     │ update_field, submit,      │ list / draft /
//!     │ begin_edit, cancel_edit    │ validation state
//!     ▼            │               │
//!  FormController ─┼── upsert ──▶ RecordStore
//!                  │                  ▲
//!                  └──── remove ──────┘
//!                                     │
//!                             PatientRoster (JSON / CSV snapshot)
//! ```
//!
//! # Core Principle
//!
//! **The form decides create vs. update from its own state.** A submission in
//! `Creating` always mints a fresh id; a submission in `Editing(record)` always
//! targets that record's id.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, PatientFields, FormMode, etc.)
//! - [`store`]: Ordered in-memory record collection
//! - [`form`]: Draft editing, validation and id generation
//! - [`export`]: Roster snapshot export/import
//! - [`logging`]: Logger bootstrap

pub mod export;
pub mod form;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use export::{ExportError, PatientRoster};
pub use form::{FormController, FormError, FormResult};
pub use logging::{init_logging, LogConfig, LoggingError};
pub use models::{FormMode, PatientField, PatientFields, PatientRecord, SubmitOutcome};
pub use store::{RecordStore, StoreError, UpsertOutcome};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum PatientTrackerError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FormError> for PatientTrackerError {
    fn from(e: FormError) -> Self {
        PatientTrackerError::Validation(e.to_string())
    }
}

impl From<StoreError> for PatientTrackerError {
    fn from(e: StoreError) -> Self {
        PatientTrackerError::InvalidSnapshot(e.to_string())
    }
}

impl From<ExportError> for PatientTrackerError {
    fn from(e: ExportError) -> Self {
        PatientTrackerError::InvalidSnapshot(e.to_string())
    }
}

impl From<LoggingError> for PatientTrackerError {
    fn from(e: LoggingError) -> Self {
        PatientTrackerError::Logging(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientTrackerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PatientTrackerError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a tracker with an empty patient list.
#[uniffi::export]
pub fn new_patient_tracker() -> Arc<PatientTracker> {
    Arc::new(PatientTracker::default())
}

/// Install the process-wide logger. `log_dir = None` logs to stderr.
#[uniffi::export]
pub fn init_tracker_logging(
    level: String,
    log_dir: Option<String>,
) -> Result<(), PatientTrackerError> {
    let config = LogConfig {
        level,
        log_dir: log_dir.map(PathBuf::from),
    };
    init_logging(&config)?;
    Ok(())
}

// =========================================================================
// Main API Object
// =========================================================================

/// One editing session: the record store and the form that feeds it.
#[derive(Debug, Default)]
struct Session {
    store: RecordStore,
    form: FormController,
}

/// Thread-safe session wrapper for FFI.
#[derive(Debug, Default, uniffi::Object)]
pub struct PatientTracker {
    session: Mutex<Session>,
}

impl PatientTracker {
    fn session(&self) -> Result<MutexGuard<'_, Session>, PatientTrackerError> {
        Ok(self.session.lock()?)
    }
}

#[uniffi::export]
impl PatientTracker {
    // =========================================================================
    // Form Operations
    // =========================================================================

    /// Set one draft field.
    pub fn update_field(
        &self,
        field: FfiPatientField,
        value: String,
    ) -> Result<(), PatientTrackerError> {
        self.session()?.form.update_field(field.into(), value);
        Ok(())
    }

    /// Validate the draft and commit it.
    pub fn submit(&self) -> Result<FfiSubmitOutcome, PatientTrackerError> {
        let mut session = self.session()?;
        let Session { store, form } = &mut *session;
        let outcome = form.submit(store)?;
        Ok(outcome.into())
    }

    /// Load a listed patient into the form for editing.
    pub fn begin_edit(&self, id: String) -> Result<(), PatientTrackerError> {
        let mut session = self.session()?;
        let Session { store, form } = &mut *session;
        let record = store
            .get(&id)
            .ok_or_else(|| PatientTrackerError::NotFound(id.clone()))?;
        form.begin_edit(record);
        Ok(())
    }

    /// Abandon the current edit and clear the form.
    pub fn cancel_edit(&self) -> Result<(), PatientTrackerError> {
        self.session()?.form.cancel_edit();
        Ok(())
    }

    /// Current draft values.
    pub fn draft(&self) -> Result<FfiDraft, PatientTrackerError> {
        let session = self.session()?;
        let fields = session.form.draft().clone();
        Ok(FfiDraft {
            pet_name: fields.pet_name,
            owner_name: fields.owner_name,
            email: fields.email,
            intake_date: fields.intake_date,
            symptoms: fields.symptoms,
            editing_id: session.form.editing_id().map(str::to_string),
        })
    }

    /// Check if the form is editing an existing patient.
    pub fn is_editing(&self) -> Result<bool, PatientTrackerError> {
        Ok(self.session()?.form.is_editing())
    }

    /// Check if the last submission failed validation.
    pub fn has_validation_error(&self) -> Result<bool, PatientTrackerError> {
        Ok(self.session()?.form.has_validation_error())
    }

    /// Validation banner text, if any.
    pub fn validation_message(&self) -> Result<Option<String>, PatientTrackerError> {
        Ok(self
            .session()?
            .form
            .validation_message()
            .map(str::to_string))
    }

    /// Submit button label.
    pub fn submit_label(&self) -> Result<String, PatientTrackerError> {
        Ok(self.session()?.form.submit_label().to_string())
    }

    // =========================================================================
    // Patient List Operations
    // =========================================================================

    /// All patients in insertion order.
    pub fn list_patients(&self) -> Result<Vec<FfiPatientRecord>, PatientTrackerError> {
        let session = self.session()?;
        Ok(session
            .store
            .list()
            .iter()
            .cloned()
            .map(FfiPatientRecord::from)
            .collect())
    }

    /// Number of patients.
    pub fn patient_count(&self) -> Result<u32, PatientTrackerError> {
        Ok(self.session()?.store.len() as u32)
    }

    /// Remove a patient after the view has confirmed it.
    ///
    /// Returns false when no such patient exists.
    pub fn remove_patient(&self, id: String) -> Result<bool, PatientTrackerError> {
        let mut session = self.session()?;
        let removed = session.store.remove(&id).is_some();
        if removed && session.form.editing_id() == Some(id.as_str()) {
            session.form.cancel_edit();
        }
        Ok(removed)
    }

    // =========================================================================
    // Roster Operations
    // =========================================================================

    /// Export all patients as JSON.
    pub fn export_roster_json(&self) -> Result<String, PatientTrackerError> {
        let session = self.session()?;
        Ok(PatientRoster::from_store(&session.store).to_json()?)
    }

    /// Export all patients as CSV.
    pub fn export_roster_csv(&self) -> Result<String, PatientTrackerError> {
        let session = self.session()?;
        Ok(PatientRoster::from_store(&session.store).to_csv())
    }

    /// Replace all patients with a JSON roster. Returns the patient count.
    ///
    /// The current session is left untouched when the roster is invalid.
    pub fn import_roster_json(&self, json: String) -> Result<u32, PatientTrackerError> {
        let roster = PatientRoster::from_json(&json)?;
        let store = RecordStore::from_records(roster.patients)?;
        let count = store.len() as u32;

        let mut session = self.session()?;
        session.store = store;
        session.form = FormController::new();
        Ok(count)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe field selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiPatientField {
    PetName,
    OwnerName,
    Email,
    IntakeDate,
    Symptoms,
}

impl From<FfiPatientField> for PatientField {
    fn from(field: FfiPatientField) -> Self {
        match field {
            FfiPatientField::PetName => PatientField::PetName,
            FfiPatientField::OwnerName => PatientField::OwnerName,
            FfiPatientField::Email => PatientField::Email,
            FfiPatientField::IntakeDate => PatientField::IntakeDate,
            FfiPatientField::Symptoms => PatientField::Symptoms,
        }
    }
}

/// FFI-safe patient record.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiPatientRecord {
    pub id: String,
    pub pet_name: String,
    pub owner_name: String,
    pub email: String,
    pub intake_date: String,
    pub symptoms: String,
}

impl From<PatientRecord> for FfiPatientRecord {
    fn from(record: PatientRecord) -> Self {
        Self {
            id: record.id,
            pet_name: record.pet_name,
            owner_name: record.owner_name,
            email: record.email,
            intake_date: record.intake_date,
            symptoms: record.symptoms,
        }
    }
}

/// FFI-safe form draft.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiDraft {
    pub pet_name: String,
    pub owner_name: String,
    pub email: String,
    pub intake_date: String,
    pub symptoms: String,
    /// Id of the patient being edited, absent when creating
    pub editing_id: Option<String>,
}

/// FFI-safe submission outcome.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSubmitOutcome {
    Created { id: String },
    Updated { id: String },
    Discarded { id: String },
}

impl From<SubmitOutcome> for FfiSubmitOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Created(id) => FfiSubmitOutcome::Created { id },
            SubmitOutcome::Updated(id) => FfiSubmitOutcome::Updated { id },
            SubmitOutcome::Discarded(id) => FfiSubmitOutcome::Discarded { id },
        }
    }
}
