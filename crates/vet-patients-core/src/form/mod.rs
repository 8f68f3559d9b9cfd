//! Patient intake form controller.
//!
//! Owns the working draft and decides whether a submission creates a new
//! record or replaces the one being edited.
//!
//! ```text
//!            begin_edit(record)
//!   Creating ─────────────────────▶ Editing(record)
//!      ▲  │                              │  │
//!      │  └─ submit: append new id       │  └─ begin_edit(other): rebind
//!      │                                 │
//!      └──── submit: replace same id ────┘
//!      └──── cancel_edit ────────────────┘
//! ```
//!
//! A failed validation leaves the state, the draft and the store untouched.

mod id;

pub use id::*;

use log::{info, warn};
use thiserror::Error;

use crate::models::{
    join_fields, FormMode, PatientField, PatientFields, PatientRecord, SubmitOutcome,
};
use crate::store::RecordStore;

/// Banner text shown while the last submission failed validation.
pub const VALIDATION_MESSAGE: &str = "All fields are required";

/// Form errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("All fields are required (missing: {})", join_labels(.0))]
    MissingFields(Vec<PatientField>),
}

pub type FormResult<T> = Result<T, FormError>;

fn join_labels(fields: &[PatientField]) -> String {
    fields
        .iter()
        .map(PatientField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Transient editing state of the patient form.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    mode: FormMode,
    draft: PatientFields,
    validation_failed: bool,
}

impl FormController {
    /// Create a controller in the creating state with an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `record`, replacing any draft in progress.
    pub fn begin_edit(&mut self, record: &PatientRecord) {
        info!("event=edit_begin module=form status=ok id={}", record.id);
        self.draft = record.fields();
        self.mode = FormMode::Editing(record.clone());
    }

    /// Set one draft field. No validation happens here.
    pub fn update_field(&mut self, field: PatientField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Abandon any edit and clear the draft.
    ///
    /// The validation banner stays up until the next submission attempt.
    pub fn cancel_edit(&mut self) {
        if let Some(record) = self.mode.bound_record() {
            info!("event=edit_cancel module=form status=ok id={}", record.id);
        }
        self.reset();
    }

    /// Validate the draft and commit it to `store`.
    pub fn submit(&mut self, store: &mut RecordStore) -> FormResult<SubmitOutcome> {
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            self.validation_failed = true;
            warn!(
                "event=submit module=form status=invalid missing={}",
                join_fields(&missing)
            );
            return Err(FormError::MissingFields(missing));
        }
        self.validation_failed = false;

        let draft = std::mem::take(&mut self.draft);
        let outcome = match std::mem::take(&mut self.mode) {
            FormMode::Editing(bound) => {
                if store.contains(&bound.id) {
                    store.upsert(PatientRecord::from_fields(bound.id.clone(), draft));
                    info!("event=patient_updated module=form status=ok id={}", bound.id);
                    SubmitOutcome::Updated(bound.id)
                } else {
                    warn!(
                        "event=patient_updated module=form status=discarded id={}",
                        bound.id
                    );
                    SubmitOutcome::Discarded(bound.id)
                }
            }
            FormMode::Creating => {
                let id = generate_unique_id(store);
                store.upsert(PatientRecord::from_fields(id.clone(), draft));
                info!("event=patient_created module=form status=ok id={}", id);
                SubmitOutcome::Created(id)
            }
        };

        self.reset();
        Ok(outcome)
    }

    /// Current draft values.
    pub fn draft(&self) -> &PatientFields {
        &self.draft
    }

    /// Current value of one draft field.
    pub fn field(&self, field: PatientField) -> &str {
        self.draft.get(field)
    }

    /// Current mode.
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Check if the form is editing an existing record.
    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// Id of the record being edited.
    pub fn editing_id(&self) -> Option<&str> {
        self.mode.bound_record().map(|record| record.id.as_str())
    }

    /// Check if the last submission failed validation.
    pub fn has_validation_error(&self) -> bool {
        self.validation_failed
    }

    /// Banner text for the current validation state.
    pub fn validation_message(&self) -> Option<&'static str> {
        self.validation_failed.then_some(VALIDATION_MESSAGE)
    }

    /// Label for the submit button.
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Save changes"
        } else {
            "Add patient"
        }
    }

    fn reset(&mut self) {
        self.mode = FormMode::Creating;
        self.draft = PatientFields::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut FormController, pet: &str, symptoms: &str) {
        form.update_field(PatientField::PetName, pet);
        form.update_field(PatientField::OwnerName, "Ana");
        form.update_field(PatientField::Email, "a@x.com");
        form.update_field(PatientField::IntakeDate, "2024-01-01");
        form.update_field(PatientField::Symptoms, symptoms);
    }

    #[test]
    fn test_new_controller_is_creating() {
        let form = FormController::new();
        assert!(!form.is_editing());
        assert!(form.draft().is_blank());
        assert!(!form.has_validation_error());
        assert_eq!(form.submit_label(), "Add patient");
        assert_eq!(form.validation_message(), None);
    }

    #[test]
    fn test_submit_creates_record() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");

        let outcome = form.submit(&mut store).unwrap();

        let SubmitOutcome::Created(id) = outcome.clone() else {
            panic!("expected Created, got {:?}", outcome);
        };
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].id, id);
        assert_eq!(store.list()[0].pet_name, "Rex");
        assert!(form.draft().is_blank());
        assert!(!form.is_editing());
    }

    #[test]
    fn test_submit_with_missing_fields_fails() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "");

        let err = form.submit(&mut store).unwrap_err();

        assert_eq!(err, FormError::MissingFields(vec![PatientField::Symptoms]));
        assert_eq!(
            err.to_string(),
            "All fields are required (missing: Symptoms)"
        );
        assert!(store.is_empty());
        assert!(form.has_validation_error());
        assert_eq!(form.validation_message(), Some(VALIDATION_MESSAGE));
        // Draft is kept for correction
        assert_eq!(form.field(PatientField::PetName), "Rex");
    }

    #[test]
    fn test_valid_submit_clears_validation_error() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.submit(&mut store).unwrap_err();
        assert!(form.has_validation_error());

        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();

        assert!(!form.has_validation_error());
    }

    #[test]
    fn test_begin_edit_prefills_draft() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);

        assert!(form.is_editing());
        assert_eq!(form.editing_id(), Some(record.id.as_str()));
        assert_eq!(form.draft(), &record.fields());
        assert_eq!(form.submit_label(), "Save changes");
    }

    #[test]
    fn test_edit_submit_replaces_record() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);
        form.update_field(PatientField::Symptoms, "fever");
        let outcome = form.submit(&mut store).unwrap();

        assert_eq!(outcome, SubmitOutcome::Updated(record.id.clone()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].id, record.id);
        assert_eq!(store.list()[0].symptoms, "fever");
        assert!(!form.is_editing());
        assert!(form.draft().is_blank());
    }

    #[test]
    fn test_failed_edit_submit_stays_editing() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);
        form.update_field(PatientField::Email, "");
        form.submit(&mut store).unwrap_err();

        assert!(form.is_editing());
        assert_eq!(store.list()[0], record);
    }

    #[test]
    fn test_edit_of_removed_record_is_discarded() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);
        store.remove(&record.id);
        let outcome = form.submit(&mut store).unwrap();

        assert_eq!(outcome, SubmitOutcome::Discarded(record.id.clone()));
        assert!(store.is_empty());
        assert!(!form.is_editing());
        assert!(form.draft().is_blank());
    }

    #[test]
    fn test_begin_edit_overwrites_previous_draft() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        fill(&mut form, "Luna", "limp");
        form.submit(&mut store).unwrap();
        let rex = store.list()[0].clone();
        let luna = store.list()[1].clone();

        form.begin_edit(&rex);
        form.update_field(PatientField::Symptoms, "sneezing");
        form.begin_edit(&luna);

        assert_eq!(form.editing_id(), Some(luna.id.as_str()));
        assert_eq!(form.field(PatientField::Symptoms), "limp");
    }

    #[test]
    fn test_cancel_edit_keeps_validation_error() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);
        form.update_field(PatientField::Email, "");
        form.submit(&mut store).unwrap_err();
        form.cancel_edit();

        assert!(!form.is_editing());
        assert!(form.draft().is_blank());
        assert!(form.has_validation_error());
        assert_eq!(form.validation_message(), Some(VALIDATION_MESSAGE));

        fill(&mut form, "Luna", "limp");
        form.submit(&mut store).unwrap();
        assert!(!form.has_validation_error());
    }

    #[test]
    fn test_cancel_edit_returns_to_creating() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        fill(&mut form, "Rex", "cough");
        form.submit(&mut store).unwrap();
        let record = store.list()[0].clone();

        form.begin_edit(&record);
        form.cancel_edit();

        assert!(!form.is_editing());
        assert!(form.draft().is_blank());
        assert_eq!(store.list()[0], record);
    }
}
