//! Form editing models.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// What a form submission will do.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormMode {
    /// Empty form, submission appends a new record
    #[default]
    Creating,
    /// Form pre-filled from a record, submission replaces it
    Editing(PatientRecord),
}

impl FormMode {
    /// Record bound to the form, if editing.
    pub fn bound_record(&self) -> Option<&PatientRecord> {
        match self {
            FormMode::Creating => None,
            FormMode::Editing(record) => Some(record),
        }
    }

    /// Check if the form is editing an existing record.
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing(_))
    }
}

/// Result of a successful form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new record was appended under this id
    Created(String),
    /// The bound record was replaced in place
    Updated(String),
    /// The bound record had been removed before the edit was submitted
    Discarded(String),
}

impl SubmitOutcome {
    /// Id of the record the submission targeted.
    pub fn id(&self) -> &str {
        match self {
            SubmitOutcome::Created(id)
            | SubmitOutcome::Updated(id)
            | SubmitOutcome::Discarded(id) => id,
        }
    }
}
