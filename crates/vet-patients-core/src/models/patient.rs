//! Patient record models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A committed patient record.
///
/// Records are only ever replaced wholesale; an edit produces a new record
/// carrying the same `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRecord {
    /// Session-unique identifier, assigned once at creation
    pub id: String,
    /// Pet name
    pub pet_name: String,
    /// Owner/client name
    pub owner_name: String,
    /// Owner contact email
    pub email: String,
    /// Intake date as entered (e.g. "2024-01-01")
    pub intake_date: String,
    /// Presenting symptoms
    pub symptoms: String,
}

impl PatientRecord {
    /// Build a record from validated field values and an id.
    pub fn from_fields(id: impl Into<String>, fields: PatientFields) -> Self {
        Self {
            id: id.into(),
            pet_name: fields.pet_name,
            owner_name: fields.owner_name,
            email: fields.email,
            intake_date: fields.intake_date,
            symptoms: fields.symptoms,
        }
    }

    /// Copy of the editable field values (everything except `id`).
    pub fn fields(&self) -> PatientFields {
        PatientFields {
            pet_name: self.pet_name.clone(),
            owner_name: self.owner_name.clone(),
            email: self.email.clone(),
            intake_date: self.intake_date.clone(),
            symptoms: self.symptoms.clone(),
        }
    }
}

/// The five required patient fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientField {
    PetName,
    OwnerName,
    Email,
    IntakeDate,
    Symptoms,
}

impl PatientField {
    /// All fields in form order.
    pub const ALL: [PatientField; 5] = [
        PatientField::PetName,
        PatientField::OwnerName,
        PatientField::Email,
        PatientField::IntakeDate,
        PatientField::Symptoms,
    ];

    /// Stable key used by form inputs.
    pub fn key(&self) -> &'static str {
        match self {
            PatientField::PetName => "petName",
            PatientField::OwnerName => "ownerName",
            PatientField::Email => "email",
            PatientField::IntakeDate => "intakeDate",
            PatientField::Symptoms => "symptoms",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PatientField::PetName => "Pet name",
            PatientField::OwnerName => "Owner name",
            PatientField::Email => "Email",
            PatientField::IntakeDate => "Intake date",
            PatientField::Symptoms => "Symptoms",
        }
    }
}

/// Comma-separated field keys, for messages and log lines.
pub fn join_fields(fields: &[PatientField]) -> String {
    fields
        .iter()
        .map(PatientField::key)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown field key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown patient field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for PatientField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Field values of a patient without an id.
///
/// Used both as the form's working draft and as the editable part of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientFields {
    pub pet_name: String,
    pub owner_name: String,
    pub email: String,
    pub intake_date: String,
    pub symptoms: String,
}

impl PatientFields {
    /// Get a single field value.
    pub fn get(&self, field: PatientField) -> &str {
        match field {
            PatientField::PetName => &self.pet_name,
            PatientField::OwnerName => &self.owner_name,
            PatientField::Email => &self.email,
            PatientField::IntakeDate => &self.intake_date,
            PatientField::Symptoms => &self.symptoms,
        }
    }

    /// Set a single field value.
    pub fn set(&mut self, field: PatientField, value: impl Into<String>) {
        let slot = match field {
            PatientField::PetName => &mut self.pet_name,
            PatientField::OwnerName => &mut self.owner_name,
            PatientField::Email => &mut self.email,
            PatientField::IntakeDate => &mut self.intake_date,
            PatientField::Symptoms => &mut self.symptoms,
        };
        *slot = value.into();
    }

    /// Fields that are empty, in form order.
    ///
    /// Only the empty string counts as missing; whitespace is kept as typed.
    pub fn missing_fields(&self) -> Vec<PatientField> {
        PatientField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Check if every field is empty.
    pub fn is_blank(&self) -> bool {
        PatientField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rex() -> PatientFields {
        PatientFields {
            pet_name: "Rex".into(),
            owner_name: "Ana".into(),
            email: "a@x.com".into(),
            intake_date: "2024-01-01".into(),
            symptoms: "cough".into(),
        }
    }

    #[test]
    fn test_record_from_fields() {
        let record = PatientRecord::from_fields("abc", rex());
        assert_eq!(record.id, "abc");
        assert_eq!(record.pet_name, "Rex");
        assert_eq!(record.symptoms, "cough");
        assert_eq!(record.fields(), rex());
    }

    #[test]
    fn test_missing_fields_in_form_order() {
        let mut fields = rex();
        fields.symptoms.clear();
        fields.owner_name.clear();

        assert_eq!(
            fields.missing_fields(),
            vec![PatientField::OwnerName, PatientField::Symptoms]
        );
        assert_eq!(PatientField::Symptoms.label(), "Symptoms");
        assert!(!fields.is_blank());
    }

    #[test]
    fn test_whitespace_is_not_missing() {
        let mut fields = rex();
        fields.email = " ".into();
        assert!(fields.missing_fields().is_empty());
    }

    #[test]
    fn test_default_is_blank() {
        let fields = PatientFields::default();
        assert!(fields.is_blank());
        assert_eq!(fields.missing_fields().len(), 5);
    }

    #[test]
    fn test_set_and_get() {
        let mut fields = PatientFields::default();
        fields.set(PatientField::IntakeDate, "2024-02-03");
        assert_eq!(fields.get(PatientField::IntakeDate), "2024-02-03");
        assert_eq!(fields.intake_date, "2024-02-03");
    }

    #[test]
    fn test_field_key_parse() {
        for field in PatientField::ALL {
            assert_eq!(field.key().parse::<PatientField>().unwrap(), field);
        }
        assert_eq!(
            "species".parse::<PatientField>(),
            Err(UnknownField("species".into()))
        );
    }
}
