//! Domain models for the patient tracker.

mod form;
mod patient;

pub use form::*;
pub use patient::*;
