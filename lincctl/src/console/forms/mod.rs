//! Create/edit forms for user groups and locations.
//!
//! A form holds the operator's draft, fills in generated codes and names as parent fields change,
//! and turns into a request body once it validates. Generated values are only written while the
//! operator has not typed their own; once overridden, later parent changes leave them alone.

mod location;
mod user_group;

pub use location::LocationForm;
pub use user_group::UserGroupForm;

use crate::console::contact::{NO_EMAIL, NO_NAME};
use crate::console::validation::FieldResult;
use crate::errors::{Error, FieldError, Result};

/// Whether a form creates a new entity or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

impl<Id> FormMode<Id> {
    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }
}

/// Accumulates per-field failures so every problem is reported at once.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn check(&mut self, field: &str, result: FieldResult) {
        if let Err(message) = result {
            self.0.push(FieldError::new(field, message));
        }
    }

    pub(crate) fn into_result(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors: self.0 })
        }
    }
}

/// Trimmed optional text, dropping blanks and contact placeholders.
pub(crate) fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value == NO_NAME || value == NO_EMAIL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Like [`optional`] but keeps placeholders out of validation too.
pub(crate) fn contact_value(value: &str) -> &str {
    match value.trim() {
        NO_NAME | NO_EMAIL => "",
        other => other,
    }
}
