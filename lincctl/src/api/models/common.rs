//! Records shared by several resources.

use serde::{Deserialize, Serialize};

/// Answer from the server-side uniqueness/format validation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(alias = "isValid", alias = "is_available", alias = "available")]
    pub is_valid: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for `POST /users/validate-field`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationRequest<'a> {
    pub field: &'a str,
    pub value: &'a str,
}
