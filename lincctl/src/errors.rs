use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error as ThisError;

/// Business-rule codes embedded in server messages, e.g. `V06003: username not unique`.
static RULE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Z]\d{5})\s*[:\-]\s*(.+)$").expect("RULE_CODE: invalid regex pattern"));

#[derive(ThisError, Debug)]
pub enum Error {
    /// No token, or the server rejected it
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Token is valid but lacks permission for the operation
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// One or more fields failed validation, either locally or on the server
    #[error("Validation failed: {}", FieldErrors(errors))]
    Validation { errors: Vec<FieldError> },

    /// Duplicate code, username or email
    #[error("Conflict: {message}")]
    Conflict { message: String, code: Option<String> },

    /// Any other non-success response
    #[error("API error {status}: {detail}")]
    Api { status: StatusCode, detail: String },

    /// Connection, timeout or body decoding failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Every sequence number under the prefix is already taken
    #[error("No free code left for prefix {prefix} (maximum sequence {max})")]
    CodeSpaceExhausted { prefix: String, max: u32 },

    /// Known gap in the console
    #[error("{feature} is not implemented yet")]
    NotImplemented { feature: String },

    /// Generic internal error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// FastAPI-style error body: `{"detail": ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<DetailItem>),
    Coded {
        code: Option<String>,
        #[serde(alias = "msg")]
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl DetailItem {
    fn field(&self) -> String {
        match self.loc.last() {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "request".to_string(),
        }
    }
}

fn is_duplicate_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("already exists") || lower.contains("not unique") || lower.contains("duplicate") || lower.contains("already taken")
}

impl Error {
    /// Build an error from a non-success API response.
    ///
    /// The message is taken from `detail` when the body has that shape, otherwise the raw body,
    /// otherwise the status reason.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.detail) {
            Some(Detail::Fields(items)) => return Self::from_field_details(&items),
            Some(Detail::Message(message)) => match RULE_CODE.captures(&message) {
                Some(caps) => (Some(caps[1].to_string()), caps[2].trim().to_string()),
                None => (None, message),
            },
            Some(Detail::Coded { code, message }) => (code, message),
            None if !body.trim().is_empty() => (None, body.trim().to_string()),
            None => (None, status.canonical_reason().unwrap_or("Unknown error").to_string()),
        };

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthenticated { message: Some(message) },
            StatusCode::FORBIDDEN => Error::Forbidden { message },
            StatusCode::NOT_FOUND => Error::NotFound {
                resource: "Resource".to_string(),
                id: message,
            },
            StatusCode::CONFLICT => Error::Conflict { message, code },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                if is_duplicate_message(&message) {
                    Error::Conflict { message, code }
                } else {
                    Error::BadRequest {
                        message: match code {
                            Some(code) => format!("{code}: {message}"),
                            None => message,
                        },
                    }
                }
            }
            _ => Error::Api { status, detail: message },
        }
    }

    /// A list of per-field problems; any duplicate among them makes the whole error a conflict.
    fn from_field_details(items: &[DetailItem]) -> Self {
        let errors: Vec<FieldError> = items.iter().map(|item| FieldError::new(item.field(), item.msg.clone())).collect();
        let duplicate = errors.iter().find(|e| is_duplicate_message(&e.message)).map(ToString::to_string);
        match duplicate {
            Some(message) => Error::Conflict { message, code: None },
            None => Error::Validation { errors },
        }
    }

    /// Name the resource a 404 refers to, keeping any other error unchanged.
    pub fn for_resource(self, resource: &str, id: impl fmt::Display) -> Self {
        match self {
            Error::NotFound { .. } => Error::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            },
            other => other,
        }
    }

    /// Whether the server (or local scan) rejected a value because it is already in use.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Error::Conflict { .. } => true,
            Error::Validation { errors } => errors.iter().any(|e| is_duplicate_message(&e.message)),
            _ => false,
        }
    }

    /// Returns the message shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::Forbidden { message } => format!("You do not have permission to do this: {message}"),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Validation { errors } => {
                let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
                format!("Please correct the following: {}", lines.join("; "))
            }
            Error::Conflict { message, code } => match code {
                Some(code) => format!("{message} ({code}). Choose a different value and try again."),
                None => format!("{message}. Choose a different value and try again."),
            },
            Error::Api { detail, .. } => detail.clone(),
            Error::Transport(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Error::Transport(_) => "Could not reach the server".to_string(),
            Error::CodeSpaceExhausted { prefix, max } => {
                format!("All codes under {prefix} up to {max} are in use. Enter a code manually.")
            }
            Error::NotImplemented { feature } => format!("{feature} is not available yet"),
            Error::Internal { .. } | Error::Other(_) => "Internal error".to_string(),
        }
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for console operation results
pub type Result<T> = std::result::Result<T, Error>;
