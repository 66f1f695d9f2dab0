//! Error types and handling
//!
//! Every way a submitted report can be rejected is a [`ReportError`]. All of
//! them are terminal: a malformed document stays malformed, so callers should
//! never retry. [`ErrorResponse`] is the serializable body collaborators hand
//! back to whoever submitted the report.

use serde::Serialize;
use thiserror::Error;

/// Report parsing error types
#[derive(Debug, Error)]
pub enum ReportError {
    /// The document is not well-formed YAML
    #[error("failed to parse YAML: {0}")]
    Decode(#[from] serde_norway::Error),

    /// A required path is absent or has the wrong shape
    #[error("failed to get '{0}' from YAML")]
    MissingField(&'static str),

    /// `host` or `environment` contains characters outside its whitelist
    #[error("the submitted '{0}' field failed our security check")]
    SecurityValidation(&'static str),

    /// A closed-set field holds an unrecognised value
    #[error("unexpected '{field}' - {value}")]
    InvalidEnum { field: &'static str, value: String },
}

impl ReportError {
    /// Stable identifier for programmatic handling
    pub fn error_type(&self) -> &'static str {
        match self {
            ReportError::Decode(_) => "decode_error",
            ReportError::MissingField(_) => "missing_field",
            ReportError::SecurityValidation(_) => "security_validation",
            ReportError::InvalidEnum { .. } => "invalid_enum",
        }
    }

    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ReportError::Decode(_) => None,
            ReportError::MissingField(field)
            | ReportError::SecurityValidation(field)
            | ReportError::InvalidEnum { field, .. } => Some(*field),
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Error code for programmatic handling (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            code: None,
        }
    }

    /// Add details to the error response
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add an error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<&ReportError> for ErrorResponse {
    fn from(err: &ReportError) -> Self {
        let response = ErrorResponse::new("invalid_report", err.to_string()).with_code(err.error_type());

        match err {
            ReportError::InvalidEnum { field, value } => {
                response.with_details(serde_json::json!({ "field": field, "value": value }))
            }
            _ => match err.field() {
                Some(field) => response.with_details(serde_json::json!({ "field": field })),
                None => response,
            },
        }
    }
}

/// Result type alias for report parsing
pub type ReportResult<T> = Result<T, ReportError>;
