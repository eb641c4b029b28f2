//! Crate error type and the per-field error shown by views

use error_stack::Report;
use serde::Serialize;
use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_MISSING_PREFIX: &str = "Missing";

/// Result type for the `escrow_patch` library
pub type Result<T> = std::result::Result<T, Report<Error>>;

/// Error categories raised while mapping, coercing, patching and sending field edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading or writing a local file failed
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// A caller passed an argument the engine cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine reached a state that indicates a programming error
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A UI path has no backend target and identity fallback is not allowed
    #[error("No backend mapping: {0}")]
    Mapping(String),

    /// Network failure, non-2xx status or a `success: false` envelope
    #[error("{message}")]
    Transport {
        /// Human readable message, taken from the backend when it sends one
        message: String,
        /// Backend error code, when the envelope carries one
        code:    Option<String>,
    },

    /// User input failed strict coercion before any request was made
    #[error("{0}")]
    Validation(String),
}

impl Error {
    /// Create a "Failed to X" error
    pub fn failed_to(action: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidState(format!("{MSG_FAILED_TO_PREFIX} {action}: {details}"))
    }

    /// Create an "Invalid X" error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create a "Missing X" error
    pub fn missing(what: &str) -> Self {
        Self::InvalidArgument(format!("{MSG_MISSING_PREFIX} {what}"))
    }

    /// Create error for a UI path the mapping table does not know
    pub fn unmapped(path: impl std::fmt::Display) -> Self {
        Self::Mapping(format!("'{path}' has no backend field"))
    }

    /// Create error for input that failed strict coercion
    pub fn validation_failed(label: &str, reason: impl std::fmt::Display) -> Self {
        Self::Validation(format!("{label} {reason}"))
    }

    /// Create error for a failed request or a rejected response
    pub fn transport(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Transport {
            message: message.into(),
            code,
        }
    }

    /// Create error for IO operations
    pub fn io_failed(
        operation: &str,
        path: &std::path::Path,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::FileOperation(format!(
            "{MSG_FAILED_TO_PREFIX} {operation} {}: {error}",
            path.display()
        ))
    }
}

/// Which part of the pipeline produced a [`FieldError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Local input problem, never sent to the backend
    Validation,
    /// Mapping table gap for the edited path
    Mapping,
    /// Remote failure; the edit buffer is kept for a retry
    Transport,
    /// Any other local failure (malformed record, bad configuration)
    Internal,
}

/// Error attached to a single field's UI state
///
/// Reports never escape the editor; they are flattened into this shape so the
/// view can render inline text next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Category used by the view to pick an affordance
    pub kind:    FieldErrorKind,
    /// Inline message shown next to the field
    pub message: String,
    /// Backend error code for transport failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code:    Option<String>,
}

impl From<&Report<Error>> for FieldError {
    fn from(report: &Report<Error>) -> Self {
        let error = report.current_context();
        let (kind, code) = match error {
            Error::Validation(_) => (FieldErrorKind::Validation, None),
            Error::Mapping(_) => (FieldErrorKind::Mapping, None),
            Error::Transport { code, .. } => (FieldErrorKind::Transport, code.clone()),
            Error::Configuration(_)
            | Error::FileOperation(_)
            | Error::InvalidArgument(_)
            | Error::InvalidState(_) => (FieldErrorKind::Internal, None),
        };
        Self {
            kind,
            message: error.to_string(),
            code,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_from_transport_report_keeps_code() {
        let report = Report::new(Error::transport(
            "Escrow not found",
            Some("NOT_FOUND".to_string()),
        ))
        .attach("PUT /escrows/42");

        let field_error = FieldError::from(&report);
        assert_eq!(field_error.kind, FieldErrorKind::Transport);
        assert_eq!(field_error.message, "Escrow not found");
        assert_eq!(field_error.code.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn test_field_error_kinds() {
        let validation = Report::new(Error::validation_failed("Brokerage Split", "must be a number"));
        assert_eq!(FieldError::from(&validation).kind, FieldErrorKind::Validation);
        assert_eq!(
            FieldError::from(&validation).message,
            "Brokerage Split must be a number"
        );

        let mapping = Report::new(Error::unmapped("foo.bar"));
        assert_eq!(FieldError::from(&mapping).kind, FieldErrorKind::Mapping);

        let internal = Report::new(Error::missing("record id"));
        assert_eq!(FieldError::from(&internal).kind, FieldErrorKind::Internal);
        assert_eq!(
            FieldError::from(&internal).message,
            "Invalid argument: Missing record id"
        );
    }
}
