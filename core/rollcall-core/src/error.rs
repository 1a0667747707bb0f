//! Error types for rollcall-core operations.
//! Keep ScheduleFfiError minimal and stable to avoid breaking FFI clients.

use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// FFI-Compatible Error (for Swift/Kotlin)
// ═══════════════════════════════════════════════════════════════════════════════

/// FFI-safe error type for use across language boundaries.
///
/// Screens display `message` directly, so its text is part of the contract.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ScheduleFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<String> for ScheduleFfiError {
    fn from(message: String) -> Self {
        ScheduleFfiError::General { message }
    }
}

impl From<&str> for ScheduleFfiError {
    fn from(message: &str) -> Self {
        ScheduleFfiError::General {
            message: message.to_string(),
        }
    }
}

impl From<ScheduleError> for ScheduleFfiError {
    fn from(err: ScheduleError) -> Self {
        ScheduleFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur while turning a backend response into sessions.
///
/// `EmptyBody`, `UnparseableJson`, `UnknownShape` and `Rejected` are fatal to
/// a fetch. `MalformedRecord` never leaves the expander: the offending entry
/// is skipped and the rest of the payload is still expanded.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    // ─────────────────────────────────────────────────────────────────────
    // Response Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("{message} (status {status})")]
    EmptyBody { status: u16, message: String },

    #[error("Could not parse JSON from server: {details}")]
    UnparseableJson { details: String },

    #[error("{message}")]
    UnknownShape { message: String },

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed record: {context}: {reason}")]
    MalformedRecord { context: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────
    // Query Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid calendar date: {value}")]
    InvalidDate { value: String },

    #[error("Invalid local timestamp: {value}")]
    InvalidTimestamp { value: String },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScheduleError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ScheduleError::MalformedRecord {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error aborts the whole fetch rather than a single record.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScheduleError::MalformedRecord { .. })
    }
}

/// Convenience type alias for Results using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

// Conversion for string error compatibility
impl From<ScheduleError> for String {
    fn from(err: ScheduleError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shape_displays_backend_message_verbatim() {
        let err = ScheduleError::UnknownShape {
            message: "No class found for student: 3".to_string(),
        };
        assert_eq!(err.to_string(), "No class found for student: 3");
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_record_is_not_fatal() {
        let err = ScheduleError::malformed("template 7", "missing id");
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Malformed record: template 7: missing id");
    }

    #[test]
    fn ffi_error_carries_display_text() {
        let err = ScheduleError::EmptyBody {
            status: 204,
            message: "Failed to load schedule: server returned an empty body".to_string(),
        };
        let ffi: ScheduleFfiError = err.into();
        assert_eq!(
            ffi.to_string(),
            "Failed to load schedule: server returned an empty body (status 204)"
        );
    }
}
