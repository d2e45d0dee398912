//! Error types for the bookings library.
//!
//! This module provides the error hierarchy for all operations in the
//! library, using `thiserror` for ergonomic error handling. Every variant
//! belongs to one of three categories (see [`ErrorCategory`]): bad input,
//! a booking conflict, or a storage failure.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::forms::FormErrors;
use crate::room::RoomId;

/// Result type alias for operations that may fail with a bookings error.
///
/// # Examples
///
/// ```
/// use bookings::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bookings library.
#[derive(Debug, Error)]
pub enum Error {
    /// A single input field failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A submitted form failed one or more field checks.
    #[error("invalid form: {0}")]
    Form(FormErrors),

    /// A date range was empty or inverted.
    #[error("invalid stay {start} to {end}: {reason}")]
    InvalidStayRange {
        /// The first night of the stay.
        start: NaiveDate,
        /// The check-out date.
        end: NaiveDate,
        /// The reason the range is invalid.
        reason: String,
    },

    /// The selected room was not among the searched results.
    #[error("room {room_id} is not among the available rooms for this search")]
    InvalidSelection {
        /// The room that was selected.
        room_id: RoomId,
    },

    /// A workflow step was attempted from a state that does not allow it.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// The workflow state at the time of the call.
        state: String,
        /// The attempted action.
        action: String,
    },

    /// The room is no longer free for the requested dates.
    #[error("room {room_id} is not available: {details}")]
    Conflict {
        /// The room that could not be booked.
        room_id: RoomId,
        /// Details about the conflict.
        details: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A non-SQLite storage backend failed.
    #[error("storage error: {details}")]
    Storage {
        /// Details about the failure.
        details: String,
    },

    /// A database lock could not be acquired in time.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The caller-supplied deadline passed before the operation completed.
    #[error("operation timed out before completing")]
    Timeout,

    /// A staged session value could not be read back.
    #[error("session error: {details}")]
    Session {
        /// Details about the failure.
        details: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A JSON encoding error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// Broad classification of an [`Error`], used to decide how callers react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; report field-level detail to the caller.
    Validation,
    /// The room was taken between search and confirm; search again.
    Conflict,
    /// The store failed or could not be reached; nothing was written.
    Storage,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<crate::stay::InvalidStayRangeError> for Error {
    fn from(err: crate::stay::InvalidStayRangeError) -> Self {
        Self::InvalidStayRange {
            start: err.start,
            end: err.end,
            reason: err.reason,
        }
    }
}

impl From<crate::room::InvalidRoomIdError> for Error {
    fn from(err: crate::room::InvalidRoomIdError) -> Self {
        Self::Validation {
            field: "room_id".into(),
            message: err.to_string(),
        }
    }
}

impl Error {
    /// Classifies the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookings::{Error, ErrorCategory};
    ///
    /// let err = Error::Timeout;
    /// assert_eq!(err.category(), ErrorCategory::Storage);
    /// ```
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. }
            | Self::Form(_)
            | Self::InvalidStayRange { .. }
            | Self::InvalidSelection { .. }
            | Self::InvalidTransition { .. }
            | Self::NotFound { .. } => ErrorCategory::Validation,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Database(_)
            | Self::Storage { .. }
            | Self::LockTimeout { .. }
            | Self::Timeout
            | Self::Session { .. }
            | Self::Configuration(_)
            | Self::Json(_)
            | Self::Io(_)
            | Self::DataDirectoryNotFound { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. } => ErrorCategory::Storage,
        }
    }

    /// Check if the error is a booking conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the error is caused by bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}
