//! Error types for eyecare.
//!
//! This module defines the error type shared by the session, the record
//! lists, configuration loading and the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for eyecare operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    /// An operation needed the surgery record before one was entered.
    #[error("no surgery recorded yet; enter your surgery details first")]
    SurgeryNotRecorded,

    /// A surgery record already exists for this session.
    #[error("surgery already recorded for this session ({surgery_type} on {date})")]
    SurgeryAlreadyRecorded {
        /// Type of the existing surgery.
        surgery_type: String,
        /// Date of the existing surgery.
        date: chrono::NaiveDate,
    },

    /// A record with the given id does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Which list was searched.
        kind: &'static str,
        /// The id that was requested.
        id: u64,
    },

    // === Input Errors ===
    /// A required form field was empty or out of range.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the constraint that failed.
        message: String,
    },

    /// A surgery type name could not be parsed.
    #[error("unknown surgery type '{0}' (expected LASIK, Cataract, PRK or ICL)")]
    UnknownSurgeryType(String),

    /// A symptom kind could not be parsed.
    #[error("unknown symptom '{0}' (expected pain, dryness, blurriness or redness)")]
    UnknownSymptom(String),

    /// A session command line could not be parsed.
    #[error("{0}")]
    Usage(String),

    /// A path did not name any view.
    #[error("no view at path '{0}'")]
    UnknownView(String),

    /// A selected document exceeds the configured size limit.
    #[error("document {path} is {size} bytes, over the {limit} byte limit")]
    DocumentTooLarge {
        /// Path of the selected file.
        path: PathBuf,
        /// Size of the file.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// Reading a selected document failed.
    #[error("failed to read document {path}: {source}")]
    DocumentRead {
        /// Path of the selected file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering a view into a buffer failed.
    #[error("failed to render output")]
    Format(#[from] std::fmt::Error),
}

/// A specialized Result type for eyecare operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid input error for a form field.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Create a not-found error for a record list.
    #[must_use]
    pub fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Check if this error means a record id was not found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by rejected user input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::UnknownSurgeryType(_)
                | Self::UnknownSymptom(_)
                | Self::UnknownView(_)
                | Self::Usage(_)
                | Self::DocumentTooLarge { .. }
        )
    }
}
