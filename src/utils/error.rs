use crate::domain::model::ListingFailure;
use std::num::ParseIntError;
use thiserror::Error;

/// A single listing field whose text could not be turned into a typed value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("invalid bedroom count '{text}': {source}")]
    InvalidBedroomCount {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid sale price '{text}': {source}")]
    InvalidPrice {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid sale date '{text}': {source}")]
    InvalidDate {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read input '{path}': {source}")]
    InputReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Extraction task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Listing extraction failed: {0}")]
    Extraction(#[from] ListingFailure),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Extraction,
    Configuration,
    Serialization,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) | EtlError::InputReadError { .. } | EtlError::ZipError(_) => {
                ErrorCategory::Io
            }
            EtlError::Extraction(_) => ErrorCategory::Extraction,
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Serialization
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::TaskError(_) | EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Extraction => ErrorSeverity::High,
            ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InputReadError { .. } => {
                "Check that every input page exists under the input directory"
            }
            EtlError::IoError(_) | EtlError::ZipError(_) => {
                "Check that the output directory is writable and has free space"
            }
            EtlError::Extraction(_) => {
                "Re-run without --strict to skip malformed listings and get a failure report"
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Inspect the extracted listings for unexpected characters"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration value named in the message and try again"
            }
            EtlError::TaskError(_) | EtlError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputReadError { path, .. } => format!("Could not read input page '{}'", path),
            EtlError::Extraction(failure) => format!(
                "Listing {} on page '{}' could not be parsed: {}",
                failure.card_index, failure.page, failure.error
            ),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration '{}' is invalid: {}", field, reason)
            }
            EtlError::MissingConfigError { field } => {
                format!("Configuration '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
