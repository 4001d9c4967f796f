//! Error types for the converter.
//!
//! `ConverterError` wraps the merge engine's `MergeError` so a failed notice
//! carries the engine's reason unchanged.

use std::path::PathBuf;

use thiserror::Error;

use ted_ocds_release::MergeError;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Input path is missing, unreadable, or holds no notices.
    #[error("Invalid input '{}': {reason}", .path.display())]
    Input { path: PathBuf, reason: String },

    /// Root element not recognized as a notice type.
    #[error("Unrecognized notice root <{root}> in {file}")]
    Classification { file: String, root: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// A fragment could not be merged into the release.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A producer found its business term but could not interpret it.
    #[error("Producer {term} failed: {reason}")]
    Producer { term: String, reason: String },

    /// Invalid OCID prefix.
    #[error("Invalid OCID prefix: '{0}'. Expected ocds-XXXXXX (e.g., ocds-0c46vo)")]
    InvalidOcidPrefix(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more notices failed to convert.
    #[error("{failed} of {total} notices failed to convert")]
    ConversionFailed { failed: usize, total: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConverterError {
    pub(crate) fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn producer(term: &str, reason: impl Into<String>) -> Self {
        Self::Producer {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
