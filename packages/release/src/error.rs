//! Error types for release merging.

use thiserror::Error;

/// Errors raised while applying a fragment to a release.
///
/// Both variants are producer bugs rather than data problems: a correct
/// producer never triggers them. Callers treat them as fatal for the notice
/// being converted and move on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// The fragment violates the identity-key contract or contradicts the
    /// shape of the release at some path.
    #[error("Malformed fragment at '{path}': {reason}")]
    MalformedFragment { path: String, reason: String },

    /// A fragment entity matches more than one existing entity.
    #[error("Conflicting identity in '{collection}': {key} '{value}' matches {matches} entities")]
    Conflict {
        collection: String,
        key: String,
        value: String,
        matches: usize,
    },

    /// A release document was built from a JSON value that is not an object.
    #[error("Release document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl MergeError {
    pub(crate) fn malformed(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedFragment {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
