//! View-layer error types.

use std::path::PathBuf;

use stratus_types::{CoreError, Frequency};
use thiserror::Error;

/// Broad class of a [`ViewError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The view graph was configured inconsistently.
    Configuration,
    /// A store disagrees with the calendar derived for it.
    Consistency,
    /// A collaborator (lookup, attributes, windows) failed.
    Store,
}

/// Errors raised while building or reading a view graph.
///
/// Every construction error is fatal: no half-built graph is ever returned.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Children of a combinator disagree on frequency.
    #[error("Frequency mismatch: expected {expected}, got {found}")]
    FrequencyMismatch {
        /// Frequency of the first child.
        expected: Frequency,
        /// Offending frequency.
        found: Frequency,
    },

    /// Two children expose the same variable name.
    #[error("Duplicated variable: {0}. Use rename_prefix to avoid this issue.")]
    DuplicateVariable(String),

    /// Index past the end of the calendar.
    #[error("Index {index} out of range for view of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Calendar length.
        len: usize,
    },

    /// A dataset name was expected but a store path was given.
    #[error("Expected dataset name, got {0}")]
    ResolvedPath(String),

    /// The resolved store is not flagged as an observation store.
    #[error("Expected observations dataset, got {}", .0.display())]
    NotObservations(PathBuf),

    /// A combinator was given no children.
    #[error("Cannot combine an empty list of views")]
    EmptyMultiple,

    /// Configuration mapping has the wrong shape or unknown keys.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Store window count disagrees with the derived calendar.
    #[error(
        "Dates are not consistent with the number of items in the dataset. \
         The dataset contains {windows} time windows. This is not compatible with the \
         {dates} requested dates with frequency={frequency} ({first} .. {last})"
    )]
    WindowCountMismatch {
        /// Windows reported by the store.
        windows: usize,
        /// Entries in the derived calendar.
        dates: usize,
        /// Configured frequency.
        frequency: Frequency,
        /// First calendar entry ("-" if empty).
        first: String,
        /// Last calendar entry ("-" if empty).
        last: String,
    },

    /// Store window length or step disagrees with the frequency.
    #[error("Expected windows of {frequency}, store has len_hrs={len_hrs}, step_hrs={step_hrs}")]
    WindowShapeMismatch {
        /// Configured frequency.
        frequency: Frequency,
        /// Window length reported by the store.
        len_hrs: u32,
        /// Window step reported by the store.
        step_hrs: u32,
    },

    /// No store exists for the dataset name.
    #[error("Store not found for {name} at {}", .path.display())]
    StoreNotFound {
        /// Dataset name.
        name: String,
        /// Path that was probed.
        path: PathBuf,
    },

    /// Failure inside a store collaborator.
    #[error("Store error: {0}")]
    Store(String),

    /// Time parsing or span error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewError {
    /// Creates an `InvalidConfig` error with a message.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ViewError::InvalidConfig(msg.into())
    }

    /// Creates a `Store` error with a message.
    #[must_use]
    pub fn store(msg: impl Into<String>) -> Self {
        ViewError::Store(msg.into())
    }

    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewError::FrequencyMismatch { .. }
            | ViewError::DuplicateVariable(_)
            | ViewError::IndexOutOfRange { .. }
            | ViewError::ResolvedPath(_)
            | ViewError::NotObservations(_)
            | ViewError::EmptyMultiple
            | ViewError::InvalidConfig(_)
            | ViewError::Core(_) => ErrorKind::Configuration,
            ViewError::WindowCountMismatch { .. } | ViewError::WindowShapeMismatch { .. } => {
                ErrorKind::Consistency
            }
            ViewError::StoreNotFound { .. }
            | ViewError::Store(_)
            | ViewError::Io(_)
            | ViewError::Json(_) => ErrorKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_variable_suggests_rename_prefix() {
        let err = ViewError::DuplicateVariable("t2m".to_string());
        assert_eq!(
            err.to_string(),
            "Duplicated variable: t2m. Use rename_prefix to avoid this issue."
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_frequency_mismatch_names_both() {
        let err = ViewError::FrequencyMismatch {
            expected: Frequency::from_hours(6).unwrap(),
            found: Frequency::from_hours(3).unwrap(),
        };
        assert_eq!(err.to_string(), "Frequency mismatch: expected 6h, got 3h");
    }

    #[test]
    fn test_error_kinds() {
        let shape = ViewError::WindowShapeMismatch {
            frequency: Frequency::from_hours(6).unwrap(),
            len_hrs: 3,
            step_hrs: 6,
        };
        assert_eq!(shape.kind(), ErrorKind::Consistency);

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ViewError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Store);
    }
}
