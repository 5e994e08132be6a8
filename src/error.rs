//! Error types for catalog resolution, layout persistence and the board session.

use crate::Scope;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a block registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry could not be queried (transport or authorization failure).
    #[error("Registry query failed for scope {scope}: {message}")]
    Unavailable {
        /// Scope whose modules were being listed.
        scope: Scope,
        /// Description of the failure.
        message: String,
    },

    /// The registry manifest could not be read from disk.
    #[error("Failed to read registry manifest: {path}")]
    ManifestRead {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The registry manifest is not valid JSON for the expected schema.
    #[error("Invalid registry manifest at {path}")]
    ManifestParse {
        /// Path to the manifest.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by a layout store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Stored layouts could not be read.
    #[error("Failed to read layouts for scope {scope}")]
    Read {
        /// Scope being read.
        scope: Scope,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A layout could not be written.
    #[error("Failed to write layout for scope {scope}")]
    Write {
        /// Scope being written.
        scope: Scope,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A stored record is not a valid layout.
    #[error("Corrupt layout record for scope {scope} at line {line}")]
    Corrupt {
        /// Scope whose log contains the record.
        scope: Scope,
        /// One-based line of the record.
        line: usize,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused or could not serve the request.
    #[error("Layout store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Errors surfaced by a board session.
///
/// `RegistryQueryFailure` and `StoreReadFailure` are fatal to initialization.
/// `StoreWriteFailure` is recoverable: the session keeps its previous view of
/// the stored layout so the same candidate can be retried as a real write.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The block catalog could not be resolved.
    #[error("Block catalog could not be resolved")]
    RegistryQueryFailure(#[source] RegistryError),

    /// The initial layout load failed.
    #[error("Stored layouts could not be loaded")]
    StoreReadFailure(#[source] StoreError),

    /// A layout write failed.
    #[error("Layout could not be saved")]
    StoreWriteFailure(#[source] StoreError),

    /// The board has not finished loading.
    #[error("Board is still loading")]
    NotReady,
}

impl BoardError {
    /// Returns `true` if this error ends the board's initialization.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BoardError::RegistryQueryFailure(_) | BoardError::StoreReadFailure(_)
        )
    }
}

/// Result type alias for board session operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_registry_unavailable() {
        let err = RegistryError::Unavailable {
            scope: Scope::new("space-1"),
            message: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("space-1"), "should include the scope");
        assert!(msg.contains("connection refused"), "should include the cause");
    }

    #[test]
    fn display_corrupt_record_includes_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::Corrupt {
            scope: Scope::new("space-1"),
            line: 3,
            source,
        };
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn write_failure_chains_store_error() {
        let err = BoardError::StoreWriteFailure(StoreError::Unavailable {
            message: "disk full".to_string(),
        });
        let source = std::error::Error::source(&err);
        assert!(source.is_some(), "StoreWriteFailure should chain its source");
        assert!(source.unwrap().to_string().contains("disk full"));
    }

    #[test]
    fn fatal_classification() {
        let registry = BoardError::RegistryQueryFailure(RegistryError::Unavailable {
            scope: Scope::new("s"),
            message: "down".to_string(),
        });
        let read = BoardError::StoreReadFailure(StoreError::Unavailable {
            message: "down".to_string(),
        });
        let write = BoardError::StoreWriteFailure(StoreError::Unavailable {
            message: "down".to_string(),
        });
        assert!(registry.is_fatal());
        assert!(read.is_fatal());
        assert!(!write.is_fatal());
        assert!(!BoardError::NotReady.is_fatal());
    }
}
