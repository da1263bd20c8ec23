//! Storage-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

/// Errors originating from the file storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The state file exists but could not be read or written.
    #[error("unable to access state file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file is not a valid section document.
    #[error("malformed state file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
