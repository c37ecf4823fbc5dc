//! Error types for rules-sync

use std::path::{Path, PathBuf};

/// Result type for rules-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rules-sync operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
