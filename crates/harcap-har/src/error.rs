//! Error types for the harcap-har crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing the archive file.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Creating the destination directory or writing the file failed.
    #[error("failed to write archive to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the HAR document failed.
    #[error("failed to serialize HAR document: {0}")]
    Serialize(#[from] serde_json::Error),
}
