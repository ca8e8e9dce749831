//! Snapshot provider errors.
//!
//! These are the only faults that abort startup or refresh instead of
//! degrading the request path.

use std::path::PathBuf;

/// Error from fetching or persisting snapshot data.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// No map server URL configured and no usable local file.
    #[error("map server link is empty and no local snapshot exists")]
    EmptySource,

    /// HTTP transport failure.
    #[error("map server request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Map server returned a non-success status.
    #[error("map server returned status {status}")]
    Api { status: u16 },

    /// Payload could not be parsed.
    #[error("invalid snapshot payload: {message}")]
    Json { message: String },

    /// Filesystem failure on the persisted files.
    #[error("snapshot file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
