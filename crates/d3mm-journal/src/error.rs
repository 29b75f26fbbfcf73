//! Errors for the installed-mod journal.

use thiserror::Error;

/// Errors that can occur when reading or writing the journal sidecar.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The sidecar is not valid JSON or violates the journal schema.
    #[error("journal schema violation at '{path}': {reason}")]
    Schema { path: String, reason: String },

    /// The sidecar's `fileType` is not the journal file type.
    #[error("unexpected journal file type '{0}'")]
    UnexpectedFileType(String),

    /// The sidecar was written by an incompatible format version.
    #[error("unsupported journal format version '{found}' (supported: '{supported}')")]
    UnsupportedFormatVersion { found: String, supported: String },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JournalError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let error = JournalError::Schema {
            path: path.into(),
            reason: reason.into(),
        };
        tracing::error!("{error}");
        error
    }
}
