//! Core error types for the mod catalog and game-version registry.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing, validating, or persisting catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A JSON or XML document violated the catalog schema.
    ///
    /// `path` names the offending property (e.g. `mod.versions[2].version`).
    #[error("schema violation at '{path}': {reason}")]
    Schema { path: String, reason: String },

    /// A cross-referential invariant does not hold (duplicate entity,
    /// dangling reference, missing download row, incomplete part set).
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The file extension is not one of the supported catalog formats.
    #[error("unsupported catalog file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The document's `fileFormatVersion` does not match this build.
    #[error("file format version mismatch: found '{found}', expected '{expected}'")]
    FormatVersionMismatch { found: String, expected: String },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Construct a schema error for the property at `path`.
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let error = CatalogError::Schema {
            path: path.into(),
            reason: reason.into(),
        };
        tracing::error!("{error}");
        error
    }
}

/// Errors produced by the compatibility resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The requested mod version or version type index does not exist.
    #[error("no such mod version selection: {0}")]
    InvalidSelection(String),

    /// No registered game version can load any of the mod's files.
    #[error("no compatible game version found for '{0}'")]
    NoCompatibleGameVersion(String),

    /// The user declined the alternative game version prompt.
    #[error("alternative game version selection cancelled")]
    UserCancelled,
}
