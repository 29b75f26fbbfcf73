//! Errors for engine configuration documents.

use thiserror::Error;

/// Errors produced while parsing or editing a game configuration file.
#[derive(Debug, Error)]
pub enum GameConfigError {
    /// The document text violates the configuration grammar.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A structural rule does not hold (duplicate section, duplicate
    /// entry name, missing section for an edit).
    #[error("configuration integrity violation: {0}")]
    Integrity(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameConfigError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        let error = GameConfigError::Parse {
            line,
            reason: reason.into(),
        };
        tracing::error!("{error}");
        error
    }
}
