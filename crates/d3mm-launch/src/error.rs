//! Launch-time error types.

use thiserror::Error;

/// Errors raised while preparing or running a launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// A required path or engine entry is missing or unusable
    /// (unconfigured game version, missing DOSBox, empty mods directory).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Required files are missing or hashes do not line up.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// A symlink, rename, extraction, or patch step failed. The staged
    /// state has been unwound.
    #[error("staging error: {0}")]
    Staging(String),

    /// The user declined an interactive prompt or cancelled a download.
    #[error("cancelled by user")]
    UserCancelled,

    /// The installed-mod journal could not be read or written.
    #[error(transparent)]
    Journal(#[from] d3mm_journal::JournalError),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<d3mm_core::ResolveError> for LaunchError {
    fn from(error: d3mm_core::ResolveError) -> Self {
        match error {
            d3mm_core::ResolveError::UserCancelled => LaunchError::UserCancelled,
            other => LaunchError::Configuration(other.to_string()),
        }
    }
}

impl LaunchError {
    /// Exit code for the terminal shell. Zero is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Configuration(_) => 2,
            LaunchError::Integrity(_) => 3,
            LaunchError::Staging(_) => 4,
            LaunchError::UserCancelled => 5,
            LaunchError::Journal(_) => 6,
            LaunchError::Io(_) => 7,
        }
    }
}
