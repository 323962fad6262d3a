use thiserror::Error;

use crate::host::error::CommandError;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no downloadable archive at {url} (HTTP 404)")]
    ArchiveMissing { url: String },

    #[error("unexpected status {status} downloading {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("no {binary} entry found in archive {archive}")]
    EntryMissing { archive: String, binary: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{command} exited with status {status:?}: {stderr}")]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

impl InstallError {
    /// Whether retrying the whole run may succeed without operator action.
    /// Server-side failures and rate limiting count; a missing archive or a
    /// failed host command does not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
