use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("unrecognized version format: {0:?}")]
    InvalidFormat(String),

    #[error("no browser found on this host")]
    BrowserNotFound,

    #[error("no version token in command output: {0:?}")]
    NotDetected(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no driver release found for browser version {0}")]
    NotFound(String),

    #[error("release index returned an empty version for {0}")]
    EmptyResponse(String),

    #[error("release index returned status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("policy requires a full major.minor.build.patch version, got {0}")]
    FullVersionRequired(String),
}

impl ResolveError {
    /// Whether retrying the whole run may succeed without operator action.
    /// Server-side failures and rate limiting count; a missing release or a
    /// malformed response does not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
