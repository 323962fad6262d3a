use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("invalid search path entry: {0}")]
    Path(#[from] std::env::JoinPathsError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
