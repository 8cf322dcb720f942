use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single generation request. The only error class that
/// changes the process exit status.
#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("no API key provided")]
    NoKey,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error ({code}): {body}")]
    HttpStatus { code: u16, body: String },

    #[error("empty response from API")]
    EmptyResponse,

    #[error("invalid response from API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),
}

/// Cache or log write/delete failure. Reported, never propagated.
#[derive(Debug, Error)]
pub(crate) enum PersistError {
    #[error("Failed to create data dir {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode cache: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to write cache: {0}")]
    WriteCache(std::io::Error),

    #[error("Failed to write log: {0}")]
    WriteLog(std::io::Error),

    #[error("Failed to clear cache: {0}")]
    Clear(std::io::Error),
}

#[derive(Debug, Error)]
pub(crate) enum LogReadError {
    #[error("failed to read log: {0}")]
    Read(std::io::Error),

    #[error("no fortunes found in log")]
    Empty,
}

#[derive(Debug, Error)]
pub(crate) enum SpawnError {
    #[error("Cannot start prefetch (no executable path)")]
    NoExecutable,

    #[error("Failed to start prefetch: {0}")]
    Spawn(std::io::Error),
}
