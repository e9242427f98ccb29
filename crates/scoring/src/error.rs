use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to read scoring config from {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse scoring config: {0}")]
    SourceFormat(#[from] serde_json::Error),
    #[error("invalid scoring config: {0}")]
    InvalidConfig(String),
}
