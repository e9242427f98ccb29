use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrossReactError {
    #[error("failed to read cross-reactivity rules from {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse cross-reactivity rules: {0}")]
    SourceFormat(#[from] serde_yaml::Error),
    #[error("invalid cross-reactivity rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },
    #[error("unknown confidence level `{0}` (expected low, medium or high)")]
    UnknownConfidence(String),
}
