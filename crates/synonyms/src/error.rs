use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a synonym vocabulary.
///
/// Loading is all-or-nothing: any of these aborts construction and no partial
/// index is ever returned.
#[derive(Debug, Error)]
pub enum SynonymError {
    /// The backing file is missing or cannot be read.
    #[error("synonym source {path} unavailable: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The backing text is not well-formed YAML.
    #[error("synonym source is malformed: {0}")]
    SourceFormat(#[from] serde_yaml::Error),
    /// The document parsed but does not have the category -> [synonym] shape.
    #[error("invalid synonym config: {0}")]
    ConfigFormat(String),
}

impl SynonymError {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        SynonymError::ConfigFormat(msg.into())
    }
}
