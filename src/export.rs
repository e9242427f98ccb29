//! Versioned JSON snapshots of the loaded reference data.
//!
//! Each export writes one document per [`DataKind`] into an output
//! directory, named `<kind>.v<N>.json`. Every document carries a
//! `version` of the form `N.0.0` and a UTC `generated_at` timestamp next
//! to its payload:
//!
//! | kind               | payload                                        |
//! |--------------------|------------------------------------------------|
//! | `synonyms`         | `categories`: list of `{name, synonyms}`       |
//! | `cross-reactivity` | `cross_reactivity_rules`: the rule table       |
//! | `scoring-policy`   | the scoring policy sections, loadable as-is    |
//!
//! The cross-reactivity and scoring-policy documents can be handed straight
//! back to their loaders; the header keys are ignored on read.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use crossreact::CrossReactivityRule;
use scoring::ScoringConfig;
use serde::Serialize;
use synonyms::SynonymIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export version must be at least 1")]
    InvalidVersion,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize export document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which reference data set to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Synonyms,
    CrossReactivity,
    ScoringPolicy,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [
        DataKind::Synonyms,
        DataKind::CrossReactivity,
        DataKind::ScoringPolicy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Synonyms => "synonyms",
            DataKind::CrossReactivity => "cross-reactivity",
            DataKind::ScoringPolicy => "scoring-policy",
        }
    }

    /// `<kind>.v<major>.json`
    pub fn file_name(self, major: u32) -> String {
        format!("{}.v{major}.json", self.as_str())
    }
}

/// Semantic version string written into every document of export `major`.
pub fn export_version(major: u32) -> String {
    format!("{major}.0.0")
}

#[derive(Serialize)]
struct VersionedDocument<T> {
    version: String,
    generated_at: String,
    #[serde(flatten)]
    payload: T,
}

#[derive(Serialize)]
struct SynonymsPayload<'a> {
    categories: Vec<CategoryEntry<'a>>,
}

#[derive(Serialize)]
struct CategoryEntry<'a> {
    name: &'a str,
    synonyms: &'a [String],
}

#[derive(Serialize)]
struct RulesPayload<'a> {
    cross_reactivity_rules: &'a [CrossReactivityRule],
}

/// Borrowed view of everything an export can write.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ExportSource<'a> {
    pub index: &'a SynonymIndex,
    pub rules: &'a [CrossReactivityRule],
    pub scoring: &'a ScoringConfig,
}

/// Write the `kind` document of export `major` into `dir`, creating the
/// directory if needed. Returns the path written.
pub(crate) fn write_document(
    source: ExportSource<'_>,
    kind: DataKind,
    major: u32,
    dir: &Path,
    generated_at: DateTime<Utc>,
    pretty: bool,
) -> Result<PathBuf, ExportError> {
    if major == 0 {
        return Err(ExportError::InvalidVersion);
    }
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let version = export_version(major);
    let generated_at = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let body = match kind {
        DataKind::Synonyms => render(
            VersionedDocument {
                version,
                generated_at,
                payload: SynonymsPayload {
                    categories: source
                        .index
                        .categories()
                        .map(|category| CategoryEntry {
                            name: category.name(),
                            synonyms: category.synonyms(),
                        })
                        .collect(),
                },
            },
            pretty,
        )?,
        DataKind::CrossReactivity => render(
            VersionedDocument {
                version,
                generated_at,
                payload: RulesPayload {
                    cross_reactivity_rules: source.rules,
                },
            },
            pretty,
        )?,
        DataKind::ScoringPolicy => render(
            VersionedDocument {
                version,
                generated_at,
                payload: source.scoring,
            },
            pretty,
        )?,
    };

    let path = dir.join(kind.file_name(major));
    fs::write(&path, body).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn render<T: Serialize>(document: T, pretty: bool) -> Result<String, ExportError> {
    let mut body = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    body.push('\n');
    Ok(body)
}
