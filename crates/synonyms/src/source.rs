//! Loading a [`SynonymIndex`] from YAML.
//!
//! The expected document is a mapping from category name to a list of
//! synonym strings:
//!
//! ```yaml
//! dairy:
//!   - milk
//!   - whey
//! gluten:
//!   - wheat
//!   - brewer's yeast
//! ```
//!
//! Failures are split by cause: the file could not be read
//! ([`SynonymError::SourceUnavailable`]), it is not YAML
//! ([`SynonymError::SourceFormat`]), or it is YAML of the wrong shape
//! ([`SynonymError::ConfigFormat`]).

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::SynonymError;
use crate::index::SynonymIndex;

const BUILTIN_SYNONYMS: &str = include_str!("../data/ingredient_synonyms.yaml");

impl SynonymIndex {
    /// Load from a YAML file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SynonymError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| SynonymError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SynonymError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Validate an already-parsed document.
    pub fn from_value(value: Value) -> Result<Self, SynonymError> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                return Err(SynonymError::config(
                    "synonym document is empty; expected a mapping of category to synonym list",
                ))
            }
            other => {
                return Err(SynonymError::config(format!(
                    "expected a mapping of category to synonym list, found {}",
                    value_kind(&other)
                )))
            }
        };

        let mut entries: Vec<(String, Vec<String>)> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(SynonymError::config(format!(
                        "category names must be strings, found {}",
                        value_kind(&other)
                    )))
                }
            };
            let synonyms = synonym_list(&name, value)?;
            entries.push((name, synonyms));
        }

        Self::from_categories(entries)
    }

    /// The vocabulary bundled with this crate.
    pub fn builtin() -> Result<Self, SynonymError> {
        Self::from_yaml_str(BUILTIN_SYNONYMS)
    }
}

fn synonym_list(category: &str, value: Value) -> Result<Vec<String>, SynonymError> {
    let items = match value {
        Value::Sequence(items) => items,
        other => {
            return Err(SynonymError::config(format!(
                "category '{category}' must map to a list of strings, found {}",
                value_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::String(text) => Ok(text),
            other => Err(SynonymError::config(format!(
                "category '{category}' entry {position} must be a string, found {}",
                value_kind(&other)
            ))),
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn builtin_vocabulary_loads() {
        let index = SynonymIndex::builtin().expect("bundled vocabulary is valid");
        for category in ["dairy", "gluten", "soy", "eggs"] {
            assert!(index.contains_category(category), "missing {category}");
        }
        assert!(index.synonyms_of("dairy").len() > 10);
        assert_eq!(index.category_of("whey"), Some("dairy"));
        assert_eq!(index.category_of("lecithin"), Some("soy"));
        assert_eq!(index.category_of("semolina"), Some("gluten"));
        assert_eq!(index.category_of("brewer's yeast"), Some("gluten"));
    }

    #[test]
    fn load_from_file() {
        let yaml = "dairy:\n  - milk\n  - whey\nsoy:\n  - tofu\n";
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(yaml.as_bytes()).expect("write yaml");

        let index = SynonymIndex::from_path(file.path()).expect("valid file");
        assert_eq!(index.len(), 2);
        assert_eq!(index.category_of("tofu"), Some("soy"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = SynonymIndex::from_path(dir.path().join("absent.yaml"))
            .expect_err("missing file must fail");
        match err {
            SynonymError::SourceUnavailable { path, .. } => {
                assert!(path.ends_with("absent.yaml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_yaml_is_source_format() {
        let err = SynonymIndex::from_yaml_str("dairy: [milk, whey\nsoy: tofu")
            .expect_err("broken yaml must fail");
        assert!(matches!(err, SynonymError::SourceFormat(_)));
    }

    #[test]
    fn empty_document_is_config_format() {
        let err = SynonymIndex::from_yaml_str("~\n").expect_err("null document must fail");
        assert!(matches!(err, SynonymError::ConfigFormat(_)));
    }

    #[test]
    fn top_level_list_is_config_format() {
        let err = SynonymIndex::from_yaml_str("- milk\n- whey\n").expect_err("list must fail");
        match err {
            SynonymError::ConfigFormat(msg) => assert!(msg.contains("a list")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalar_category_value_names_category() {
        let err = SynonymIndex::from_yaml_str("dairy:\n  - milk\nsoy: tofu\n")
            .expect_err("scalar value must fail");
        match err {
            SynonymError::ConfigFormat(msg) => assert!(msg.contains("'soy'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_string_entry_names_category() {
        let err = SynonymIndex::from_yaml_str("sulfites:\n  - sulfite\n  - 220\n")
            .expect_err("numeric entry must fail");
        match err {
            SynonymError::ConfigFormat(msg) => {
                assert!(msg.contains("'sulfites'"));
                assert!(msg.contains("entry 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn yaml_order_is_preserved() {
        let yaml = "soy:\n  - tofu\ndairy:\n  - milk\neggs:\n  - egg\n";
        let index = SynonymIndex::from_yaml_str(yaml).expect("valid yaml");
        let names: Vec<&str> = index.category_names().collect();
        assert_eq!(names, vec!["soy", "dairy", "eggs"]);
    }
}
