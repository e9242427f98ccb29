use serde::{Deserialize, Serialize};
use synonyms::SynonymError;
use thiserror::Error;

use crate::boundary::ExceptionSet;
use crate::pattern::DEFAULT_PATTERN_CACHE_CAPACITY;

/// How matches that sit inside a larger compound word are treated.
///
/// Boundary anchoring alone already rejects a term glued to letters or digits
/// ("malt" inside "maltodextrin"). `Strict` additionally treats hyphens and
/// apostrophes as part of the surrounding word, so "malt" inside
/// "malt-flavored" is dropped unless the [`ExceptionSet`] allows it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompoundPolicy {
    #[default]
    WordBoundary,
    Strict,
}

/// Construction-time configuration for a [`Matcher`](crate::Matcher).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    #[serde(default)]
    pub compound_policy: CompoundPolicy,
    /// Compound words that stay matched under [`CompoundPolicy::Strict`].
    #[serde(default)]
    pub exceptions: ExceptionSet,
    /// Maximum number of compiled term patterns kept in memory.
    #[serde(default = "MatcherConfig::default_pattern_cache_capacity")]
    pub pattern_cache_capacity: usize,
}

impl MatcherConfig {
    pub(crate) fn default_pattern_cache_capacity() -> usize {
        DEFAULT_PATTERN_CACHE_CAPACITY
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.pattern_cache_capacity == 0 {
            return Err(MatchError::InvalidConfig(
                "pattern_cache_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            compound_policy: CompoundPolicy::default(),
            exceptions: ExceptionSet::default(),
            pattern_cache_capacity: Self::default_pattern_cache_capacity(),
        }
    }
}

/// One occurrence of a term in scanned text.
///
/// `start`/`end` are UTF-8 byte offsets, so `&text[start..end] == self.text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchOccurrence {
    /// The text as it appears in the input, original casing kept.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// All occurrences of one synonym.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SynonymHits {
    pub synonym: String,
    pub occurrences: Vec<MatchOccurrence>,
}

/// Synonyms of one category found in a text, in vocabulary order.
///
/// Only synonyms with at least one occurrence are present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryHits {
    pub category: String,
    pub synonyms: Vec<SynonymHits>,
}

impl CategoryHits {
    pub(crate) fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            synonyms: Vec::new(),
        }
    }

    /// Occurrences for `synonym` (exact vocabulary spelling).
    pub fn get(&self, synonym: &str) -> Option<&[MatchOccurrence]> {
        self.synonyms
            .iter()
            .find(|hits| hits.synonym == synonym)
            .map(|hits| hits.occurrences.as_slice())
    }

    pub fn contains(&self, synonym: &str) -> bool {
        self.get(synonym).is_some()
    }

    pub fn synonym_names(&self) -> impl Iterator<Item = &str> {
        self.synonyms.iter().map(|hits| hits.synonym.as_str())
    }

    /// Number of matched synonyms.
    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.synonyms.iter().map(|hits| hits.occurrences.len()).sum()
    }
}

/// Result of scanning a text against every category.
///
/// Only categories with at least one matched synonym are present, in
/// vocabulary order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScanReport {
    pub categories: Vec<CategoryHits>,
}

impl ScanReport {
    pub fn get(&self, category: &str) -> Option<&CategoryHits> {
        self.categories.iter().find(|hits| hits.category == category)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|hits| hits.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryHits> {
        self.categories.iter()
    }

    /// Number of matched categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn occurrence_count(&self) -> usize {
        self.categories.iter().map(CategoryHits::occurrence_count).sum()
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid matcher configuration.
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
    /// A required argument was absent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A term could not be compiled into a pattern.
    #[error("cannot compile pattern for term '{term}': {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
    /// The vocabulary failed to load.
    #[error("vocabulary error: {0}")]
    Vocabulary(#[from] SynonymError),
}
