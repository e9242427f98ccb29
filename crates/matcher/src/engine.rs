use std::sync::Arc;
use std::time::Instant;

use synonyms::{AllergenCategory, SynonymIndex};
use tracing::{debug, Level};

use crate::boundary::{is_compound_false_positive, ExceptionSet};
use crate::metrics::{metrics_recorder, ScanKind};
use crate::pattern::PatternCache;
use crate::types::{
    CategoryHits, CompoundPolicy, MatchError, MatchOccurrence, MatcherConfig, ScanReport,
    SynonymHits,
};

#[cfg(test)]
mod tests;

/// Scans ingredient text for the synonyms of a [`SynonymIndex`].
///
/// The index is immutable; the only state that changes across calls is the
/// pattern cache, which never affects results. A `Matcher` can be shared
/// between threads behind an `Arc`.
#[derive(Debug)]
pub struct Matcher {
    index: Arc<SynonymIndex>,
    patterns: PatternCache,
    policy: CompoundPolicy,
    exceptions: ExceptionSet,
}

impl Matcher {
    /// Matcher with the default configuration.
    pub fn new(index: SynonymIndex) -> Self {
        Self {
            index: Arc::new(index),
            patterns: PatternCache::default(),
            policy: CompoundPolicy::default(),
            exceptions: ExceptionSet::default(),
        }
    }

    /// Matcher with an explicit configuration.
    pub fn with_config(index: SynonymIndex, cfg: MatcherConfig) -> Result<Self, MatchError> {
        Self::with_index_arc(Arc::new(index), cfg)
    }

    /// Matcher over a shared index handle.
    pub fn with_index_arc(
        index: Arc<SynonymIndex>,
        cfg: MatcherConfig,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        let MatcherConfig {
            compound_policy,
            exceptions,
            pattern_cache_capacity,
        } = cfg;
        Ok(Self {
            index,
            patterns: PatternCache::with_capacity(pattern_cache_capacity)?,
            policy: compound_policy,
            exceptions,
        })
    }

    /// Matcher over the vocabulary bundled with the `synonyms` crate.
    pub fn builtin() -> Result<Self, MatchError> {
        Ok(Self::new(SynonymIndex::builtin()?))
    }

    pub fn index(&self) -> &SynonymIndex {
        &self.index
    }

    pub fn compound_policy(&self) -> CompoundPolicy {
        self.policy
    }

    pub fn exceptions(&self) -> &ExceptionSet {
        &self.exceptions
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Compile every synonym up front. Returns the number of terms compiled.
    ///
    /// Vocabularies larger than the cache capacity will still evict.
    pub fn warm_up(&self) -> Result<usize, MatchError> {
        let mut compiled = 0;
        for category in self.index.categories() {
            for synonym in category.synonyms() {
                self.patterns.pattern_for(synonym)?;
                compiled += 1;
            }
        }
        debug!(compiled, cached = self.patterns.len(), "pattern_cache_warmed");
        Ok(compiled)
    }

    /// All occurrences of `term` in `text`, left to right, non-overlapping.
    ///
    /// An empty text or term yields no matches.
    pub fn find(&self, text: &str, term: &str) -> Result<Vec<MatchOccurrence>, MatchError> {
        if text.is_empty() || term.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = self.patterns.pattern_for(term)?;
        let occurrences = pattern
            .find_iter(text)
            .filter(|m| match self.policy {
                CompoundPolicy::WordBoundary => true,
                CompoundPolicy::Strict => !is_compound_false_positive(
                    text,
                    m.start(),
                    m.end(),
                    term,
                    &self.exceptions,
                ),
            })
            .map(|m| MatchOccurrence {
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
            .collect();
        Ok(occurrences)
    }

    /// Synonyms of `category` present in `text`.
    ///
    /// An unknown category yields an empty result.
    pub fn scan_category(&self, text: &str, category: &str) -> Result<CategoryHits, MatchError> {
        let start = Instant::now();
        let hits = match self.index.category(category) {
            Some(category) => self.collect_category(text, category)?,
            None => CategoryHits::empty(category),
        };

        if let Some(recorder) = metrics_recorder() {
            recorder.record_scan(ScanKind::Category, start.elapsed(), hits.len());
        }
        Ok(hits)
    }

    /// Every category with at least one synonym present in `text`.
    pub fn scan_all(&self, text: &str) -> Result<ScanReport, MatchError> {
        let start = Instant::now();
        let span = tracing::span!(Level::DEBUG, "matcher.scan_all", text_len = text.len());
        let _guard = span.enter();

        let mut report = ScanReport::default();
        for category in self.index.categories() {
            let hits = self.collect_category(text, category)?;
            if !hits.is_empty() {
                report.categories.push(hits);
            }
        }

        let elapsed = start.elapsed();
        debug!(
            categories = report.len(),
            occurrences = report.occurrence_count(),
            elapsed_micros = elapsed.as_micros(),
            "scan_complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_scan(ScanKind::Full, elapsed, report.len());
        }
        Ok(report)
    }

    /// [`find`](Self::find) for callers whose text may be absent.
    pub fn try_find(
        &self,
        text: Option<&str>,
        term: &str,
    ) -> Result<Vec<MatchOccurrence>, MatchError> {
        self.find(require_text(text)?, term)
    }

    /// [`scan_category`](Self::scan_category) for callers whose text may be absent.
    pub fn try_scan_category(
        &self,
        text: Option<&str>,
        category: &str,
    ) -> Result<CategoryHits, MatchError> {
        self.scan_category(require_text(text)?, category)
    }

    /// [`scan_all`](Self::scan_all) for callers whose text may be absent.
    ///
    /// `None` is a caller error, unlike an empty string.
    pub fn try_scan_all(&self, text: Option<&str>) -> Result<ScanReport, MatchError> {
        self.scan_all(require_text(text)?)
    }

    /// Case-insensitive exact lookup of an ingredient's category.
    pub fn category_of(&self, ingredient: &str) -> Option<&str> {
        self.index.category_of(ingredient)
    }

    /// Synonyms of `category`; empty when unknown.
    pub fn synonyms_of(&self, category: &str) -> &[String] {
        self.index.synonyms_of(category)
    }

    fn collect_category(
        &self,
        text: &str,
        category: &AllergenCategory,
    ) -> Result<CategoryHits, MatchError> {
        let mut hits = CategoryHits::empty(category.name());
        for synonym in category.synonyms() {
            let occurrences = self.find(text, synonym)?;
            if !occurrences.is_empty() {
                hits.synonyms.push(SynonymHits {
                    synonym: synonym.clone(),
                    occurrences,
                });
            }
        }
        Ok(hits)
    }
}

/// `None` is a caller error, unlike an empty string.
fn require_text(text: Option<&str>) -> Result<&str, MatchError> {
    text.ok_or_else(|| MatchError::InvalidArgument("text to scan must be provided".into()))
}
