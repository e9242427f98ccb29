//! Term patterns and the bounded cache that holds them.
//!
//! A term is matched literally and case-insensitively. Only its two outer
//! edges are anchored: an edge that is a word character must sit on a word
//! boundary (`\b`), an edge that is punctuation must not touch a word
//! character either (`\B`). Spaces, hyphens and apostrophes inside a term are
//! plain literals, so "half-and-half" only ever matches as a whole.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use regex::{Regex, RegexBuilder};

use crate::boundary::is_word_char;
use crate::types::MatchError;

pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 256;

/// Compile the boundary-anchored pattern for `term`.
pub fn build_pattern(term: &str) -> Result<Regex, MatchError> {
    let (Some(first), Some(last)) = (term.chars().next(), term.chars().next_back()) else {
        return Err(MatchError::InvalidArgument(
            "cannot build a pattern for an empty term".into(),
        ));
    };

    let pattern = format!(
        "{}{}{}",
        edge_anchor(first),
        regex::escape(term),
        edge_anchor(last)
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| MatchError::Pattern {
            term: term.to_string(),
            source,
        })
}

fn edge_anchor(edge: char) -> &'static str {
    if is_word_char(edge) {
        r"\b"
    } else {
        r"\B"
    }
}

/// Least-recently-used cache of compiled term patterns.
///
/// Safe to share between threads: entries live behind a mutex that is held
/// only for lookups and inserts, never while compiling. Two threads missing
/// on the same term may both compile it; the later insert wins and both
/// patterns are identical.
pub struct PatternCache {
    entries: Mutex<LruCache<String, Arc<Regex>>>,
}

impl PatternCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Like [`new`](Self::new), rejecting a zero capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self, MatchError> {
        NonZeroUsize::new(capacity).map(Self::new).ok_or_else(|| {
            MatchError::InvalidConfig("pattern_cache_capacity must be greater than zero".into())
        })
    }

    /// Pattern for `term`, compiled on first use.
    pub fn pattern_for(&self, term: &str) -> Result<Arc<Regex>, MatchError> {
        if let Some(hit) = self.lock().get(term).cloned() {
            return Ok(hit);
        }

        let compiled = Arc::new(build_pattern(term)?);
        self.lock().put(term.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.lock().contains(term)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<Regex>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_PATTERN_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
