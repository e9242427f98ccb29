//! Compound-word detection used by [`CompoundPolicy::Strict`](crate::CompoundPolicy).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Word characters for boundary purposes: letters, digits and underscore.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that glue a compound word together ("malt-flavored", "brewer's").
fn is_compound_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '\''
}

/// Compound words that remain valid matches for a term.
///
/// Keys and values are stored lower-cased; all lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "HashMap<String, Vec<String>>",
    into = "HashMap<String, Vec<String>>"
)]
pub struct ExceptionSet {
    allowed: HashMap<String, Vec<String>>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `compounds` as matches for `term`.
    pub fn insert<I, S>(&mut self, term: &str, compounds: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.allowed.entry(term.to_lowercase()).or_default();
        for compound in compounds {
            let compound = compound.as_ref().to_lowercase();
            if !entry.contains(&compound) {
                entry.push(compound);
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<I, S>(mut self, term: &str, compounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(term, compounds);
        self
    }

    /// Whether `compound` is an allowed match for `term`.
    pub fn allows(&self, term: &str, compound: &str) -> bool {
        self.allowed
            .get(&term.to_lowercase())
            .is_some_and(|list| list.contains(&compound.to_lowercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Number of terms with at least one exception.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }
}

impl From<HashMap<String, Vec<String>>> for ExceptionSet {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        let mut set = ExceptionSet::new();
        for (term, compounds) in map {
            set.insert(&term, compounds);
        }
        set
    }
}

impl From<ExceptionSet> for HashMap<String, Vec<String>> {
    fn from(set: ExceptionSet) -> Self {
        set.allowed
    }
}

/// The contiguous run of compound characters around `text[start..end]`.
///
/// `start` and `end` must lie on char boundaries.
pub(crate) fn containing_run(text: &str, start: usize, end: usize) -> &str {
    let run_start = text[..start]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_compound_char(c))
        .last()
        .map_or(start, |(idx, _)| idx);
    let run_end = text[end..]
        .char_indices()
        .take_while(|&(_, c)| is_compound_char(c))
        .last()
        .map_or(end, |(idx, c)| end + idx + c.len_utf8());
    &text[run_start..run_end]
}

/// True when the match at `text[start..end]` is part of a longer compound
/// word that `exceptions` does not allow for `term`.
pub(crate) fn is_compound_false_positive(
    text: &str,
    start: usize,
    end: usize,
    term: &str,
    exceptions: &ExceptionSet,
) -> bool {
    let run = containing_run(text, start, end);
    if run.to_lowercase() == text[start..end].to_lowercase() {
        return false;
    }
    !exceptions.allows(term, run)
}
