use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::category::AllergenCategory;
use crate::error::SynonymError;

/// Immutable allergen vocabulary with a synonym -> category reverse index.
///
/// Categories and their synonyms iterate in load order. The reverse index is
/// keyed by the lower-cased synonym; when one synonym is listed under two
/// categories the category loaded last wins.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    categories: Vec<AllergenCategory>,
    positions: HashMap<String, usize>,
    reverse: HashMap<String, String>,
}

impl SynonymIndex {
    /// Build an index from `(category, synonyms)` pairs.
    ///
    /// Fails with [`SynonymError::ConfigFormat`] on an empty category name, a
    /// repeated category, or an empty synonym.
    pub fn from_categories<I, K, V, S>(entries: I) -> Result<Self, SynonymError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let start = Instant::now();
        let mut index = SynonymIndex::default();

        for (name, synonyms) in entries {
            let name: String = name.into();
            if name.trim().is_empty() {
                return Err(SynonymError::config("category names must not be empty"));
            }
            if index.positions.contains_key(&name) {
                return Err(SynonymError::config(format!(
                    "category '{name}' is defined more than once"
                )));
            }

            let mut terms: Vec<String> = Vec::new();
            for (position, synonym) in synonyms.into_iter().enumerate() {
                let synonym: String = synonym.into();
                if synonym.trim().is_empty() {
                    return Err(SynonymError::config(format!(
                        "category '{name}' entry {position} is an empty synonym"
                    )));
                }
                if terms.contains(&synonym) {
                    debug!(category = %name, synonym = %synonym, "duplicate_synonym_skipped");
                    continue;
                }
                terms.push(synonym);
            }

            index.insert(AllergenCategory::new(name, terms));
        }

        info!(
            categories = index.categories.len(),
            synonyms = index.reverse.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "synonym_index_built"
        );
        Ok(index)
    }

    fn insert(&mut self, category: AllergenCategory) {
        for synonym in category.synonyms() {
            let key = synonym.to_lowercase();
            if let Some(previous) = self.reverse.get(&key) {
                if previous != category.name() {
                    debug!(
                        synonym = %key,
                        previous = %previous,
                        winner = %category.name(),
                        "synonym_category_collision"
                    );
                }
            }
            self.reverse.insert(key, category.name().to_string());
        }
        self.positions
            .insert(category.name().to_string(), self.categories.len());
        self.categories.push(category);
    }

    /// Look up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&AllergenCategory> {
        self.positions.get(name).map(|&idx| &self.categories[idx])
    }

    /// All categories in load order.
    pub fn categories(&self) -> impl Iterator<Item = &AllergenCategory> {
        self.categories.iter()
    }

    /// Category names in load order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(AllergenCategory::name)
    }

    /// Synonyms registered under `category`; empty when the category is unknown.
    pub fn synonyms_of(&self, category: &str) -> &[String] {
        self.category(category)
            .map(AllergenCategory::synonyms)
            .unwrap_or(&[])
    }

    /// Case-insensitive exact lookup of the category an ingredient belongs to.
    ///
    /// This is a dictionary lookup, not a text scan: `"whey"` resolves but
    /// `"whey powder"` does not unless it is itself a synonym.
    pub fn category_of(&self, ingredient: &str) -> Option<&str> {
        self.reverse
            .get(&ingredient.to_lowercase())
            .map(String::as_str)
    }

    pub fn contains_category(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of distinct lower-cased synonyms in the reverse index.
    pub fn synonym_count(&self) -> usize {
        self.reverse.len()
    }
}
