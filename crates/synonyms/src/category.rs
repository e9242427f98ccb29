use serde::Serialize;

/// A named allergen group and the label terms that refer to it.
///
/// Synonyms keep their original casing and load order; both are used when
/// reporting matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllergenCategory {
    name: String,
    synonyms: Vec<String>,
}

impl AllergenCategory {
    pub(crate) fn new(name: String, synonyms: Vec<String>) -> Self {
        Self { name, synonyms }
    }

    /// Category name, e.g. `"dairy"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Synonyms in the order they were loaded.
    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}
