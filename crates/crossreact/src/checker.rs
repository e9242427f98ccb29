use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::Deserialize;
use tracing::info;

use crate::error::CrossReactError;
use crate::rule::{Confidence, CrossReactivityRule};

const BUILTIN_RULES: &str = include_str!("../data/cross_reactivity.yaml");

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    cross_reactivity_rules: Vec<CrossReactivityRule>,
}

/// Rule table indexed by source and by target allergen.
///
/// Lookups are case-insensitive on allergen names and return rules in the
/// order they were loaded.
#[derive(Debug, Clone, Default)]
pub struct CrossReactivityChecker {
    rules: Vec<CrossReactivityRule>,
    by_source: HashMap<String, Vec<usize>>,
    by_target: HashMap<String, Vec<usize>>,
}

impl CrossReactivityChecker {
    /// Build from in-memory rules. Source and target must be non-blank.
    pub fn from_rules<I>(rules: I) -> Result<Self, CrossReactError>
    where
        I: IntoIterator<Item = CrossReactivityRule>,
    {
        let mut checker = Self::default();
        for (index, mut rule) in rules.into_iter().enumerate() {
            rule.source = rule.source.trim().to_string();
            rule.target = rule.target.trim().to_string();
            if rule.source.is_empty() || rule.target.is_empty() {
                return Err(CrossReactError::InvalidRule {
                    index,
                    reason: "source and target must be non-empty".into(),
                });
            }

            let position = checker.rules.len();
            checker
                .by_source
                .entry(rule.source.to_lowercase())
                .or_default()
                .push(position);
            checker
                .by_target
                .entry(rule.target.to_lowercase())
                .or_default()
                .push(position);
            checker.rules.push(rule);
        }
        Ok(checker)
    }

    /// Parse a `cross_reactivity_rules:` YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CrossReactError> {
        let start = Instant::now();
        let document: RulesDocument = serde_yaml::from_str(yaml)?;
        let checker = Self::from_rules(document.cross_reactivity_rules)?;
        info!(
            rules = checker.len(),
            sources = checker.by_source.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "cross_reactivity_rules_loaded"
        );
        Ok(checker)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CrossReactError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CrossReactError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// The rule table bundled with this crate.
    pub fn builtin() -> Result<Self, CrossReactError> {
        Self::from_yaml_str(BUILTIN_RULES)
    }

    /// Rules whose source is `allergen`, at or above `min_confidence`.
    pub fn potential_reactions(
        &self,
        allergen: &str,
        min_confidence: Confidence,
    ) -> Vec<&CrossReactivityRule> {
        self.indexed(&self.by_source, allergen, min_confidence)
    }

    /// Rules whose target is `target`, at or above `min_confidence`.
    pub fn sources_for_target(
        &self,
        target: &str,
        min_confidence: Confidence,
    ) -> Vec<&CrossReactivityRule> {
        self.indexed(&self.by_target, target, min_confidence)
    }

    /// First rule from `source` to `target`, if any.
    pub fn check(&self, source: &str, target: &str) -> Option<&CrossReactivityRule> {
        let target = target.to_lowercase();
        self.potential_reactions(source, Confidence::Low)
            .into_iter()
            .find(|rule| rule.target.to_lowercase() == target)
    }

    pub fn rules(&self) -> &[CrossReactivityRule] {
        &self.rules
    }

    /// Rules with exactly the given confidence.
    pub fn rules_with_confidence(&self, confidence: Confidence) -> Vec<&CrossReactivityRule> {
        self.rules
            .iter()
            .filter(|rule| rule.confidence == confidence)
            .collect()
    }

    /// Display lines for every reaction of `allergen` at or above `min_confidence`.
    pub fn format_warnings(&self, allergen: &str, min_confidence: Confidence) -> Vec<String> {
        self.potential_reactions(allergen, min_confidence)
            .into_iter()
            .map(CrossReactivityRule::warning)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn indexed(
        &self,
        index: &HashMap<String, Vec<usize>>,
        key: &str,
        min_confidence: Confidence,
    ) -> Vec<&CrossReactivityRule> {
        index
            .get(&key.to_lowercase())
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.rules[position])
                    .filter(|rule| rule.confidence >= min_confidence)
                    .collect()
            })
            .unwrap_or_default()
    }
}
