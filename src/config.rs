//! YAML configuration file support for the food inspector.
//!
//! One file configures every stage: the synonym vocabulary and matcher, the
//! cross-reactivity rule table, inspection scoring and flare mode. Every
//! section is optional; omitted sections use the bundled data and defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "retail labels"
//!
//! synonyms:
//!   path: "data/ingredient_synonyms.yaml"   # omit to use the bundled vocabulary
//!   compound_policy: "strict"               # or "word_boundary" (default)
//!   exceptions:
//!     malt: ["malt-flavored"]
//!   pattern_cache_capacity: 256
//!   warm_cache: true
//!
//! cross_reactivity:
//!   path: "data/cross_reactivity.yaml"
//!   min_confidence: "medium"
//!
//! scoring:
//!   policy_path: "scoring_policy.json"      # JSON file; replaces the sections below
//!   thresholds:
//!     critical: 90
//!     high: 70
//!     medium: 50
//!     low: 30
//!   weights:
//!     food_safety: 0.4
//!     cleanliness: 0.3
//!     temperature_control: 0.2
//!     employee_hygiene: 0.1
//!
//! flare:
//!   enabled: true
//!   trigger_score: 80
//!   escalation_multiplier: 1.5
//!   alert_threshold: 85
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crossreact::Confidence;
use matcher::{CompoundPolicy, ExceptionSet, MatcherConfig, DEFAULT_PATTERN_CACHE_CAPACITY};
use scoring::{FlareConfig, InspectionWeights, ScoringConfig, ScoringThresholds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the inspector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InspectorConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub synonyms: SynonymsYamlConfig,

    #[serde(default)]
    pub cross_reactivity: CrossReactivityYamlConfig,

    #[serde(default)]
    pub scoring: ScoringYamlConfig,

    #[serde(default)]
    pub flare: FlareConfig,
}

impl InspectorConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: InspectorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.synonyms.validate()?;
        self.scoring.validate()?;
        self.flare
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("flare: {err}")))?;

        Ok(())
    }

    /// Scoring policy after applying `scoring.policy_path`, if set.
    ///
    /// A policy file replaces the inline thresholds, weights and flare
    /// settings as a whole.
    pub fn scoring_config(&self) -> Result<ScoringConfig, scoring::ScoringError> {
        match &self.scoring.policy_path {
            Some(path) => ScoringConfig::from_path(path),
            None => Ok(ScoringConfig {
                scoring_thresholds: self.scoring.thresholds,
                inspection_weights: self.scoring.weights.clone(),
                flare_mode: self.flare,
            }),
        }
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            synonyms: SynonymsYamlConfig::default(),
            cross_reactivity: CrossReactivityYamlConfig::default(),
            scoring: ScoringYamlConfig::default(),
            flare: FlareConfig::default(),
        }
    }
}

/// Synonym vocabulary and matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymsYamlConfig {
    /// Vocabulary file; the bundled vocabulary is used when absent
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub compound_policy: CompoundPolicy,

    #[serde(default)]
    pub exceptions: ExceptionSet,

    #[serde(default = "default_pattern_cache_capacity")]
    pub pattern_cache_capacity: usize,

    /// Compile every synonym pattern at start-up
    #[serde(default)]
    pub warm_cache: bool,
}

impl SynonymsYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.pattern_cache_capacity == 0 {
            return Err(ConfigLoadError::Validation(
                "synonyms.pattern_cache_capacity must be >= 1".into(),
            ));
        }
        Ok(())
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            compound_policy: self.compound_policy,
            exceptions: self.exceptions.clone(),
            pattern_cache_capacity: self.pattern_cache_capacity,
        }
    }
}

impl Default for SynonymsYamlConfig {
    fn default() -> Self {
        Self {
            path: None,
            compound_policy: CompoundPolicy::default(),
            exceptions: ExceptionSet::default(),
            pattern_cache_capacity: default_pattern_cache_capacity(),
            warm_cache: false,
        }
    }
}

/// Cross-reactivity rule table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReactivityYamlConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Weakest rule reported alongside label scans
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Confidence,
}

impl Default for CrossReactivityYamlConfig {
    fn default() -> Self {
        Self {
            path: None,
            min_confidence: default_min_confidence(),
        }
    }
}

/// Inspection scoring configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringYamlConfig {
    /// JSON scoring policy file
    #[serde(default)]
    pub policy_path: Option<PathBuf>,

    #[serde(default)]
    pub thresholds: ScoringThresholds,

    #[serde(default)]
    pub weights: InspectionWeights,
}

impl ScoringYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.thresholds
            .validate()
            .and_then(|_| self.weights.validate())
            .map_err(|err| ConfigLoadError::Validation(format!("scoring: {err}")))
    }
}

fn default_pattern_cache_capacity() -> usize {
    DEFAULT_PATTERN_CACHE_CAPACITY
}
fn default_min_confidence() -> Confidence {
    Confidence::Low
}
