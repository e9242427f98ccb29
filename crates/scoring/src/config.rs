use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Lower bounds (inclusive) of each severity band, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            critical: 90.0,
            high: 70.0,
            medium: 50.0,
            low: 30.0,
        }
    }
}

impl ScoringThresholds {
    pub fn validate(&self) -> Result<(), ScoringError> {
        let bands = [self.critical, self.high, self.medium, self.low];
        if bands.iter().any(|value| !value.is_finite()) {
            return Err(ScoringError::InvalidConfig(
                "scoring thresholds must be finite numbers".into(),
            ));
        }
        if !bands.windows(2).all(|pair| pair[0] > pair[1]) {
            return Err(ScoringError::InvalidConfig(format!(
                "scoring thresholds must be strictly descending (critical {} > high {} > medium {} > low {})",
                self.critical, self.high, self.medium, self.low
            )));
        }
        Ok(())
    }
}

/// Criterion name -> weight. Criteria absent from an inspection are skipped
/// and the remaining weights renormalised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct InspectionWeights(BTreeMap<String, f64>);

impl InspectionWeights {
    pub fn new<I, K>(weights: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self(weights.into_iter().map(|(k, w)| (k.into(), w)).collect())
    }

    pub fn get(&self, criterion: &str) -> Option<f64> {
        self.0.get(criterion).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.0.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "inspection_weights must name at least one criterion".into(),
            ));
        }
        for (criterion, weight) in &self.0 {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScoringError::InvalidConfig(format!(
                    "weight for `{criterion}` must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for InspectionWeights {
    fn default() -> Self {
        Self::new([
            ("food_safety", 0.40),
            ("cleanliness", 0.30),
            ("temperature_control", 0.20),
            ("employee_hygiene", 0.10),
        ])
    }
}

/// Escalation policy for high-risk inspections.
///
/// [`FlareConfig::default`] is enabled, but a `flare_mode` section that
/// omits `enabled` leaves flare mode off: it must be switched on explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlareConfig {
    #[serde(default)]
    pub enabled: bool,
    pub trigger_score: f64,
    pub escalation_multiplier: f64,
    pub alert_threshold: f64,
}

impl Default for FlareConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_score: 80.0,
            escalation_multiplier: 1.5,
            alert_threshold: 85.0,
        }
    }
}

impl FlareConfig {
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.trigger_score.is_finite() || !self.alert_threshold.is_finite() {
            return Err(ScoringError::InvalidConfig(
                "flare thresholds must be finite numbers".into(),
            ));
        }
        if !self.escalation_multiplier.is_finite() || self.escalation_multiplier <= 0.0 {
            return Err(ScoringError::InvalidConfig(format!(
                "escalation_multiplier must be positive, got {}",
                self.escalation_multiplier
            )));
        }
        Ok(())
    }
}

/// The JSON scoring policy file: thresholds, weights and flare mode.
///
/// Every section is optional and falls back to its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub scoring_thresholds: ScoringThresholds,
    pub inspection_weights: InspectionWeights,
    pub flare_mode: FlareConfig,
}

impl ScoringConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScoringError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScoringError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScoringError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        self.scoring_thresholds.validate()?;
        self.inspection_weights.validate()?;
        self.flare_mode.validate()
    }
}
