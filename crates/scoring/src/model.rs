use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{InspectionWeights, ScoringConfig, ScoringThresholds};
use crate::error::ScoringError;

/// Per-criterion inspection scores on a 0-100 scale.
pub type Criteria = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Minimal => "minimal",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionEvaluation {
    /// Weighted score rounded to two decimals.
    pub score: f64,
    pub severity: Severity,
    pub criteria: Criteria,
    pub thresholds: ScoringThresholds,
}

/// Weighted inspection scoring with configurable severity bands.
#[derive(Debug, Clone, Default)]
pub struct ScoringModel {
    thresholds: ScoringThresholds,
    weights: InspectionWeights,
}

impl ScoringModel {
    pub fn new(
        thresholds: ScoringThresholds,
        weights: InspectionWeights,
    ) -> Result<Self, ScoringError> {
        thresholds.validate()?;
        weights.validate()?;
        Ok(Self {
            thresholds,
            weights,
        })
    }

    pub fn from_config(cfg: &ScoringConfig) -> Result<Self, ScoringError> {
        Self::new(cfg.scoring_thresholds, cfg.inspection_weights.clone())
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn weights(&self) -> &InspectionWeights {
        &self.weights
    }

    /// Weighted mean of the weighted criteria present in `criteria`.
    ///
    /// Criteria without a weight are ignored. Returns 0 when no weighted
    /// criterion is present.
    pub fn calculate_score(&self, criteria: &Criteria) -> f64 {
        let (total, weight) = self
            .weights
            .iter()
            .filter_map(|(criterion, weight)| criteria.get(criterion).map(|v| (v * weight, weight)))
            .fold((0.0, 0.0), |(total, sum), (value, weight)| {
                (total + value, sum + weight)
            });

        if weight > 0.0 {
            total / weight
        } else {
            0.0
        }
    }

    pub fn severity(&self, score: f64) -> Severity {
        let t = &self.thresholds;
        if score >= t.critical {
            Severity::Critical
        } else if score >= t.high {
            Severity::High
        } else if score >= t.medium {
            Severity::Medium
        } else if score >= t.low {
            Severity::Low
        } else {
            Severity::Minimal
        }
    }

    /// Severity is classified from the unrounded score; only the reported
    /// `score` is rounded.
    pub fn evaluate(&self, criteria: &Criteria) -> InspectionEvaluation {
        let raw = self.calculate_score(criteria);
        let severity = self.severity(raw);
        let score = round2(raw);
        debug!(score, %severity, criteria = criteria.len(), "inspection_scored");
        InspectionEvaluation {
            score,
            severity,
            criteria: criteria.clone(),
            thresholds: self.thresholds,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(values: &[(&str, f64)]) -> Criteria {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn perfect_inspection_is_critical() {
        let model = ScoringModel::default();
        let result = model.evaluate(&criteria(&[
            ("food_safety", 100.0),
            ("cleanliness", 100.0),
            ("temperature_control", 100.0),
            ("employee_hygiene", 100.0),
        ]));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.severity, Severity::Critical);
    }

    #[test]
    fn weighted_mean_over_all_criteria() {
        let model = ScoringModel::default();
        let result = model.evaluate(&criteria(&[
            ("food_safety", 80.0),
            ("cleanliness", 60.0),
            ("temperature_control", 70.0),
            ("employee_hygiene", 90.0),
        ]));
        assert_eq!(result.score, 73.0);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn missing_criteria_are_renormalised() {
        let model = ScoringModel::default();
        // (80 * 0.4 + 60 * 0.3) / 0.7
        let score = model.calculate_score(&criteria(&[("food_safety", 80.0), ("cleanliness", 60.0)]));
        assert!((score - 71.428_571).abs() < 1e-4);
        assert_eq!(
            model
                .evaluate(&criteria(&[("food_safety", 80.0), ("cleanliness", 60.0)]))
                .score,
            71.43
        );
    }

    #[test]
    fn unknown_or_empty_criteria_score_zero() {
        let model = ScoringModel::default();
        assert_eq!(model.calculate_score(&Criteria::new()), 0.0);
        assert_eq!(model.calculate_score(&criteria(&[("pest_control", 99.0)])), 0.0);
        assert_eq!(model.evaluate(&Criteria::new()).severity, Severity::Minimal);
    }

    #[test]
    fn severity_bands() {
        let model = ScoringModel::default();
        for (score, expected) in [
            (95.0, Severity::Critical),
            (90.0, Severity::Critical),
            (75.0, Severity::High),
            (55.0, Severity::Medium),
            (35.0, Severity::Low),
            (15.0, Severity::Minimal),
        ] {
            assert_eq!(model.severity(score), expected, "score {score}");
        }
    }

    #[test]
    fn severity_uses_unrounded_score_at_band_edge() {
        let model = ScoringModel::default();
        let edge = criteria(&[("food_safety", 89.996)]);
        let result = model.evaluate(&edge);
        assert_eq!(result.score, 90.0);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.severity, model.severity(model.calculate_score(&edge)));
    }

    #[test]
    fn custom_thresholds_apply() {
        let thresholds = ScoringThresholds {
            critical: 60.0,
            high: 40.0,
            medium: 20.0,
            low: 10.0,
        };
        let model = ScoringModel::new(thresholds, InspectionWeights::default()).expect("valid");
        assert_eq!(model.severity(65.0), Severity::Critical);
        assert_eq!(model.severity(15.0), Severity::Low);
    }

    #[test]
    fn evaluation_serializes_lowercase_severity() {
        let model = ScoringModel::default();
        let result = model.evaluate(&criteria(&[("food_safety", 50.0)]));
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["thresholds"]["critical"], 90.0);
    }
}
