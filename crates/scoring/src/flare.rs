use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FlareConfig;
use crate::error::ScoringError;

/// Highest priority an escalation can reach.
pub const MAX_PRIORITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlareThresholds {
    pub trigger: f64,
    pub alert: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlareEvaluation {
    pub flare_triggered: bool,
    pub alert_required: bool,
    pub base_priority: u32,
    pub escalated_priority: u32,
    pub score: f64,
    pub thresholds: FlareThresholds,
}

/// Flare-mode policy: escalates the response to high-scoring inspections.
///
/// A disabled policy never triggers, never alerts and leaves priorities
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct FlareMode {
    cfg: FlareConfig,
}

impl FlareMode {
    pub fn new(cfg: FlareConfig) -> Result<Self, ScoringError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FlareConfig {
        &self.cfg
    }

    pub fn is_enabled(&self) -> bool {
        self.cfg.enabled
    }

    pub fn should_trigger(&self, score: f64) -> bool {
        self.cfg.enabled && score >= self.cfg.trigger_score
    }

    pub fn should_alert(&self, score: f64) -> bool {
        self.cfg.enabled && score >= self.cfg.alert_threshold
    }

    /// `floor(base_priority * escalation_multiplier)`, capped at [`MAX_PRIORITY`].
    pub fn apply_escalation(&self, base_priority: u32) -> u32 {
        if !self.cfg.enabled {
            return base_priority;
        }
        let escalated = (f64::from(base_priority) * self.cfg.escalation_multiplier).floor();
        if escalated >= f64::from(MAX_PRIORITY) {
            MAX_PRIORITY
        } else {
            escalated as u32
        }
    }

    pub fn evaluate(&self, score: f64, base_priority: u32) -> FlareEvaluation {
        let flare_triggered = self.should_trigger(score);
        let alert_required = self.should_alert(score);
        let escalated_priority = if flare_triggered {
            self.apply_escalation(base_priority)
        } else {
            base_priority
        };

        if alert_required {
            warn!(score, escalated_priority, "flare_alert");
        } else if flare_triggered {
            debug!(score, escalated_priority, "flare_triggered");
        }

        FlareEvaluation {
            flare_triggered,
            alert_required,
            base_priority,
            escalated_priority,
            score,
            thresholds: FlareThresholds {
                trigger: self.cfg.trigger_score,
                alert: self.cfg.alert_threshold,
            },
        }
    }
}
