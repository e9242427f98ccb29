//! Food-inspection scoring.
//!
//! [`ScoringModel`] turns per-criterion scores into a weighted total and a
//! [`Severity`] band; [`FlareMode`] decides whether a score warrants
//! escalation or an immediate alert. Both are configured by a
//! [`ScoringConfig`], which can be read from the JSON scoring policy file.
//!
//! ```
//! use scoring::{Criteria, FlareMode, ScoringModel, Severity};
//!
//! let model = ScoringModel::default();
//! let criteria: Criteria = [("food_safety", 95.0), ("cleanliness", 85.0)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//! let evaluation = model.evaluate(&criteria);
//! assert_eq!(evaluation.severity, Severity::Critical);
//!
//! let flare = FlareMode::default().evaluate(evaluation.score, 5);
//! assert!(flare.alert_required);
//! ```

mod config;
mod error;
mod flare;
mod model;

pub use crate::config::{FlareConfig, InspectionWeights, ScoringConfig, ScoringThresholds};
pub use crate::error::ScoringError;
pub use crate::flare::{FlareEvaluation, FlareMode, FlareThresholds, MAX_PRIORITY};
pub use crate::model::{Criteria, InspectionEvaluation, ScoringModel, Severity};
