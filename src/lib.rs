//! Workspace umbrella crate for the food inspector.
//!
//! This crate stitches together the allergen synonym vocabulary, the label
//! matcher, cross-reactivity rules and inspection scoring so callers can
//! screen ingredient labels and score inspections through a single
//! [`Inspector`] built from one [`InspectorConfig`].

pub mod config;
pub mod export;

pub use crossreact::{Confidence, CrossReactError, CrossReactivityChecker, CrossReactivityRule};
pub use matcher::{
    CategoryHits, CompoundPolicy, ExceptionSet, MatchError, MatchOccurrence, Matcher,
    MatcherConfig, ScanKind, ScanMetrics, ScanReport, SynonymHits, set_scan_metrics,
};
pub use scoring::{
    Criteria, FlareConfig, FlareEvaluation, FlareMode, InspectionEvaluation, InspectionWeights,
    ScoringConfig, ScoringError, ScoringModel, ScoringThresholds, Severity,
};
pub use synonyms::{AllergenCategory, SynonymError, SynonymIndex};

pub use crate::config::{ConfigLoadError, InspectorConfig};
pub use crate::export::{DataKind, ExportError, export_version};

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

use crate::export::ExportSource;

/// Errors that can occur while building an [`Inspector`] or analysing a label.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigLoadError),
    Vocabulary(SynonymError),
    Match(MatchError),
    CrossReactivity(CrossReactError),
    Scoring(ScoringError),
    Export(ExportError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(err) => write!(f, "configuration failure: {err}"),
            PipelineError::Vocabulary(err) => write!(f, "synonym vocabulary failure: {err}"),
            PipelineError::Match(err) => write!(f, "label scan failed: {err}"),
            PipelineError::CrossReactivity(err) => {
                write!(f, "cross-reactivity rules failure: {err}")
            }
            PipelineError::Scoring(err) => write!(f, "scoring policy failure: {err}"),
            PipelineError::Export(err) => write!(f, "data export failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Config(err) => Some(err),
            PipelineError::Vocabulary(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::CrossReactivity(err) => Some(err),
            PipelineError::Scoring(err) => Some(err),
            PipelineError::Export(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value)
    }
}

impl From<SynonymError> for PipelineError {
    fn from(value: SynonymError) -> Self {
        PipelineError::Vocabulary(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<CrossReactError> for PipelineError {
    fn from(value: CrossReactError) -> Self {
        PipelineError::CrossReactivity(value)
    }
}

impl From<ScoringError> for PipelineError {
    fn from(value: ScoringError) -> Self {
        PipelineError::Scoring(value)
    }
}

impl From<ExportError> for PipelineError {
    fn from(value: ExportError) -> Self {
        PipelineError::Export(value)
    }
}

/// A product label to screen. `ingredients` is `None` when the label text
/// could not be captured at all, which is distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: String,
    #[serde(default)]
    pub ingredients: Option<String>,
}

impl LabelRecord {
    pub fn new(id: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ingredients: Some(ingredients.into()),
        }
    }
}

/// Allergens detected on a label plus the cross-reactions they imply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAnalysis {
    pub label_id: String,
    pub allergens: ScanReport,
    /// Rules whose source is a detected category, in detection order.
    pub cross_reactions: Vec<CrossReactivityRule>,
}

impl LabelAnalysis {
    pub fn detected_categories(&self) -> impl Iterator<Item = &str> {
        self.allergens.category_names()
    }

    pub fn is_allergen_free(&self) -> bool {
        self.allergens.is_empty()
    }

    /// Display lines for every attached cross-reaction.
    pub fn warnings(&self) -> Vec<String> {
        self.cross_reactions
            .iter()
            .map(CrossReactivityRule::warning)
            .collect()
    }
}

/// Score, severity and flare decision for one inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionOutcome {
    pub evaluation: InspectionEvaluation,
    pub flare: FlareEvaluation,
}

/// Label screening and inspection scoring, wired from one configuration.
#[derive(Debug)]
pub struct Inspector {
    matcher: Arc<Matcher>,
    cross_reactivity: CrossReactivityChecker,
    min_confidence: Confidence,
    scoring: ScoringModel,
    flare: FlareMode,
}

impl Inspector {
    pub fn from_config(cfg: &InspectorConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        Self::from_config_with_scoring(cfg, cfg.scoring_config()?)
    }

    /// Build from `cfg`, scoring with an already-loaded policy instead of
    /// the scoring and flare sections of `cfg`.
    pub fn from_config_with_scoring(
        cfg: &InspectorConfig,
        scoring_cfg: ScoringConfig,
    ) -> Result<Self, PipelineError> {
        let start = Instant::now();
        cfg.validate()?;
        scoring_cfg.validate()?;

        let index = match &cfg.synonyms.path {
            Some(path) => SynonymIndex::from_path(path)?,
            None => SynonymIndex::builtin()?,
        };
        let matcher = Matcher::with_config(index, cfg.synonyms.matcher_config())?;
        if cfg.synonyms.warm_cache {
            matcher.warm_up()?;
        }

        let cross_reactivity = match &cfg.cross_reactivity.path {
            Some(path) => CrossReactivityChecker::from_path(path)?,
            None => CrossReactivityChecker::builtin()?,
        };

        let scoring = ScoringModel::from_config(&scoring_cfg)?;
        let flare = FlareMode::new(scoring_cfg.flare_mode)?;

        info!(
            categories = matcher.index().len(),
            synonyms = matcher.index().synonym_count(),
            rules = cross_reactivity.len(),
            compound_policy = ?matcher.compound_policy(),
            elapsed_micros = start.elapsed().as_micros(),
            "inspector_ready"
        );

        Ok(Self {
            matcher: Arc::new(matcher),
            cross_reactivity,
            min_confidence: cfg.cross_reactivity.min_confidence,
            scoring,
            flare,
        })
    }

    /// Inspector over the bundled vocabulary, rules and default scoring.
    pub fn builtin() -> Result<Self, PipelineError> {
        Self::from_config(&InspectorConfig::default())
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Shared handle to the matcher, for callers scanning from other threads.
    pub fn matcher_handle(&self) -> Arc<Matcher> {
        Arc::clone(&self.matcher)
    }

    pub fn cross_reactivity(&self) -> &CrossReactivityChecker {
        &self.cross_reactivity
    }

    pub fn min_confidence(&self) -> Confidence {
        self.min_confidence
    }

    pub fn scoring_model(&self) -> &ScoringModel {
        &self.scoring
    }

    pub fn flare_mode(&self) -> &FlareMode {
        &self.flare
    }

    /// Scan a label's ingredients and attach cross-reactivity rules for each
    /// detected category.
    ///
    /// A label without ingredient text is rejected with
    /// [`MatchError::InvalidArgument`].
    pub fn analyze_label(&self, label: &LabelRecord) -> Result<LabelAnalysis, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "inspector.analyze_label", label_id = %label.id);
        let _guard = span.enter();

        if label.ingredients.is_none() {
            warn!(label_id = %label.id, "label_missing_ingredients");
        }
        let allergens = self.matcher.try_scan_all(label.ingredients.as_deref())?;

        let cross_reactions: Vec<CrossReactivityRule> = allergens
            .category_names()
            .flat_map(|category| {
                self.cross_reactivity
                    .potential_reactions(category, self.min_confidence)
            })
            .cloned()
            .collect();

        info!(
            label_id = %label.id,
            categories = allergens.len(),
            occurrences = allergens.occurrence_count(),
            cross_reactions = cross_reactions.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "label_analyzed"
        );

        Ok(LabelAnalysis {
            label_id: label.id.clone(),
            allergens,
            cross_reactions,
        })
    }

    /// The scoring policy in effect, in the shape of the JSON policy file.
    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            scoring_thresholds: *self.scoring.thresholds(),
            inspection_weights: self.scoring.weights().clone(),
            flare_mode: *self.flare.config(),
        }
    }

    /// Write the loaded `kind` data set to `dir` as export version `major`.
    pub fn export_data(
        &self,
        kind: DataKind,
        major: u32,
        dir: &Path,
        pretty: bool,
    ) -> Result<PathBuf, PipelineError> {
        self.export_data_at(kind, major, dir, pretty, Utc::now())
    }

    /// Write every data set with one shared `generated_at` timestamp.
    pub fn export_all(
        &self,
        major: u32,
        dir: &Path,
        pretty: bool,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let generated_at = Utc::now();
        DataKind::ALL
            .into_iter()
            .map(|kind| self.export_data_at(kind, major, dir, pretty, generated_at))
            .collect()
    }

    fn export_data_at(
        &self,
        kind: DataKind,
        major: u32,
        dir: &Path,
        pretty: bool,
        generated_at: DateTime<Utc>,
    ) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();
        let scoring = self.scoring_config();
        let source = ExportSource {
            index: self.matcher.index(),
            rules: self.cross_reactivity.rules(),
            scoring: &scoring,
        };
        let path = export::write_document(source, kind, major, dir, generated_at, pretty)?;
        info!(
            kind = kind.as_str(),
            version = %export_version(major),
            path = %path.display(),
            elapsed_micros = start.elapsed().as_micros(),
            "data_exported"
        );
        Ok(path)
    }

    /// Score an inspection and run the flare policy on the rounded score.
    pub fn evaluate_inspection(&self, criteria: &Criteria, base_priority: u32) -> InspectionOutcome {
        let evaluation = self.scoring.evaluate(criteria);
        let flare = self.flare.evaluate(evaluation.score, base_priority);
        InspectionOutcome { evaluation, flare }
    }
}
