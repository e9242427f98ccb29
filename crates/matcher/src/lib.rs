//! # Allergen Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` scans free-form ingredient text for the synonyms held in a
//! [`synonyms::SynonymIndex`]. Every term is matched case-insensitively and
//! anchored so it never touches another word character: "malt" matches in
//! "malt extract" but not in "maltodextrin", and "half-and-half" only ever
//! matches as a whole phrase.
//!
//! ## Core Types
//!
//! - [`Matcher`]: owns the index, a bounded pattern cache and the compound
//!   policy. `Send + Sync`; share it behind an `Arc`.
//! - [`MatcherConfig`]: compound policy, strict-mode exceptions and cache size.
//! - [`CompoundPolicy`]: `WordBoundary` (default) or `Strict`, which also drops
//!   matches joined to a neighbour by `-` or `'` unless listed in the
//!   [`ExceptionSet`].
//! - [`ScanReport`] / [`CategoryHits`] / [`SynonymHits`] / [`MatchOccurrence`]:
//!   structured results in vocabulary load order. Offsets are byte offsets
//!   into the scanned `&str`.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::Matcher;
//!
//! let matcher = Matcher::builtin().unwrap();
//! let report = matcher
//!     .scan_all("Enriched wheat flour, maltodextrin, soy lecithin")
//!     .unwrap();
//!
//! assert!(report.contains_category("gluten"));
//! assert!(report.contains_category("soy"));
//! let gluten = report.get("gluten").unwrap();
//! assert!(!gluten.contains("malt"));
//! ```
//!
//! ## Observability
//!
//! Full scans run inside a `matcher.scan_all` tracing span. Install a
//! [`ScanMetrics`] implementation with [`set_scan_metrics`] to receive
//! per-scan latency and hit counts.

mod boundary;
mod engine;
mod metrics;
mod pattern;
mod types;

pub use crate::boundary::ExceptionSet;
pub use crate::engine::Matcher;
pub use crate::metrics::{set_scan_metrics, ScanKind, ScanMetrics};
pub use crate::pattern::{build_pattern, PatternCache, DEFAULT_PATTERN_CACHE_CAPACITY};
pub use crate::types::{
    CategoryHits, CompoundPolicy, MatchError, MatchOccurrence, MatcherConfig, ScanReport,
    SynonymHits,
};
pub use synonyms::{AllergenCategory, SynonymError, SynonymIndex};
