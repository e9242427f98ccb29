// Metrics hooks for the matcher crate.
//
// Callers install a global `ScanMetrics` implementation via [`set_scan_metrics`];
// every `Matcher::scan_all` and `Matcher::scan_category` call then reports its
// latency and hit count. Single-term `find` calls are not reported.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Which scan produced a metrics sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// `scan_category` over one category.
    Category,
    /// `scan_all` over the whole vocabulary.
    Full,
}

/// Metrics observer for scan operations.
pub trait ScanMetrics: Send + Sync {
    /// Record one completed scan.
    ///
    /// `hit_count` is the number of matched synonyms for a category scan and
    /// the number of matched categories for a full scan.
    fn record_scan(&self, kind: ScanKind, latency: Duration, hit_count: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScanMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ScanMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ScanMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global scan metrics recorder.
pub fn set_scan_metrics(recorder: Option<Arc<dyn ScanMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
